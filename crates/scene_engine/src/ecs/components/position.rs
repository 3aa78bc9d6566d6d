//! Position component
//!
//! Records the last authoritative location for an entity. While a physics
//! body drives the entity this value can lag behind the simulation; the
//! detach handoff writes the simulated position back here so it survives
//! the body.

use crate::foundation::math::Point;

/// Component recording an entity's authoritative position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionComponent {
    /// Current position in scene coordinates
    pub current_position: Point,
}

impl PositionComponent {
    /// Create a position component at the given point
    pub fn new(position: Point) -> Self {
        Self {
            current_position: position,
        }
    }

    /// Create a position component at the origin
    pub fn at_origin() -> Self {
        Self::new(Point::origin())
    }
}

impl Default for PositionComponent {
    fn default() -> Self {
        Self::at_origin()
    }
}
