//! Math utilities and types
//!
//! Provides the fundamental 2D math types used throughout the engine.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point = nalgebra::Point2<f32>;

/// Axis-aligned rectangle described by its center and full extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Center of the rectangle
    pub center: Point,

    /// Full width and height
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from its center and full extents
    pub fn new(center: Point, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Minimum corner
    pub fn min(&self) -> Point {
        Point::new(
            self.center.x - self.size.x * 0.5,
            self.center.y - self.size.y * 0.5,
        )
    }

    /// Maximum corner
    pub fn max(&self) -> Point {
        Point::new(
            self.center.x + self.size.x * 0.5,
            self.center.y + self.size.y * 0.5,
        )
    }

    /// Check whether two rectangles overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();

        a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
    }

    /// Check whether a point lies inside the rectangle
    pub fn contains(&self, point: Point) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}
