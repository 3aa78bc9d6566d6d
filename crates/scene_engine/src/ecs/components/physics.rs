//! Physics component
//!
//! Ties an entity to a physics body for as long as the component is
//! attached. The body handle is never optional: detaching the component
//! destroys the body, so a live component always names a live body.

use crate::foundation::math::Point;
use crate::host::BodyHandle;

/// Component owning an entity's physics body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsComponent {
    /// Body owned by this component for the duration of the attachment
    pub body: BodyHandle,

    /// Category bits the body was created with
    pub category: u32,

    /// Drag destination while a touch owns this entity, cleared on release
    pub target_position: Option<Point>,
}

impl PhysicsComponent {
    /// Create a physics component for an existing body
    pub fn new(body: BodyHandle, category: u32) -> Self {
        Self {
            body,
            category,
            target_position: None,
        }
    }

    /// Whether a drag currently owns this entity
    pub fn is_dragged(&self) -> bool {
        self.target_position.is_some()
    }
}
