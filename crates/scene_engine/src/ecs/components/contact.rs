//! Contact component
//!
//! Buffers the entities that touched this one since the last resolution
//! pass. The list is ordered, tolerates duplicates and stale handles, and
//! is drained unconditionally every frame, so an entry is visible for at
//! most one pass.

use crate::ecs::entity::EntityId;

/// Component buffering contacts for per-frame resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactComponent {
    /// Entities that made contact since the last resolution pass
    pub pending: Vec<EntityId>,
}

impl ContactComponent {
    /// Create a contact component with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contact with another entity
    pub fn record(&mut self, other: EntityId) {
        self.pending.push(other);
    }

    /// Take the buffered contacts, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending)
    }
}
