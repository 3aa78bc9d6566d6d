//! Per-frame systems
//!
//! Systems keep their own list of participating entities instead of
//! scanning the store: the scene registers an entity with every system at
//! spawn and deregisters it at despawn. Each system declares the
//! component kind it drives, so registration quietly skips entities that
//! lack it. Update signatures are per-system, taking exactly the
//! collaborators the pass needs.

pub mod contact_resolution;
pub mod node_sync;

pub use contact_resolution::{ContactPolicy, ContactResolutionSystem};
pub use node_sync::NodeSyncSystem;

use crate::ecs::component::ComponentKind;
use crate::ecs::entity::EntityId;
use crate::ecs::store::ComponentStore;

/// Registration contract shared by all systems
pub trait System {
    /// Component kind this system operates on
    fn component_kind(&self) -> ComponentKind;

    /// Add an entity to the iteration list if it carries the system's kind
    fn register(&mut self, store: &ComponentStore, entity: EntityId);

    /// Drop an entity from the iteration list
    fn deregister(&mut self, entity: EntityId);
}
