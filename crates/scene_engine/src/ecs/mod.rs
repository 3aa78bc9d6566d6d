//! Entity-component storage and the per-frame systems
//!
//! Entities are bare identities in a generation-checked arena; behavior
//! is composed by attaching at most one component of each kind. Systems
//! iterate their registered entities once per frame and talk to siblings
//! through the store, never to each other.

pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod store;
pub mod systems;

pub use component::ComponentKind;
pub use entity::EntityId;
pub use error::ComponentError;
pub use store::ComponentStore;
pub use systems::System;
