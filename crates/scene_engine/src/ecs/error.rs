//! Error types for entity and component operations

use thiserror::Error;

use crate::ecs::component::ComponentKind;

/// Errors from component attachment, detachment, and entity lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// The entity already carries a component of this kind
    #[error("entity already has a {0:?} component")]
    DuplicateComponent(ComponentKind),

    /// The entity has no component of this kind
    #[error("entity has no {0:?} component")]
    ComponentNotFound(ComponentKind),

    /// The entity handle is stale or was never issued
    #[error("unknown or removed entity")]
    UnknownEntity,
}
