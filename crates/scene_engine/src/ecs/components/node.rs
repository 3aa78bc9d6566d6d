//! Node component
//!
//! Owns the entity's presentation proxy: an empty renderer node that
//! content drawables are parented under and that the physics body is bound
//! to. The proxy is created by the host and released when the component
//! detaches.

use crate::host::NodeHandle;

/// Component owning an entity's presentation proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeComponent {
    /// Handle of the proxy node in the renderer's scene graph
    pub node: NodeHandle,
}

impl NodeComponent {
    /// Create a node component wrapping an existing renderer node
    pub fn new(node: NodeHandle) -> Self {
        Self { node }
    }
}
