//! Content component
//!
//! Pairs the immutable description an entity's drawable was built from
//! with the drawable node the renderer produced. The drawable lives under
//! the entity's proxy and is removed from the scene graph when the
//! component detaches.

use crate::host::{ContentDescriptor, NodeHandle};

/// Component owning an entity's visual content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentComponent {
    /// Description the drawable was built from
    pub descriptor: ContentDescriptor,

    /// Drawable node parented under the entity's proxy
    pub drawable: NodeHandle,
}

impl ContentComponent {
    /// Create a content component for a drawable built from `descriptor`
    pub fn new(descriptor: ContentDescriptor, drawable: NodeHandle) -> Self {
        Self {
            descriptor,
            drawable,
        }
    }
}
