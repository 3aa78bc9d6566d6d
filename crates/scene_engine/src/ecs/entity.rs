//! Entity identity and per-entity component slots
//!
//! Entities live in a generation-checked arena; a handle to a removed
//! entity fails its generation check instead of resolving to a recycled
//! slot.

use slotmap::new_key_type;

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{
    ContactComponent, ContentComponent, NodeComponent, PhysicsComponent, PositionComponent,
    ScaleComponent,
};

new_key_type! {
    /// Generation-checked handle to an entity
    pub struct EntityId;
}

/// Per-entity component storage, one slot per kind
#[derive(Debug, Default)]
pub(crate) struct EntityRecord {
    pub position: Option<PositionComponent>,
    pub node: Option<NodeComponent>,
    pub physics: Option<PhysicsComponent>,
    pub scale: Option<ScaleComponent>,
    pub contact: Option<ContactComponent>,
    pub content: Option<ContentComponent>,
}

impl EntityRecord {
    /// Whether the slot for `kind` is occupied
    pub fn has(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Position => self.position.is_some(),
            ComponentKind::Node => self.node.is_some(),
            ComponentKind::Physics => self.physics.is_some(),
            ComponentKind::Scale => self.scale.is_some(),
            ComponentKind::Contact => self.contact.is_some(),
            ComponentKind::Content => self.content.is_some(),
        }
    }

    /// Kinds currently attached, in declaration order
    pub fn attached_kinds(&self) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|&kind| self.has(kind))
            .collect()
    }
}
