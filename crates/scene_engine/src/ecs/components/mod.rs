//! Component data types
//!
//! One module per component kind. Components are plain data; lifecycle
//! behavior lives in the attachment protocol on `ComponentStore`.

pub mod contact;
pub mod content;
pub mod node;
pub mod physics;
pub mod position;
pub mod scale;

pub use contact::ContactComponent;
pub use content::ContentComponent;
pub use node::NodeComponent;
pub use physics::PhysicsComponent;
pub use position::PositionComponent;
pub use scale::ScaleComponent;

use crate::ecs::component::ComponentKind;

/// A component value of any kind, ready to attach to an entity
#[derive(Debug, Clone, PartialEq)]
pub enum AnyComponent {
    /// Position component value
    Position(PositionComponent),

    /// Node component value
    Node(NodeComponent),

    /// Physics component value
    Physics(PhysicsComponent),

    /// Scale component value
    Scale(ScaleComponent),

    /// Contact component value
    Contact(ContactComponent),

    /// Content component value
    Content(ContentComponent),
}

impl AnyComponent {
    /// Kind slot this component occupies on an entity
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Position(_) => ComponentKind::Position,
            Self::Node(_) => ComponentKind::Node,
            Self::Physics(_) => ComponentKind::Physics,
            Self::Scale(_) => ComponentKind::Scale,
            Self::Contact(_) => ComponentKind::Contact,
            Self::Content(_) => ComponentKind::Content,
        }
    }
}

impl From<PositionComponent> for AnyComponent {
    fn from(component: PositionComponent) -> Self {
        Self::Position(component)
    }
}

impl From<NodeComponent> for AnyComponent {
    fn from(component: NodeComponent) -> Self {
        Self::Node(component)
    }
}

impl From<PhysicsComponent> for AnyComponent {
    fn from(component: PhysicsComponent) -> Self {
        Self::Physics(component)
    }
}

impl From<ScaleComponent> for AnyComponent {
    fn from(component: ScaleComponent) -> Self {
        Self::Scale(component)
    }
}

impl From<ContactComponent> for AnyComponent {
    fn from(component: ContactComponent) -> Self {
        Self::Contact(component)
    }
}

impl From<ContentComponent> for AnyComponent {
    fn from(component: ContentComponent) -> Self {
        Self::Content(component)
    }
}
