//! Component kind enumeration
//!
//! Entities carry at most one component of each kind. Sibling lookups and
//! attachment bookkeeping key off this closed enumeration, so there is no
//! runtime type inspection anywhere in the engine.

/// The closed set of component kinds an entity can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Authoritative position for entities not driven by a physics body
    Position,

    /// Presentation proxy node in the renderer's scene graph
    Node,

    /// Physics body ownership and the active drag target
    Physics,

    /// Animated scale with a rate and target
    Scale,

    /// Buffered contacts awaiting resolution
    Contact,

    /// Visual content drawable and its description
    Content,
}

impl ComponentKind {
    /// All kinds, in no particular order
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Position,
        ComponentKind::Node,
        ComponentKind::Physics,
        ComponentKind::Scale,
        ComponentKind::Contact,
        ComponentKind::Content,
    ];
}
