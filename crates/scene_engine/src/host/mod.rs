//! Host collaborator interfaces
//!
//! The engine draws nothing and simulates nothing itself. Rendering and
//! physics are supplied by the host behind the [`Renderer`] and
//! [`PhysicsEngine`] traits; the engine only holds opaque handles and
//! calls through them. [`headless`] provides in-memory implementations of
//! both for tests, demos, and any host without a real backend.

pub mod headless;

pub use headless::{HeadlessPhysics, HeadlessRenderer};

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Point, Vec2};

/// Opaque handle to a presentation node owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(pub u64);

/// Opaque handle to a physics body owned by the physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub u64);

/// Shape of a drawable built by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeDescriptor {
    /// Circle centered on the node
    Circle {
        /// Circle radius in scene units
        radius: f32,
    },

    /// Rectangle centered on the node
    Rect {
        /// Full width in scene units
        width: f32,

        /// Full height in scene units
        height: f32,
    },
}

/// Description of an entity's visual content
///
/// This is the closed set of drawables the engine knows how to request
/// from a renderer. One entity carries at most one content component, so
/// the variants are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentDescriptor {
    /// Vector shape
    Shape(ShapeDescriptor),

    /// Text label
    Label {
        /// Text to display
        text: String,
    },

    /// Textured sprite of a fixed size
    Sprite {
        /// Full width in scene units
        width: f32,

        /// Full height in scene units
        height: f32,
    },
}

/// Shape of a physics body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Circle centered on the body origin
    Circle {
        /// Circle radius in scene units
        radius: f32,
    },

    /// Box centered on the body origin
    Box {
        /// Full width in scene units
        width: f32,

        /// Full height in scene units
        height: f32,
    },
}

/// Everything the physics engine needs to create a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    /// Collision shape
    pub shape: BodyShape,

    /// Initial position of the body
    pub position: Point,

    /// Whether the body is simulated or static
    pub dynamic: bool,

    /// Category bits identifying the body
    pub category: u32,

    /// Categories whose contacts with this body must be reported
    pub contact_mask: u32,
}

/// Contact category bit mask helpers
///
/// Categories are plain `u32` masks; hosts and scenes name their own bits.
/// A contact between two bodies is reported when either side's contact
/// mask intersects the other side's category, so one interested party is
/// enough for the pair to be delivered.
pub struct ContactCategories;

impl ContactCategories {
    /// No categories
    pub const NONE: u32 = 0;

    /// All categories
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Check whether a contact between two bodies should be reported
    pub fn should_report(category_a: u32, mask_a: u32, category_b: u32, mask_b: u32) -> bool {
        (mask_a & category_b) != 0 || (mask_b & category_a) != 0
    }

    /// Helper to combine several categories into one mask
    pub fn mask(categories: &[u32]) -> u32 {
        categories.iter().fold(0, |acc, &category| acc | category)
    }
}

/// Rendering collaborator
///
/// Owns the scene graph and every drawable in it. The engine addresses
/// nodes exclusively through [`NodeHandle`]s; calls with a stale handle
/// are ignored by conforming implementations.
pub trait Renderer {
    /// Create an empty proxy node, not yet parented anywhere
    fn create_node(&mut self) -> NodeHandle;

    /// Create a drawable node for the given content description
    fn create_content(&mut self, descriptor: &ContentDescriptor) -> NodeHandle;

    /// Handle of the scene root
    fn root(&self) -> NodeHandle;

    /// Parent `child` under `parent`, reparenting if necessary
    fn add_child(&mut self, parent: NodeHandle, child: NodeHandle);

    /// Detach a node from its parent, removing its subtree from the scene
    fn remove_from_parent(&mut self, node: NodeHandle);

    /// Move a node to `position`
    fn set_position(&mut self, node: NodeHandle, position: Point);

    /// Current position of a node
    fn position(&self, node: NodeHandle) -> Point;

    /// Current uniform scale of a node
    fn scale(&self, node: NodeHandle) -> f32;

    /// Animate a node's scale to `target` over `duration` seconds
    ///
    /// An animation already running under `key` is replaced, restarting
    /// the tween from the node's current scale.
    fn run_scale_animation(&mut self, node: NodeHandle, target: f32, duration: f32, key: &str);

    /// Axis-aligned size of the node's subtree
    fn bounding_size(&self, node: NodeHandle) -> Vec2;
}

/// Physics collaborator
///
/// Owns every body and the simulation stepping. The engine creates and
/// destroys bodies around component attachments and writes velocities and
/// impulses during its frame passes; how and when the host integrates is
/// its own business.
pub trait PhysicsEngine {
    /// Create a body from a definition
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Bind a body to a presentation node so the node follows the body
    fn bind_node(&mut self, body: BodyHandle, node: NodeHandle);

    /// Release a body's presentation node without destroying the body
    fn unbind_node(&mut self, body: BodyHandle);

    /// Destroy a body and release its resources
    fn destroy_body(&mut self, body: BodyHandle);

    /// Overwrite a body's velocity
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Current velocity of a body
    fn velocity(&self, body: BodyHandle) -> Vec2;

    /// Apply an instantaneous impulse to a body
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    /// Current position of a body
    fn position(&self, body: BodyHandle) -> Point;
}
