//! In-memory host implementations
//!
//! [`HeadlessRenderer`] keeps a real scene graph with positions, scales,
//! and keyed scale animations. [`HeadlessPhysics`] integrates gravity and
//! velocity, drags bound nodes along, and reports begin contacts by
//! category mask. Together they let complete scenes run without a
//! windowing or physics backend, which is how the test suite and the demo
//! binary drive the engine.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;

use crate::foundation::math::{Point, Rect, Vec2};

use super::{
    BodyDef, BodyHandle, BodyShape, ContactCategories, ContentDescriptor, NodeHandle,
    PhysicsEngine, Renderer, ShapeDescriptor,
};

/// Approximate width of one label character in scene units
const LABEL_CHAR_WIDTH: f32 = 10.0;

/// Approximate label line height in scene units
const LABEL_LINE_HEIGHT: f32 = 20.0;

#[derive(Debug, Clone)]
struct ScaleAnimation {
    key: String,
    target: f32,
    speed: f32,
    duration: f32,
}

#[derive(Debug)]
struct NodeState {
    position: Point,
    scale: f32,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
    size: Vec2,
    animations: Vec<ScaleAnimation>,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            position: Point::origin(),
            scale: 1.0,
            parent: None,
            children: Vec::new(),
            size: Vec2::zeros(),
            animations: Vec::new(),
        }
    }
}

/// Fixed intrinsic sizes for drawables; labels use a deterministic
/// per-character approximation instead of real font metrics.
fn content_size(descriptor: &ContentDescriptor) -> Vec2 {
    match descriptor {
        ContentDescriptor::Shape(ShapeDescriptor::Circle { radius }) => {
            Vec2::new(radius * 2.0, radius * 2.0)
        }
        ContentDescriptor::Shape(ShapeDescriptor::Rect { width, height }) => {
            Vec2::new(*width, *height)
        }
        ContentDescriptor::Label { text } => Vec2::new(
            text.chars().count() as f32 * LABEL_CHAR_WIDTH,
            LABEL_LINE_HEIGHT,
        ),
        ContentDescriptor::Sprite { width, height } => Vec2::new(*width, *height),
    }
}

/// In-memory renderer with a stepped animation timeline
pub struct HeadlessRenderer {
    nodes: HashMap<NodeHandle, NodeState>,
    root: NodeHandle,
    next_id: u64,
    animations_started: u64,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    /// Create a renderer holding only the scene root
    pub fn new() -> Self {
        let root = NodeHandle(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, NodeState::default());
        Self {
            nodes,
            root,
            next_id: 1,
            animations_started: 0,
        }
    }

    fn allocate(&mut self, size: Vec2) -> NodeHandle {
        let handle = NodeHandle(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            handle,
            NodeState {
                size,
                ..NodeState::default()
            },
        );
        handle
    }

    fn unlink(&mut self, node: NodeHandle) {
        let Some(parent) = self.nodes.get(&node).and_then(|state| state.parent) else {
            return;
        };
        if let Some(parent_state) = self.nodes.get_mut(&parent) {
            parent_state.children.retain(|&child| child != node);
        }
        if let Some(state) = self.nodes.get_mut(&node) {
            state.parent = None;
        }
    }

    /// Step every running scale animation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for state in self.nodes.values_mut() {
            let scale = &mut state.scale;
            state.animations.retain_mut(|animation| {
                let remaining = animation.target - *scale;
                let step = animation.speed * dt;
                if remaining.abs() <= step {
                    *scale = animation.target;
                    false
                } else {
                    *scale += step * remaining.signum();
                    true
                }
            });
        }
    }

    /// Whether the renderer still knows this node
    pub fn node_exists(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Total number of nodes, the root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the node is reachable from the scene root
    pub fn is_in_scene(&self, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == self.root {
                return true;
            }
            current = self.nodes.get(&handle).and_then(|state| state.parent);
        }
        false
    }

    /// Target and requested duration of the animation running on a node
    pub fn active_animation(&self, node: NodeHandle) -> Option<(f32, f32)> {
        self.nodes
            .get(&node)?
            .animations
            .last()
            .map(|animation| (animation.target, animation.duration))
    }

    /// Number of animations started since creation, instant ones included
    pub fn animations_started(&self) -> u64 {
        self.animations_started
    }
}

impl Renderer for HeadlessRenderer {
    fn create_node(&mut self) -> NodeHandle {
        self.allocate(Vec2::zeros())
    }

    fn create_content(&mut self, descriptor: &ContentDescriptor) -> NodeHandle {
        let size = content_size(descriptor);
        self.allocate(size)
    }

    fn root(&self) -> NodeHandle {
        self.root
    }

    fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        self.unlink(child);
        if let Some(state) = self.nodes.get_mut(&child) {
            state.parent = Some(parent);
        }
        if let Some(state) = self.nodes.get_mut(&parent) {
            state.children.push(child);
        }
    }

    fn remove_from_parent(&mut self, node: NodeHandle) {
        self.unlink(node);
    }

    fn set_position(&mut self, node: NodeHandle, position: Point) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.position = position;
        }
    }

    fn position(&self, node: NodeHandle) -> Point {
        self.nodes
            .get(&node)
            .map_or_else(Point::origin, |state| state.position)
    }

    fn scale(&self, node: NodeHandle) -> f32 {
        self.nodes.get(&node).map_or(1.0, |state| state.scale)
    }

    fn run_scale_animation(&mut self, node: NodeHandle, target: f32, duration: f32, key: &str) {
        let Some(state) = self.nodes.get_mut(&node) else {
            return;
        };
        state.animations.retain(|animation| animation.key != key);
        self.animations_started += 1;
        if duration <= 0.0 {
            state.scale = target;
            return;
        }
        let speed = (target - state.scale).abs() / duration;
        state.animations.push(ScaleAnimation {
            key: key.to_string(),
            target,
            speed,
            duration,
        });
    }

    fn bounding_size(&self, node: NodeHandle) -> Vec2 {
        // Children are measured at the parent's origin; drawables sit at
        // the proxy origin so offsets never enter the picture here.
        let Some(state) = self.nodes.get(&node) else {
            return Vec2::zeros();
        };
        let mut size = state.size;
        for &child in &state.children {
            let child_size = self.bounding_size(child);
            size.x = size.x.max(child_size.x);
            size.y = size.y.max(child_size.y);
        }
        size
    }
}

#[derive(Debug)]
struct BodyState {
    shape: BodyShape,
    position: Point,
    velocity: Vec2,
    dynamic: bool,
    category: u32,
    contact_mask: u32,
    node: Option<NodeHandle>,
}

fn body_rect(state: &BodyState) -> Rect {
    let size = match state.shape {
        BodyShape::Circle { radius } => Vec2::new(radius * 2.0, radius * 2.0),
        BodyShape::Box { width, height } => Vec2::new(width, height),
    };
    Rect::new(state.position, size)
}

/// In-memory physics engine, stepped explicitly by the host
///
/// Bodies have unit mass and no collision response; contact detection is
/// bounding boxes only, reported once per overlap episode. That is enough
/// physics for the scenes this engine drives headlessly.
pub struct HeadlessPhysics {
    bodies: BTreeMap<BodyHandle, BodyState>,
    next_id: u64,
    gravity: Vec2,
    velocity_writes: u64,
    touching: HashSet<(BodyHandle, BodyHandle)>,
}

impl Default for HeadlessPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPhysics {
    /// Create a physics engine with downward gravity of 9.8 units
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            next_id: 1,
            gravity: Vec2::new(0.0, -9.8),
            velocity_writes: 0,
            touching: HashSet::new(),
        }
    }

    /// Replace the gravity vector
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Integrate `dt` seconds and return newly begun contacts
    ///
    /// Dynamic bodies accumulate gravity and move by their velocity; bound
    /// nodes are dragged along. A contact pair is returned the step its
    /// bounding boxes begin to overlap, provided either side's contact
    /// mask matches the other's category.
    pub fn step(&mut self, dt: f32, renderer: &mut HeadlessRenderer) -> Vec<(BodyHandle, BodyHandle)> {
        if dt > 0.0 {
            for state in self.bodies.values_mut() {
                if state.dynamic {
                    state.velocity += self.gravity * dt;
                    state.position += state.velocity * dt;
                }
            }
        }

        for state in self.bodies.values() {
            if let Some(node) = state.node {
                renderer.set_position(node, state.position);
            }
        }

        let handles: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        let mut began = Vec::new();
        for (index, &a) in handles.iter().enumerate() {
            for &b in &handles[index + 1..] {
                let (Some(state_a), Some(state_b)) = (self.bodies.get(&a), self.bodies.get(&b))
                else {
                    continue;
                };
                let overlapping = body_rect(state_a).intersects(&body_rect(state_b));
                let reportable = ContactCategories::should_report(
                    state_a.category,
                    state_a.contact_mask,
                    state_b.category,
                    state_b.contact_mask,
                );
                if overlapping && reportable {
                    if self.touching.insert((a, b)) {
                        began.push((a, b));
                    }
                } else {
                    self.touching.remove(&(a, b));
                }
            }
        }
        began
    }

    /// Whether the body still exists
    pub fn body_exists(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of velocity overwrites since creation
    pub fn velocity_write_count(&self) -> u64 {
        self.velocity_writes
    }
}

impl PhysicsEngine for HeadlessPhysics {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            handle,
            BodyState {
                shape: def.shape,
                position: def.position,
                velocity: Vec2::zeros(),
                dynamic: def.dynamic,
                category: def.category,
                contact_mask: def.contact_mask,
                node: None,
            },
        );
        debug!("Created body {:?} at ({}, {})", handle, def.position.x, def.position.y);
        handle
    }

    fn bind_node(&mut self, body: BodyHandle, node: NodeHandle) {
        if let Some(state) = self.bodies.get_mut(&body) {
            state.node = Some(node);
        }
    }

    fn unbind_node(&mut self, body: BodyHandle) {
        if let Some(state) = self.bodies.get_mut(&body) {
            state.node = None;
        }
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
        self.touching.retain(|&(a, b)| a != body && b != body);
        debug!("Destroyed body {body:?}");
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(state) = self.bodies.get_mut(&body) {
            state.velocity = velocity;
            self.velocity_writes += 1;
        }
    }

    fn velocity(&self, body: BodyHandle) -> Vec2 {
        self.bodies
            .get(&body)
            .map_or_else(Vec2::zeros, |state| state.velocity)
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(state) = self.bodies.get_mut(&body) {
            state.velocity += impulse;
        }
    }

    fn position(&self, body: BodyHandle) -> Point {
        self.bodies
            .get(&body)
            .map_or_else(Point::origin, |state| state.position)
    }
}
