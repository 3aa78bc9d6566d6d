//! Scene controller
//!
//! Owns the store and the systems, and is the single entry point hosts
//! talk to: blueprint-driven spawning, touch routing, contact routing,
//! and the frame driver. The per-frame order is fixed: contact resolution
//! first, node synchronization second, deferred despawns last, so system
//! iteration never observes a mutating entity container.

pub mod blueprint;

pub use blueprint::{BlueprintCatalog, BodyBlueprint, EntityBlueprint, SceneConfig};

use log::{debug, info};
use thiserror::Error;

use crate::ecs::components::{
    ContactComponent, ContentComponent, NodeComponent, PhysicsComponent, PositionComponent,
    ScaleComponent,
};
use crate::ecs::entity::EntityId;
use crate::ecs::error::ComponentError;
use crate::ecs::store::ComponentStore;
use crate::ecs::systems::{ContactPolicy, ContactResolutionSystem, NodeSyncSystem, System};
use crate::foundation::math::Point;
use crate::foundation::time::FrameClock;
use crate::host::{
    BodyDef, BodyHandle, BodyShape, ContentDescriptor, NodeHandle, PhysicsEngine, Renderer,
    ShapeDescriptor,
};

/// Errors from blueprint-driven spawning
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// No blueprint is registered under the requested kind name
    #[error("no blueprint registered for kind {0:?}")]
    InvalidSpawnRequest(String),

    /// A component operation failed while assembling the entity
    #[error("entity assembly failed: {0}")]
    Component(#[from] ComponentError),
}

/// Controller owning the entities, systems, and frame timeline of a scene
pub struct Scene {
    store: ComponentStore,
    node_sync: NodeSyncSystem,
    contacts: ContactResolutionSystem,
    catalog: BlueprintCatalog,
    config: SceneConfig,
    clock: FrameClock,
    pending_removals: Vec<EntityId>,
}

impl Scene {
    /// Create a scene spawning from `catalog` and reacting per `config`
    pub fn new(catalog: BlueprintCatalog, config: SceneConfig) -> Self {
        let policy = ContactPolicy {
            removable_categories: config.removable_categories,
            impulse: config.contact_impulse,
        };
        info!("Scene created with {} blueprint kinds", catalog.len());
        Self {
            store: ComponentStore::new(),
            node_sync: NodeSyncSystem::new(),
            contacts: ContactResolutionSystem::new(policy),
            catalog,
            config,
            clock: FrameClock::new(),
            pending_removals: Vec::new(),
        }
    }

    /// The entity store
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    /// The entity store, mutably
    ///
    /// Hosts use this for component work between frames, like detaching
    /// physics from a settled entity.
    pub fn store_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    /// The scene's tuning
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The blueprint catalog
    pub fn catalog(&self) -> &BlueprintCatalog {
        &self.catalog
    }

    /// Number of frames driven so far
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Spawn an entity of a registered kind at a point
    ///
    /// Assembly is all-or-nothing: if any component refuses to attach the
    /// partial entity is torn down before the error is returned, so a
    /// failed spawn leaves no trace in the store, the scene graph, or the
    /// physics engine.
    pub fn spawn(
        &mut self,
        kind: &str,
        at: Point,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
    ) -> Result<EntityId, SpawnError> {
        let blueprint = self
            .catalog
            .get(kind)
            .cloned()
            .ok_or_else(|| SpawnError::InvalidSpawnRequest(kind.to_string()))?;

        let entity = self.store.create_entity();
        match self.assemble(entity, &blueprint, at, renderer, physics) {
            Ok(()) => {
                for system in [
                    &mut self.node_sync as &mut dyn System,
                    &mut self.contacts as &mut dyn System,
                ] {
                    system.register(&self.store, entity);
                }
                info!("Spawned {kind:?} entity {entity:?} at ({}, {})", at.x, at.y);
                Ok(entity)
            }
            Err(error) => {
                let _ = self.store.remove_entity(entity, renderer, physics);
                Err(error.into())
            }
        }
    }

    fn assemble(
        &mut self,
        entity: EntityId,
        blueprint: &EntityBlueprint,
        at: Point,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
    ) -> Result<(), ComponentError> {
        let proxy = renderer.create_node();
        self.store
            .attach(entity, NodeComponent::new(proxy), renderer, physics)?;

        let drawable = renderer.create_content(&blueprint.content);
        renderer.add_child(proxy, drawable);
        self.store.attach(
            entity,
            ContentComponent::new(blueprint.content.clone(), drawable),
            renderer,
            physics,
        )?;

        self.store
            .attach(entity, PositionComponent::new(at), renderer, physics)?;

        self.store.attach(
            entity,
            ScaleComponent::new(blueprint.scale_rate),
            renderer,
            physics,
        )?;
        self.store
            .set_target_scale(entity, self.config.entry_scale, renderer)?;

        if let Some(body_blueprint) = &blueprint.body {
            let def = BodyDef {
                shape: body_shape(&blueprint.content, drawable, renderer),
                position: at,
                dynamic: body_blueprint.dynamic,
                category: body_blueprint.category,
                contact_mask: body_blueprint.contact_mask,
            };
            let body = physics.create_body(&def);
            self.store.attach(
                entity,
                PhysicsComponent::new(body, body_blueprint.category),
                renderer,
                physics,
            )?;
        }

        if blueprint.tracks_contacts {
            self.store
                .attach(entity, ContactComponent::new(), renderer, physics)?;
        }

        let root = renderer.root();
        renderer.add_child(root, proxy);
        Ok(())
    }

    /// Remove an entity and everything it owns, immediately
    ///
    /// Contact-driven removals go through the deferred path instead; this
    /// is for host-initiated despawns between frames.
    pub fn remove_entity(
        &mut self,
        entity: EntityId,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
    ) -> Result<(), ComponentError> {
        self.node_sync.deregister(entity);
        self.contacts.deregister(entity);
        let result = self.store.remove_entity(entity, renderer, physics);
        if result.is_ok() {
            info!("Despawned entity {entity:?}");
        }
        result
    }

    /// Drive one frame at the host's timestamp
    ///
    /// The first call only seeds the clock and runs the systems with a
    /// zero delta. Contact resolution runs before node synchronization;
    /// entities marked removable despawn after both passes.
    pub fn update(
        &mut self,
        current_time: f64,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
    ) {
        let delta_time = self.clock.advance(current_time);
        self.contacts
            .update(&mut self.store, physics, &mut self.pending_removals);
        self.node_sync
            .update(&self.store, renderer, physics, delta_time);

        for entity in std::mem::take(&mut self.pending_removals) {
            if self.remove_entity(entity, renderer, physics).is_err() {
                // Duplicate marks from multi-contact frames land here.
                debug!("Skipped removal of already dead entity {entity:?}");
            }
        }
    }

    /// Route a touch landing on `entity`, if the host hit-tested one
    ///
    /// The touched point becomes the entity's authoritative position, and
    /// a physics entity enters its drag: the touch target owns the body
    /// until the touch ends.
    pub fn touch_began(&mut self, at: Point, entity: Option<EntityId>) {
        let Some(entity) = entity else {
            return;
        };
        if let Some(position) = self.store.position_mut(entity) {
            position.current_position = at;
        }
        if let Some(physics_component) = self.store.physics_mut(entity) {
            physics_component.target_position = Some(at);
            debug!("Drag started on entity {entity:?}");
        }
    }

    /// Route a touch moving while on `entity`
    ///
    /// The drag target follows the touch only if the drag is already
    /// active; a move never starts one.
    pub fn touch_moved(&mut self, at: Point, entity: Option<EntityId>) {
        let Some(entity) = entity else {
            return;
        };
        if let Some(position) = self.store.position_mut(entity) {
            position.current_position = at;
        }
        if let Some(physics_component) = self.store.physics_mut(entity) {
            if physics_component.target_position.is_some() {
                physics_component.target_position = Some(at);
            }
        }
    }

    /// Route a touch lifting off `entity`
    ///
    /// Ends the drag; the simulation owns the body again from the next
    /// frame on. The final point is still recorded as the authoritative
    /// position.
    pub fn touch_ended(&mut self, at: Point, entity: Option<EntityId>) {
        let Some(entity) = entity else {
            return;
        };
        if let Some(position) = self.store.position_mut(entity) {
            position.current_position = at;
        }
        if let Some(physics_component) = self.store.physics_mut(entity) {
            if physics_component.target_position.take().is_some() {
                debug!("Drag ended on entity {entity:?}");
            }
        }
    }

    /// Route a begin contact reported by the physics engine
    ///
    /// Each side that tracks contacts buffers the other; resolution
    /// happens in the next frame's contact pass. Bodies that no longer
    /// map to live entities are ignored.
    pub fn contact_began(&mut self, body_a: BodyHandle, body_b: BodyHandle) {
        let Some(entity_a) = self.store.entity_for_body(body_a) else {
            debug!("Contact with unknown body {body_a:?} ignored");
            return;
        };
        let Some(entity_b) = self.store.entity_for_body(body_b) else {
            debug!("Contact with unknown body {body_b:?} ignored");
            return;
        };
        if let Some(contact) = self.store.contact_mut(entity_a) {
            contact.record(entity_b);
        }
        if let Some(contact) = self.store.contact_mut(entity_b) {
            contact.record(entity_a);
        }
    }
}

fn body_shape(
    content: &ContentDescriptor,
    drawable: NodeHandle,
    renderer: &mut dyn Renderer,
) -> BodyShape {
    match content {
        ContentDescriptor::Shape(ShapeDescriptor::Circle { radius }) => {
            BodyShape::Circle { radius: *radius }
        }
        _ => {
            let size = renderer.bounding_size(drawable);
            BodyShape::Box {
                width: size.x,
                height: size.y,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentKind;
    use crate::foundation::math::Vec2;
    use crate::host::{ContactCategories, HeadlessPhysics, HeadlessRenderer};
    use approx::assert_relative_eq;

    const BALL: u32 = 0b1;
    const FLOOR: u32 = 0b100;
    const CRATE: u32 = 0b1000;

    fn demo_catalog() -> BlueprintCatalog {
        let mut catalog = BlueprintCatalog::new();
        catalog.register(
            "ball",
            EntityBlueprint::new(ContentDescriptor::Shape(ShapeDescriptor::Circle {
                radius: 20.0,
            }))
            .with_body(BodyBlueprint::dynamic(BALL)),
        );
        catalog.register(
            "crate",
            EntityBlueprint::new(ContentDescriptor::Shape(ShapeDescriptor::Rect {
                width: 50.0,
                height: 50.0,
            }))
            .with_body(BodyBlueprint::dynamic(CRATE)),
        );
        catalog.register(
            "floor",
            EntityBlueprint::new(ContentDescriptor::Shape(ShapeDescriptor::Rect {
                width: 800.0,
                height: 20.0,
            }))
            .with_body(BodyBlueprint::fixed(
                FLOOR,
                ContactCategories::mask(&[BALL, CRATE]),
            ))
            .with_contact_tracking(),
        );
        catalog.register(
            "label",
            EntityBlueprint::new(ContentDescriptor::Label {
                text: "Hello!".to_string(),
            }),
        );
        catalog
    }

    fn demo_config() -> SceneConfig {
        SceneConfig {
            contact_impulse: Vec2::new(10.0, 25.0),
            removable_categories: BALL,
            entry_scale: 1.0,
        }
    }

    fn demo_scene() -> (Scene, HeadlessRenderer, HeadlessPhysics) {
        let scene = Scene::new(demo_catalog(), demo_config());
        let renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        physics.set_gravity(Vec2::zeros());
        (scene, renderer, physics)
    }

    #[test]
    fn test_spawn_assembles_the_full_entity() {
        let (mut scene, mut renderer, mut physics) = demo_scene();

        let ball = scene
            .spawn("ball", Point::new(3.0, 7.0), &mut renderer, &mut physics)
            .unwrap();

        let store = scene.store();
        assert_eq!(
            store.position(ball).unwrap().current_position,
            Point::new(3.0, 7.0)
        );
        let proxy = store.node(ball).unwrap().node;
        assert!(renderer.is_in_scene(proxy));
        assert_eq!(renderer.position(proxy), Point::new(3.0, 7.0));

        let body = store.physics(ball).unwrap().body;
        assert!(physics.body_exists(body));
        assert_eq!(store.entity_for_body(body), Some(ball));
        assert_eq!(physics.position(body), Point::new(3.0, 7.0));

        assert!(store.scale(ball).is_some());
        assert!(store.content(ball).is_some());
        // Balls do not track contacts; the buffer is absent, not empty.
        assert!(store.contact(ball).is_none());
    }

    #[test]
    fn test_spawn_unknown_kind_leaves_no_trace() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let nodes_before = renderer.node_count();

        let result = scene.spawn("teapot", Point::origin(), &mut renderer, &mut physics);

        assert_eq!(
            result,
            Err(SpawnError::InvalidSpawnRequest("teapot".to_string()))
        );
        assert_eq!(scene.store().entity_count(), 0);
        assert_eq!(renderer.node_count(), nodes_before);
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_first_update_seeds_the_clock() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let ball = scene
            .spawn("ball", Point::origin(), &mut renderer, &mut physics)
            .unwrap();
        scene.touch_began(Point::new(10.0, 0.0), Some(ball));

        // An arbitrary start timestamp must not become a delta.
        scene.update(1000.0, &mut renderer, &mut physics);

        assert_eq!(scene.frame_count(), 1);
        assert_eq!(physics.velocity_write_count(), 0);
    }

    #[test]
    fn test_drag_lifecycle_end_to_end() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let ball = scene
            .spawn("ball", Point::origin(), &mut renderer, &mut physics)
            .unwrap();
        let body = scene.store().physics(ball).unwrap().body;

        // Grab the ball and pull it toward (10, 0).
        scene.touch_began(Point::new(10.0, 0.0), Some(ball));
        scene.update(0.0, &mut renderer, &mut physics);
        scene.update(1.0, &mut renderer, &mut physics);

        // One second of frame time, ten units of gap.
        let velocity = physics.velocity(body);
        assert_relative_eq!(velocity.x, 10.0);
        assert_relative_eq!(velocity.y, 0.0);
        assert_eq!(physics.velocity_write_count(), 1);

        // The body reaches the target and the touch lifts off.
        physics.step(1.0, &mut renderer);
        scene.touch_ended(Point::new(10.0, 0.0), Some(ball));
        assert!(!scene.store().physics(ball).unwrap().is_dragged());

        // Idle now: the simulation owns the body, no further writes.
        scene.update(2.0, &mut renderer, &mut physics);
        assert_eq!(physics.velocity_write_count(), 1);
        assert_eq!(
            scene.store().position(ball).unwrap().current_position,
            Point::new(10.0, 0.0)
        );

        // Detaching physics hands the simulated position back and
        // releases the body.
        scene
            .store_mut()
            .detach(ball, ComponentKind::Physics, &mut renderer, &mut physics)
            .unwrap();
        assert!(!physics.body_exists(body));
        let rest = scene.store().position(ball).unwrap().current_position;
        assert_relative_eq!(rest.x, 10.0);
        assert_relative_eq!(rest.y, 0.0);
    }

    #[test]
    fn test_contact_despawn_end_to_end() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let floor = scene
            .spawn("floor", Point::origin(), &mut renderer, &mut physics)
            .unwrap();
        let ball = scene
            .spawn("ball", Point::new(0.0, 5.0), &mut renderer, &mut physics)
            .unwrap();
        let ball_proxy = scene.store().node(ball).unwrap().node;
        let ball_body = scene.store().physics(ball).unwrap().body;

        // The overlapping pair begins a contact; the scene buffers it.
        let contacts = physics.step(1.0 / 60.0, &mut renderer);
        assert_eq!(contacts.len(), 1);
        for (a, b) in contacts {
            scene.contact_began(a, b);
        }
        assert_eq!(scene.store().contact(floor).unwrap().pending, vec![ball]);

        scene.update(0.0, &mut renderer, &mut physics);

        // Removable category: the ball is fully gone, no ghost entity.
        assert!(!scene.store().contains(ball));
        assert!(!renderer.is_in_scene(ball_proxy));
        assert!(!physics.body_exists(ball_body));
        assert_eq!(scene.store().entity_for_body(ball_body), None);
        assert!(scene.store().contact(floor).unwrap().pending.is_empty());
        assert_eq!(scene.store().entity_count(), 1);
    }

    #[test]
    fn test_contact_impulse_keeps_sturdy_entities() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        scene
            .spawn("floor", Point::origin(), &mut renderer, &mut physics)
            .unwrap();
        let crate_entity = scene
            .spawn("crate", Point::new(0.0, 5.0), &mut renderer, &mut physics)
            .unwrap();
        let crate_body = scene.store().physics(crate_entity).unwrap().body;

        for (a, b) in physics.step(1.0 / 60.0, &mut renderer) {
            scene.contact_began(a, b);
        }
        scene.update(0.0, &mut renderer, &mut physics);

        assert!(scene.store().contains(crate_entity));
        let velocity = physics.velocity(crate_body);
        assert_relative_eq!(velocity.x, 10.0);
        assert_relative_eq!(velocity.y, 25.0);
    }

    #[test]
    fn test_touch_moved_never_starts_a_drag() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let ball = scene
            .spawn("ball", Point::origin(), &mut renderer, &mut physics)
            .unwrap();

        scene.touch_moved(Point::new(5.0, 5.0), Some(ball));

        let physics_component = scene.store().physics(ball).unwrap();
        assert!(!physics_component.is_dragged());
        // The authoritative position still follows the touch.
        assert_eq!(
            scene.store().position(ball).unwrap().current_position,
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn test_touch_moved_updates_an_active_drag() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let ball = scene
            .spawn("ball", Point::origin(), &mut renderer, &mut physics)
            .unwrap();

        scene.touch_began(Point::new(1.0, 0.0), Some(ball));
        scene.touch_moved(Point::new(2.0, 0.0), Some(ball));

        assert_eq!(
            scene.store().physics(ball).unwrap().target_position,
            Some(Point::new(2.0, 0.0))
        );

        scene.touch_ended(Point::new(3.0, 0.0), Some(ball));
        assert_eq!(scene.store().physics(ball).unwrap().target_position, None);
        assert_eq!(
            scene.store().position(ball).unwrap().current_position,
            Point::new(3.0, 0.0)
        );
    }

    #[test]
    fn test_touch_drags_bodiless_entities_by_position() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let label = scene
            .spawn("label", Point::origin(), &mut renderer, &mut physics)
            .unwrap();
        let proxy = scene.store().node(label).unwrap().node;

        scene.touch_began(Point::new(8.0, 8.0), Some(label));
        scene.update(0.0, &mut renderer, &mut physics);

        // No body: the node sync pass mirrors the position instead.
        assert_eq!(renderer.position(proxy), Point::new(8.0, 8.0));
    }

    #[test]
    fn test_touch_without_entity_is_ignored() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        scene
            .spawn("ball", Point::origin(), &mut renderer, &mut physics)
            .unwrap();

        scene.touch_began(Point::new(50.0, 50.0), None);
        scene.update(0.0, &mut renderer, &mut physics);
        scene.update(0.1, &mut renderer, &mut physics);

        assert_eq!(physics.velocity_write_count(), 0);
    }

    #[test]
    fn test_contact_with_stale_body_is_ignored() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let floor = scene
            .spawn("floor", Point::origin(), &mut renderer, &mut physics)
            .unwrap();
        let ball = scene
            .spawn("ball", Point::new(0.0, 5.0), &mut renderer, &mut physics)
            .unwrap();
        let ball_body = scene.store().physics(ball).unwrap().body;
        scene
            .remove_entity(ball, &mut renderer, &mut physics)
            .unwrap();

        scene.contact_began(ball_body, BodyHandle(999));

        assert!(scene.store().contact(floor).unwrap().pending.is_empty());
    }

    #[test]
    fn test_despawn_during_drag_leaves_consistent_state() {
        let (mut scene, mut renderer, mut physics) = demo_scene();
        let ball = scene
            .spawn("ball", Point::origin(), &mut renderer, &mut physics)
            .unwrap();
        let proxy = scene.store().node(ball).unwrap().node;
        let body = scene.store().physics(ball).unwrap().body;
        scene.touch_began(Point::new(10.0, 0.0), Some(ball));

        scene.remove_entity(ball, &mut renderer, &mut physics).unwrap();
        scene.update(0.0, &mut renderer, &mut physics);
        scene.update(1.0, &mut renderer, &mut physics);

        assert!(!scene.store().contains(ball));
        assert!(!renderer.is_in_scene(proxy));
        assert!(!physics.body_exists(body));
        assert_eq!(physics.velocity_write_count(), 0);
    }
}
