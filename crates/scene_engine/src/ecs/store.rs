//! Entity arena and the component attachment protocol
//!
//! `ComponentStore` owns every entity record and enforces the composition
//! rules: at most one component per kind, lifecycle hooks on attach and
//! detach, and generation-checked handles that fail closed once an entity
//! is gone.
//!
//! The hooks are where cross-component glue lives. Attaching a position
//! pushes it onto the node proxy; attaching physics binds the body to the
//! proxy; detaching physics hands the simulated position back to the
//! position component, unbinds the proxy, and destroys the body. The
//! components themselves stay plain data.

use std::collections::HashMap;

use log::debug;
use slotmap::SlotMap;

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{
    AnyComponent, ContactComponent, ContentComponent, NodeComponent, PhysicsComponent,
    PositionComponent, ScaleComponent,
};
use crate::ecs::entity::{EntityId, EntityRecord};
use crate::ecs::error::ComponentError;
use crate::host::{BodyHandle, PhysicsEngine, Renderer};

/// Detach order for full entity teardown. Physics goes first so its
/// position handoff still sees the node sibling; the node goes before the
/// position so the proxy is released while its last location is already
/// persisted.
const TEARDOWN_ORDER: [ComponentKind; 6] = [
    ComponentKind::Physics,
    ComponentKind::Contact,
    ComponentKind::Scale,
    ComponentKind::Content,
    ComponentKind::Node,
    ComponentKind::Position,
];

/// Arena of entities and their components
pub struct ComponentStore {
    entities: SlotMap<EntityId, EntityRecord>,
    body_index: HashMap<BodyHandle, EntityId>,
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            body_index: HashMap::new(),
        }
    }

    /// Create a bare entity with no components
    pub fn create_entity(&mut self) -> EntityId {
        let entity = self.entities.insert(EntityRecord::default());
        debug!("Created entity {entity:?}");
        entity
    }

    /// Whether the handle refers to a live entity
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate over all live entities
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    /// Entity owning the given physics body, if any
    pub fn entity_for_body(&self, body: BodyHandle) -> Option<EntityId> {
        self.body_index.get(&body).copied()
    }

    /// Attach a component to an entity
    ///
    /// Fails with [`ComponentError::DuplicateComponent`] when the entity
    /// already carries the kind; detach first to replace. On success the
    /// attach hook runs with access to the already-present siblings.
    pub fn attach(
        &mut self,
        entity: EntityId,
        component: impl Into<AnyComponent>,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
    ) -> Result<(), ComponentError> {
        let component = component.into();
        let kind = component.kind();
        let record = self
            .entities
            .get_mut(entity)
            .ok_or(ComponentError::UnknownEntity)?;
        if record.has(kind) {
            return Err(ComponentError::DuplicateComponent(kind));
        }

        match component {
            AnyComponent::Position(position) => {
                // Push the fresh position straight onto the proxy so the
                // node never shows a stale location.
                if let Some(node) = &record.node {
                    renderer.set_position(node.node, position.current_position);
                }
                record.position = Some(position);
            }
            AnyComponent::Node(node) => {
                record.node = Some(node);
            }
            AnyComponent::Physics(physics_component) => {
                if let Some(node) = &record.node {
                    physics.bind_node(physics_component.body, node.node);
                }
                self.body_index.insert(physics_component.body, entity);
                record.physics = Some(physics_component);
            }
            AnyComponent::Scale(scale) => {
                record.scale = Some(scale);
            }
            AnyComponent::Contact(contact) => {
                record.contact = Some(contact);
            }
            AnyComponent::Content(content) => {
                record.content = Some(content);
            }
        }

        debug!("Attached {kind:?} component to entity {entity:?}");
        Ok(())
    }

    /// Detach a component from an entity
    ///
    /// The will-detach hook runs before removal: physics persists its
    /// simulated position into the position sibling and releases the body,
    /// node and content release their scene graph nodes.
    pub fn detach(
        &mut self,
        entity: EntityId,
        kind: ComponentKind,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
    ) -> Result<(), ComponentError> {
        let record = self
            .entities
            .get_mut(entity)
            .ok_or(ComponentError::UnknownEntity)?;

        match kind {
            ComponentKind::Physics => {
                let physics_component = record
                    .physics
                    .take()
                    .ok_or(ComponentError::ComponentNotFound(kind))?;
                // Position handoff: the body's last simulated position
                // outlives the body.
                let last_position = physics.position(physics_component.body);
                if let Some(position) = &mut record.position {
                    position.current_position = last_position;
                }
                physics.unbind_node(physics_component.body);
                physics.destroy_body(physics_component.body);
                self.body_index.remove(&physics_component.body);
            }
            ComponentKind::Node => {
                let node = record
                    .node
                    .take()
                    .ok_or(ComponentError::ComponentNotFound(kind))?;
                renderer.remove_from_parent(node.node);
            }
            ComponentKind::Content => {
                let content = record
                    .content
                    .take()
                    .ok_or(ComponentError::ComponentNotFound(kind))?;
                renderer.remove_from_parent(content.drawable);
            }
            ComponentKind::Position => {
                record
                    .position
                    .take()
                    .ok_or(ComponentError::ComponentNotFound(kind))?;
            }
            ComponentKind::Scale => {
                record
                    .scale
                    .take()
                    .ok_or(ComponentError::ComponentNotFound(kind))?;
            }
            ComponentKind::Contact => {
                record
                    .contact
                    .take()
                    .ok_or(ComponentError::ComponentNotFound(kind))?;
            }
        }

        debug!("Detached {kind:?} component from entity {entity:?}");
        Ok(())
    }

    /// Remove an entity and everything it owns
    ///
    /// Every attached component is detached with its hook, so the body is
    /// destroyed and the nodes leave the scene graph; the arena slot is
    /// freed last. The handle is dead afterwards.
    pub fn remove_entity(
        &mut self,
        entity: EntityId,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
    ) -> Result<(), ComponentError> {
        let record = self
            .entities
            .get(entity)
            .ok_or(ComponentError::UnknownEntity)?;
        debug!(
            "Removing entity {entity:?} with components {:?}",
            record.attached_kinds()
        );

        for kind in TEARDOWN_ORDER {
            match self.detach(entity, kind, renderer, physics) {
                Ok(()) | Err(ComponentError::ComponentNotFound(_)) => {}
                Err(error) => return Err(error),
            }
        }
        self.entities.remove(entity);
        Ok(())
    }

    /// Set an entity's target scale and start the scale animation
    ///
    /// The animation duration is the distance from the node's current
    /// scale divided by the component's rate, so the speed stays constant
    /// no matter how far the target is. Re-setting the same target
    /// restarts the animation. Without a node sibling the target is
    /// stored and the animation is skipped.
    pub fn set_target_scale(
        &mut self,
        entity: EntityId,
        target: f32,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ComponentError> {
        let record = self
            .entities
            .get_mut(entity)
            .ok_or(ComponentError::UnknownEntity)?;
        let scale = record
            .scale
            .as_mut()
            .ok_or(ComponentError::ComponentNotFound(ComponentKind::Scale))?;

        scale.target_scale = target;
        if let Some(node) = &record.node {
            let current = renderer.scale(node.node);
            let duration = (target - current).abs() / scale.scale_rate;
            renderer.run_scale_animation(node.node, target, duration, ScaleComponent::ANIMATION_KEY);
        } else {
            debug!("Entity {entity:?} has no node; scale target stored without animation");
        }
        Ok(())
    }

    /// Position component of an entity
    pub fn position(&self, entity: EntityId) -> Option<&PositionComponent> {
        self.entities.get(entity)?.position.as_ref()
    }

    /// Mutable position component of an entity
    pub fn position_mut(&mut self, entity: EntityId) -> Option<&mut PositionComponent> {
        self.entities.get_mut(entity)?.position.as_mut()
    }

    /// Node component of an entity
    pub fn node(&self, entity: EntityId) -> Option<&NodeComponent> {
        self.entities.get(entity)?.node.as_ref()
    }

    /// Physics component of an entity
    pub fn physics(&self, entity: EntityId) -> Option<&PhysicsComponent> {
        self.entities.get(entity)?.physics.as_ref()
    }

    /// Mutable physics component of an entity
    pub fn physics_mut(&mut self, entity: EntityId) -> Option<&mut PhysicsComponent> {
        self.entities.get_mut(entity)?.physics.as_mut()
    }

    /// Scale component of an entity
    pub fn scale(&self, entity: EntityId) -> Option<&ScaleComponent> {
        self.entities.get(entity)?.scale.as_ref()
    }

    /// Contact component of an entity
    pub fn contact(&self, entity: EntityId) -> Option<&ContactComponent> {
        self.entities.get(entity)?.contact.as_ref()
    }

    /// Mutable contact component of an entity
    pub fn contact_mut(&mut self, entity: EntityId) -> Option<&mut ContactComponent> {
        self.entities.get_mut(entity)?.contact.as_mut()
    }

    /// Content component of an entity
    pub fn content(&self, entity: EntityId) -> Option<&ContentComponent> {
        self.entities.get(entity)?.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point, Vec2};
    use crate::host::{BodyDef, BodyShape, HeadlessPhysics, HeadlessRenderer};
    use approx::assert_relative_eq;

    fn circle_body(physics: &mut HeadlessPhysics, position: Point) -> BodyHandle {
        physics.create_body(&BodyDef {
            shape: BodyShape::Circle { radius: 10.0 },
            position,
            dynamic: true,
            category: 0b1,
            contact_mask: 0,
        })
    }

    #[test]
    fn test_attach_rejects_duplicates() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();

        store
            .attach(entity, PositionComponent::at_origin(), &mut renderer, &mut physics)
            .unwrap();
        let result = store.attach(
            entity,
            PositionComponent::new(Point::new(1.0, 1.0)),
            &mut renderer,
            &mut physics,
        );

        assert_eq!(
            result,
            Err(ComponentError::DuplicateComponent(ComponentKind::Position))
        );
        // The value from the first attach stays untouched.
        assert_eq!(
            store.position(entity).unwrap().current_position,
            Point::origin()
        );
    }

    #[test]
    fn test_attach_to_dead_entity_fails() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();
        store
            .remove_entity(entity, &mut renderer, &mut physics)
            .unwrap();

        let result = store.attach(
            entity,
            PositionComponent::at_origin(),
            &mut renderer,
            &mut physics,
        );

        assert_eq!(result, Err(ComponentError::UnknownEntity));
    }

    #[test]
    fn test_position_attach_pushes_onto_proxy() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();
        let proxy = renderer.create_node();

        store
            .attach(entity, NodeComponent::new(proxy), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(
                entity,
                PositionComponent::new(Point::new(7.0, -3.0)),
                &mut renderer,
                &mut physics,
            )
            .unwrap();

        assert_eq!(renderer.position(proxy), Point::new(7.0, -3.0));
    }

    #[test]
    fn test_physics_attach_binds_body_to_proxy() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        physics.set_gravity(Vec2::zeros());
        let entity = store.create_entity();
        let proxy = renderer.create_node();
        let body = circle_body(&mut physics, Point::origin());

        store
            .attach(entity, NodeComponent::new(proxy), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(
                entity,
                PhysicsComponent::new(body, 0b1),
                &mut renderer,
                &mut physics,
            )
            .unwrap();

        // The proxy follows the body once bound.
        physics.set_velocity(body, Vec2::new(5.0, 0.0));
        physics.step(1.0, &mut renderer);
        assert_relative_eq!(renderer.position(proxy).x, 5.0);
        assert_eq!(store.entity_for_body(body), Some(entity));
    }

    #[test]
    fn test_physics_detach_hands_position_back_and_destroys_body() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        physics.set_gravity(Vec2::zeros());
        let entity = store.create_entity();
        let proxy = renderer.create_node();
        let body = circle_body(&mut physics, Point::origin());

        store
            .attach(entity, NodeComponent::new(proxy), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(entity, PositionComponent::at_origin(), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(
                entity,
                PhysicsComponent::new(body, 0b1),
                &mut renderer,
                &mut physics,
            )
            .unwrap();

        physics.set_velocity(body, Vec2::new(3.0, 4.0));
        physics.step(1.0, &mut renderer);

        store
            .detach(entity, ComponentKind::Physics, &mut renderer, &mut physics)
            .unwrap();

        let position = store.position(entity).unwrap().current_position;
        assert_relative_eq!(position.x, 3.0);
        assert_relative_eq!(position.y, 4.0);
        assert!(!physics.body_exists(body));
        assert_eq!(store.entity_for_body(body), None);
        assert!(store.physics(entity).is_none());
    }

    #[test]
    fn test_detach_missing_component_fails() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();

        let result = store.detach(entity, ComponentKind::Scale, &mut renderer, &mut physics);

        assert_eq!(
            result,
            Err(ComponentError::ComponentNotFound(ComponentKind::Scale))
        );
    }

    #[test]
    fn test_node_detach_releases_the_proxy() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();
        let proxy = renderer.create_node();
        let root = renderer.root();
        renderer.add_child(root, proxy);

        store
            .attach(entity, NodeComponent::new(proxy), &mut renderer, &mut physics)
            .unwrap();
        store
            .detach(entity, ComponentKind::Node, &mut renderer, &mut physics)
            .unwrap();

        assert!(!renderer.is_in_scene(proxy));
    }

    #[test]
    fn test_remove_entity_tears_everything_down() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        physics.set_gravity(Vec2::zeros());
        let entity = store.create_entity();
        let proxy = renderer.create_node();
        let root = renderer.root();
        renderer.add_child(root, proxy);
        let body = circle_body(&mut physics, Point::new(2.0, 2.0));

        store
            .attach(entity, NodeComponent::new(proxy), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(entity, PositionComponent::at_origin(), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(
                entity,
                PhysicsComponent::new(body, 0b1),
                &mut renderer,
                &mut physics,
            )
            .unwrap();
        store
            .attach(entity, ContactComponent::new(), &mut renderer, &mut physics)
            .unwrap();

        store
            .remove_entity(entity, &mut renderer, &mut physics)
            .unwrap();

        assert!(!store.contains(entity));
        assert_eq!(store.entity_count(), 0);
        assert!(!physics.body_exists(body));
        assert!(!renderer.is_in_scene(proxy));
        assert_eq!(store.entity_for_body(body), None);
        // The stale handle now fails closed.
        assert_eq!(
            store.remove_entity(entity, &mut renderer, &mut physics),
            Err(ComponentError::UnknownEntity)
        );
    }

    #[test]
    fn test_set_target_scale_derives_duration_from_rate() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();
        let proxy = renderer.create_node();

        store
            .attach(entity, NodeComponent::new(proxy), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(entity, ScaleComponent::new(2.0), &mut renderer, &mut physics)
            .unwrap();

        store.set_target_scale(entity, 4.0, &mut renderer).unwrap();

        // Distance 3.0 at rate 2.0 is a 1.5 second tween.
        assert_eq!(renderer.active_animation(proxy), Some((4.0, 1.5)));
        assert_relative_eq!(store.scale(entity).unwrap().target_scale, 4.0);
    }

    #[test]
    fn test_set_target_scale_restarts_on_same_value() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();
        let proxy = renderer.create_node();

        store
            .attach(entity, NodeComponent::new(proxy), &mut renderer, &mut physics)
            .unwrap();
        store
            .attach(entity, ScaleComponent::new(1.0), &mut renderer, &mut physics)
            .unwrap();

        store.set_target_scale(entity, 2.0, &mut renderer).unwrap();
        renderer.advance(0.5);
        store.set_target_scale(entity, 2.0, &mut renderer).unwrap();

        // The tween restarted from the mid-animation scale of 1.5.
        assert_eq!(renderer.active_animation(proxy), Some((2.0, 0.5)));
        assert_eq!(renderer.animations_started(), 2);
    }

    #[test]
    fn test_set_target_scale_without_node_stores_target_only() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let mut physics = HeadlessPhysics::new();
        let entity = store.create_entity();

        store
            .attach(entity, ScaleComponent::default(), &mut renderer, &mut physics)
            .unwrap();
        store.set_target_scale(entity, 0.5, &mut renderer).unwrap();

        assert_relative_eq!(store.scale(entity).unwrap().target_scale, 0.5);
        assert_eq!(renderer.animations_started(), 0);
    }

    #[test]
    fn test_set_target_scale_requires_scale_component() {
        let mut store = ComponentStore::new();
        let mut renderer = HeadlessRenderer::new();
        let entity = store.create_entity();

        assert_eq!(
            store.set_target_scale(entity, 2.0, &mut renderer),
            Err(ComponentError::ComponentNotFound(ComponentKind::Scale))
        );
    }
}
