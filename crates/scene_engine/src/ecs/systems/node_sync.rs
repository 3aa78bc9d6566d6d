//! Node synchronization system
//!
//! Reconciles physics state, drag targets, and presentation once per
//! frame. A dragged entity gets a corrective velocity sized to carry its
//! body onto the touch target within one frame; an idle physics entity is
//! left entirely alone so the simulation owns its motion; an entity
//! without a body simply mirrors its position component onto the proxy.

use crate::ecs::component::ComponentKind;
use crate::ecs::entity::EntityId;
use crate::ecs::store::ComponentStore;
use crate::ecs::systems::System;
use crate::host::{PhysicsEngine, Renderer};

/// System driving entities that own a node component
pub struct NodeSyncSystem {
    entities: Vec<EntityId>,
}

impl Default for NodeSyncSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSyncSystem {
    /// Create a system with no registered entities
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// Number of registered entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Run one synchronization pass
    ///
    /// Entities that died since registration are skipped; their handles
    /// fail the store's generation check and resolve to nothing.
    pub fn update(
        &mut self,
        store: &ComponentStore,
        renderer: &mut dyn Renderer,
        physics: &mut dyn PhysicsEngine,
        delta_time: f32,
    ) {
        for &entity in &self.entities {
            let Some(node) = store.node(entity) else {
                continue;
            };
            let proxy = node.node;

            if let Some(physics_component) = store.physics(entity) {
                // No drag target means the simulation owns the motion;
                // writing a velocity here would fight it.
                let Some(target) = physics_component.target_position else {
                    continue;
                };
                // A zero delta cannot produce a finite velocity. The
                // seeded first frame lands here.
                if delta_time <= 0.0 {
                    continue;
                }
                let current = renderer.position(proxy);
                let velocity = (target - current) / delta_time;
                physics.set_velocity(physics_component.body, velocity);
            } else if let Some(position) = store.position(entity) {
                renderer.set_position(proxy, position.current_position);
            }
        }
    }
}

impl System for NodeSyncSystem {
    fn component_kind(&self) -> ComponentKind {
        ComponentKind::Node
    }

    fn register(&mut self, store: &ComponentStore, entity: EntityId) {
        if store.node(entity).is_some() && !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    fn deregister(&mut self, entity: EntityId) {
        self.entities.retain(|&registered| registered != entity);
    }
}
