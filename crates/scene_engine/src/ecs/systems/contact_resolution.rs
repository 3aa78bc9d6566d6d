//! Contact resolution system
//!
//! Drains every contact component's pending buffer once per frame and
//! applies the scene's contact policy to each struck entity: removable
//! categories are marked for deferred despawn, everything else takes a
//! fixed impulse. Stale and duplicate entries are tolerated; marking twice
//! is idempotent and a double impulse is what two recorded contacts mean.

use log::debug;

use crate::ecs::component::ComponentKind;
use crate::ecs::entity::EntityId;
use crate::ecs::store::ComponentStore;
use crate::ecs::systems::System;
use crate::foundation::math::Vec2;
use crate::host::{ContactCategories, PhysicsEngine};

/// Response policy applied to struck entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPolicy {
    /// Category mask of bodies that despawn on contact
    pub removable_categories: u32,

    /// Impulse applied to struck bodies that stay
    pub impulse: Vec2,
}

impl Default for ContactPolicy {
    fn default() -> Self {
        Self {
            removable_categories: ContactCategories::NONE,
            impulse: Vec2::zeros(),
        }
    }
}

/// System resolving buffered contacts for entities that track them
pub struct ContactResolutionSystem {
    entities: Vec<EntityId>,
    policy: ContactPolicy,
}

impl ContactResolutionSystem {
    /// Create a system applying the given policy
    pub fn new(policy: ContactPolicy) -> Self {
        Self {
            entities: Vec::new(),
            policy,
        }
    }

    /// The policy this system applies
    pub fn policy(&self) -> ContactPolicy {
        self.policy
    }

    /// Number of registered entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Run one resolution pass
    ///
    /// Every registered entity's pending buffer is emptied, whether or not
    /// its entries are actionable. Entities marked removable are pushed
    /// into `removals` for the caller to despawn at end of frame; mutating
    /// the store mid-pass is exactly what the deferral avoids.
    pub fn update(
        &mut self,
        store: &mut ComponentStore,
        physics: &mut dyn PhysicsEngine,
        removals: &mut Vec<EntityId>,
    ) {
        for &entity in &self.entities {
            let Some(contact) = store.contact_mut(entity) else {
                continue;
            };
            if contact.pending.is_empty() {
                continue;
            }
            let pending = contact.drain();

            for struck in pending {
                // Dead or bodiless entries are stale, not errors.
                let Some(struck_physics) = store.physics(struck) else {
                    continue;
                };
                if struck_physics.category & self.policy.removable_categories != 0 {
                    if !removals.contains(&struck) {
                        debug!("Contact marked entity {struck:?} for removal");
                        removals.push(struck);
                    }
                } else {
                    physics.apply_impulse(struck_physics.body, self.policy.impulse);
                }
            }
        }
    }
}

impl System for ContactResolutionSystem {
    fn component_kind(&self) -> ComponentKind {
        ComponentKind::Contact
    }

    fn register(&mut self, store: &ComponentStore, entity: EntityId) {
        if store.contact(entity).is_some() && !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    fn deregister(&mut self, entity: EntityId) {
        self.entities.retain(|&registered| registered != entity);
    }
}
