//! Blueprint catalog for data-driven spawning
//!
//! A blueprint is everything `Scene::spawn` needs to assemble one entity
//! kind: its visual content, an optional body, and its animation tuning.
//! Catalogs are plain serde data, so hosts can register kinds in code or
//! load a whole catalog from RON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ecs::components::ScaleComponent;
use crate::foundation::math::Vec2;
use crate::host::{ContactCategories, ContentDescriptor};

fn default_scale_rate() -> f32 {
    ScaleComponent::DEFAULT_RATE
}

/// Physics body description inside a blueprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyBlueprint {
    /// Whether the body is simulated or static
    #[serde(default = "BodyBlueprint::default_dynamic")]
    pub dynamic: bool,

    /// Category bits assigned to the body
    pub category: u32,

    /// Categories whose contacts with this body the host must report
    #[serde(default)]
    pub contact_mask: u32,
}

impl BodyBlueprint {
    fn default_dynamic() -> bool {
        true
    }

    /// Create a dynamic body blueprint with a category and no contacts
    pub fn dynamic(category: u32) -> Self {
        Self {
            dynamic: true,
            category,
            contact_mask: ContactCategories::NONE,
        }
    }

    /// Create a static body blueprint reporting contacts with `contact_mask`
    pub fn fixed(category: u32, contact_mask: u32) -> Self {
        Self {
            dynamic: false,
            category,
            contact_mask,
        }
    }
}

/// Recipe for assembling one entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityBlueprint {
    /// Visual content the renderer builds for the entity
    pub content: ContentDescriptor,

    /// Body to create, if the entity is physical
    #[serde(default)]
    pub body: Option<BodyBlueprint>,

    /// Whether the entity buffers contacts for resolution
    #[serde(default)]
    pub tracks_contacts: bool,

    /// Scale animation speed in scale units per second
    #[serde(default = "default_scale_rate")]
    pub scale_rate: f32,
}

impl EntityBlueprint {
    /// Create a blueprint with content only: no body, no contact tracking
    pub fn new(content: ContentDescriptor) -> Self {
        Self {
            content,
            body: None,
            tracks_contacts: false,
            scale_rate: ScaleComponent::DEFAULT_RATE,
        }
    }

    /// Add a body to the blueprint
    pub fn with_body(mut self, body: BodyBlueprint) -> Self {
        self.body = Some(body);
        self
    }

    /// Enable contact buffering for the blueprint
    pub fn with_contact_tracking(mut self) -> Self {
        self.tracks_contacts = true;
        self
    }
}

/// Named blueprint registry consulted by `Scene::spawn`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlueprintCatalog {
    blueprints: HashMap<String, EntityBlueprint>,
}

impl BlueprintCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Register a blueprint under a kind name, replacing any previous one
    pub fn register(&mut self, kind: impl Into<String>, blueprint: EntityBlueprint) {
        self.blueprints.insert(kind.into(), blueprint);
    }

    /// Look up a blueprint by kind name
    pub fn get(&self, kind: &str) -> Option<&EntityBlueprint> {
        self.blueprints.get(kind)
    }

    /// Iterate over the registered kind names
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.blueprints.keys().map(String::as_str)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    /// Whether the catalog has no kinds
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

/// Tunables for a scene's contact response and entry animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Impulse applied to struck bodies that stay in the scene
    pub contact_impulse: Vec2,

    /// Category mask despawned on contact
    pub removable_categories: u32,

    /// Target scale entities animate to right after spawning
    pub entry_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            contact_impulse: Vec2::zeros(),
            removable_categories: ContactCategories::NONE,
            entry_scale: 1.0,
        }
    }
}
