//! Scene catalog for the node components playground
//!
//! The built-in catalog mirrors what the demo spawns: a circle, a square,
//! a greeting label, a sprite stand-in, and the static floor that catches
//! them. A RON file with the same shape can replace it at startup.

use serde::Deserialize;

use scene_engine::prelude::*;

/// Contact category for circles. Circles despawn on floor contact.
pub const CIRCLE: u32 = 1 << 0;
/// Contact category for the floor.
pub const FLOOR: u32 = 1 << 2;
/// Contact category for squares.
pub const SQUARE: u32 = 1 << 3;
/// Contact category for sprites.
pub const SPRITE: u32 = 1 << 4;

/// The blueprint catalog the playground ships with
pub fn builtin_catalog() -> BlueprintCatalog {
    let mut catalog = BlueprintCatalog::new();
    catalog.register(
        "circle",
        EntityBlueprint::new(ContentDescriptor::Shape(ShapeDescriptor::Circle {
            radius: 20.0,
        }))
        .with_body(BodyBlueprint::dynamic(CIRCLE)),
    );
    catalog.register(
        "square",
        EntityBlueprint::new(ContentDescriptor::Shape(ShapeDescriptor::Rect {
            width: 50.0,
            height: 50.0,
        }))
        .with_body(BodyBlueprint::dynamic(SQUARE)),
    );
    catalog.register(
        "label",
        EntityBlueprint::new(ContentDescriptor::Label {
            text: "Hello!".to_string(),
        }),
    );
    catalog.register(
        "sprite",
        EntityBlueprint::new(ContentDescriptor::Sprite {
            width: 100.0,
            height: 100.0,
        })
        .with_body(BodyBlueprint::dynamic(SPRITE)),
    );
    catalog.register(
        "floor",
        EntityBlueprint::new(ContentDescriptor::Shape(ShapeDescriptor::Rect {
            width: 800.0,
            height: 20.0,
        }))
        .with_body(BodyBlueprint::fixed(
            FLOOR,
            ContactCategories::mask(&[CIRCLE, SQUARE, SPRITE]),
        ))
        .with_contact_tracking(),
    );
    catalog
}

/// The scene tuning the playground ships with
pub fn builtin_config() -> SceneConfig {
    SceneConfig {
        contact_impulse: Vec2::new(10.0, 25.0),
        removable_categories: CIRCLE,
        entry_scale: 1.0,
    }
}

/// Errors loading a scene description file
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

/// On-disk scene description: tuning plus blueprint catalog
#[derive(Debug, Deserialize)]
pub struct SceneFile {
    /// Scene tuning; files that omit it keep the built-in tuning
    #[serde(default = "builtin_config")]
    pub config: SceneConfig,

    /// Blueprint catalog keyed by kind name
    pub catalog: BlueprintCatalog,
}

impl SceneFile {
    /// The scene description the playground ships with
    pub fn builtin() -> Self {
        Self {
            config: builtin_config(),
            catalog: builtin_catalog(),
        }
    }

    /// Load a scene description from a RON file
    pub fn load_from_file(path: &str) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        ron::from_str(&contents).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Load from a RON file, falling back to the built-in scene
    pub fn load_or_builtin(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(file) => {
                log::info!("Loaded scene description from {path}");
                file
            }
            Err(error) => {
                log::warn!("Failed to load {path}: {error}; using the built-in scene");
                Self::builtin()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_covers_all_kinds() {
        let catalog = builtin_catalog();

        for kind in ["circle", "square", "label", "sprite", "floor"] {
            assert!(catalog.get(kind).is_some(), "missing blueprint {kind:?}");
        }
        assert!(catalog.get("floor").unwrap().tracks_contacts);
        assert!(catalog.get("label").unwrap().body.is_none());
    }

    #[test]
    fn test_shipped_scene_file_parses() {
        let file: SceneFile = ron::from_str(include_str!("../scene.ron")).unwrap();

        assert_eq!(file.catalog.len(), builtin_catalog().len());
        let floor = file.catalog.get("floor").unwrap();
        let body = floor.body.unwrap();
        assert!(!body.dynamic);
        assert_eq!(body.category, FLOOR);
        assert_eq!(
            body.contact_mask,
            ContactCategories::mask(&[CIRCLE, SQUARE, SPRITE])
        );
        // The file carries no tuning section, so the built-in one applies.
        assert_eq!(file.config.contact_impulse, Vec2::new(10.0, 25.0));
        assert_eq!(file.config.removable_categories, CIRCLE);
    }
}
