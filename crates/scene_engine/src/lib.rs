//! # Scene Engine
//!
//! An entity-component composition engine for 2D scenes with physics,
//! touch-driven dragging, and data-driven spawning.
//!
//! ## Features
//!
//! - **Closed Component Model**: Six component kinds, one slot per entity each
//! - **Attachment Protocol**: Lifecycle hooks wire nodes and bodies together on attach and detach
//! - **Blueprint Spawning**: Entity catalogs described as data, loadable from RON
//! - **Frame Pipeline**: Contact resolution, node synchronization, deferred despawns, in that order
//! - **Host Abstraction**: Renderer and physics engine behind traits, with headless implementations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut catalog = BlueprintCatalog::new();
//!     catalog.register(
//!         "ball",
//!         EntityBlueprint::new(ContentDescriptor::Shape(ShapeDescriptor::Circle {
//!             radius: 20.0,
//!         }))
//!         .with_body(BodyBlueprint::dynamic(0b1)),
//!     );
//!
//!     let mut renderer = HeadlessRenderer::new();
//!     let mut physics = HeadlessPhysics::new();
//!     let mut scene = Scene::new(catalog, SceneConfig::default());
//!
//!     let ball = scene.spawn("ball", Point::new(0.0, 100.0), &mut renderer, &mut physics)?;
//!     scene.touch_began(Point::new(40.0, 100.0), Some(ball));
//!
//!     for frame in 0..120_i32 {
//!         let time = f64::from(frame) / 60.0;
//!         for (a, b) in physics.step(1.0 / 60.0, &mut renderer) {
//!             scene.contact_began(a, b);
//!         }
//!         scene.update(time, &mut renderer, &mut physics);
//!         renderer.advance(1.0 / 60.0);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod ecs;
pub mod host;
pub mod scene;

pub use scene::{Scene, SpawnError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Scene, SpawnError,
        ecs::{
            component::ComponentKind,
            components::{
                AnyComponent, ContactComponent, ContentComponent, NodeComponent,
                PhysicsComponent, PositionComponent, ScaleComponent,
            },
            entity::EntityId,
            error::ComponentError,
            store::ComponentStore,
            systems::{ContactPolicy, ContactResolutionSystem, NodeSyncSystem, System},
        },
        foundation::{
            math::{Point, Rect, Vec2},
            time::FrameClock,
        },
        host::{
            BodyDef, BodyHandle, BodyShape, ContactCategories, ContentDescriptor,
            HeadlessPhysics, HeadlessRenderer, NodeHandle, PhysicsEngine, Renderer,
            ShapeDescriptor,
        },
        scene::{BlueprintCatalog, BodyBlueprint, EntityBlueprint, SceneConfig},
    };
}
