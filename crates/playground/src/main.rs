//! Node components playground
//!
//! A scripted, headless rendition of the touch playground: a floor and a
//! handful of shapes spawn into the scene, one of them gets dragged
//! around, and taps on empty space spawn new circles and squares. Circles
//! despawn when they hit the floor; everything else bounces off with an
//! impulse.

mod catalog;

use catalog::SceneFile;
use scene_engine::prelude::*;

/// Path the scene description is loaded from, relative to the workspace root.
const SCENE_FILE: &str = "crates/playground/scene.ron";

/// Frame period of the scripted run.
const FRAME_DELTA: f64 = 1.0 / 60.0;

/// Length of the scripted run.
const TOTAL_FRAMES: u64 = 900;

struct PlaygroundApp {
    renderer: HeadlessRenderer,
    physics: HeadlessPhysics,
    scene: Scene,
    /// Entity owning the current touch, if it landed on one.
    active_touch: Option<EntityId>,
    /// Most recent tap-spawned entity; the next tap restarts its scale.
    last_spawned: Option<EntityId>,
}

impl PlaygroundApp {
    fn new(file: SceneFile) -> Self {
        Self {
            renderer: HeadlessRenderer::new(),
            physics: HeadlessPhysics::new(),
            scene: Scene::new(file.catalog, file.config),
            active_touch: None,
            last_spawned: None,
        }
    }

    fn setup(&mut self) -> Result<(), SpawnError> {
        log::info!("Populating the scene...");
        for (kind, at) in [
            ("floor", Point::new(0.0, -200.0)),
            ("label", Point::new(0.0, 300.0)),
            ("sprite", Point::new(0.0, 100.0)),
            ("circle", Point::new(-150.0, 200.0)),
            ("square", Point::new(150.0, 200.0)),
        ] {
            self.scene
                .spawn(kind, at, &mut self.renderer, &mut self.physics)?;
        }
        Ok(())
    }

    fn run(&mut self, frames: u64) {
        log::info!("Driving {frames} frames at {:.0} Hz", 1.0 / FRAME_DELTA);
        for frame in 0..frames {
            let now = frame as f64 * FRAME_DELTA;
            self.scripted_input(frame);

            for (a, b) in self.physics.step(FRAME_DELTA as f32, &mut self.renderer) {
                self.scene.contact_began(a, b);
            }
            self.scene.update(now, &mut self.renderer, &mut self.physics);
            self.renderer.advance(FRAME_DELTA as f32);
        }
        log::info!("Playground run complete");
    }

    /// The canned touch session driving the demo.
    fn scripted_input(&mut self, frame: u64) {
        match frame {
            // Grab the square and drag it toward the middle of the scene.
            60 => self.touch_began(Point::new(150.0, 200.0)),
            61..=119 => {
                let t = (frame - 60) as f32 / 60.0;
                self.touch_moved(Point::new(
                    150.0 + (0.0 - 150.0) * t,
                    200.0 + (50.0 - 200.0) * t,
                ));
            }
            120 => self.touch_ended(Point::new(0.0, 50.0)),
            // Taps on empty space: above the midline spawns a circle,
            // below it a square.
            180 => self.touch_began(Point::new(-60.0, 120.0)),
            182 => self.touch_ended(Point::new(-60.0, 120.0)),
            300 => self.touch_began(Point::new(40.0, -80.0)),
            302 => self.touch_ended(Point::new(40.0, -80.0)),
            _ => {}
        }
    }

    fn touch_began(&mut self, at: Point) {
        self.active_touch = self.hit_test(at);
        if let Some(entity) = self.active_touch {
            log::info!("Touch at ({}, {}) grabbed entity {entity:?}", at.x, at.y);
        }
        self.scene.touch_began(at, self.active_touch);
    }

    fn touch_moved(&mut self, at: Point) {
        self.scene.touch_moved(at, self.active_touch);
    }

    fn touch_ended(&mut self, at: Point) {
        let grabbed = self.active_touch.take();
        self.scene.touch_ended(at, grabbed);
        if grabbed.is_none() {
            self.spawn_at_tap(at);
        }
    }

    /// Tap rule: restart the previous spawn's scale animation, then spawn
    /// a circle above the midline or a square below it.
    fn spawn_at_tap(&mut self, at: Point) {
        if let Some(last) = self.last_spawned {
            if self
                .scene
                .store_mut()
                .set_target_scale(last, 1.0, &mut self.renderer)
                .is_err()
            {
                log::debug!("Previous spawn {last:?} is gone; skipping scale restart");
            }
        }
        let kind = if at.y > 0.0 { "circle" } else { "square" };
        match self
            .scene
            .spawn(kind, at, &mut self.renderer, &mut self.physics)
        {
            Ok(entity) => self.last_spawned = Some(entity),
            Err(error) => log::warn!("Tap spawn failed: {error}"),
        }
    }

    /// First entity whose node covers the point, if any.
    fn hit_test(&self, at: Point) -> Option<EntityId> {
        self.scene.store().entities().find(|&entity| {
            let Some(node) = self.scene.store().node(entity) else {
                return false;
            };
            let center = self.renderer.position(node.node);
            let size = self.renderer.bounding_size(node.node);
            size.x > 0.0 && Rect::new(center, size).contains(at)
        })
    }

    fn report(&self) {
        log::info!(
            "Final scene: {} entities, {} nodes, {} bodies, {} scale animations over {} frames",
            self.scene.store().entity_count(),
            self.renderer.node_count(),
            self.physics.body_count(),
            self.renderer.animations_started(),
            self.scene.frame_count(),
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting node components playground");

    let file = SceneFile::load_or_builtin(SCENE_FILE);
    let mut app = PlaygroundApp::new(file);
    app.setup()?;
    app.run(TOTAL_FRAMES);
    app.report();
    Ok(())
}
