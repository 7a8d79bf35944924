//! Headless physics sandbox
//!
//! Builds a scene with a static floor, a tilted ramp and a pile of boxes and
//! balls, runs it for a few simulated seconds and logs where everything
//! ended up.
//!
//! ```text
//! sandbox [config.toml|config.ron] [seconds]
//! ```

use rigid2d::core::config::{Config, SceneConfig};
use rigid2d::foundation::logging;
use rigid2d::foundation::math::{utils, Vec2};
use rigid2d::physics::{CollisionLayers, RigidShape, ShapeKind};
use rigid2d::scene::{BoundingRect, Scene};

// Scene layout
const FLOOR_WIDTH: f32 = 120.0;
const FLOOR_HEIGHT: f32 = 4.0;
const BOX_SIZE: f32 = 3.0;
const BALL_RADIUS: f32 = 1.5;
const STACK_HEIGHT: usize = 5;

// Frame pacing of the fake render loop
const FRAME_TIME: f32 = 1.0 / 30.0;
const DEFAULT_SECONDS: f32 = 5.0;

fn build_scene(config: SceneConfig) -> Result<Scene, Box<dyn std::error::Error>> {
    let mut scene = Scene::new(config)?;

    scene.add_body_with_layers(
        RigidShape::rectangle(Vec2::new(0.0, -40.0), FLOOR_WIDTH, FLOOR_HEIGHT, 0.0, 0.8, 0.2),
        true,
        CollisionLayers::STATIC,
        CollisionLayers::ALL,
    )?;

    let mut ramp = RigidShape::rectangle(Vec2::new(-30.0, -25.0), 40.0, 2.0, 0.0, 0.3, 0.1);
    ramp.rotate(utils::deg_to_rad(-17.0));
    scene.add_body_with_layers(ramp, true, CollisionLayers::STATIC, CollisionLayers::ALL)?;

    for level in 0..STACK_HEIGHT {
        let y = -38.0 + BOX_SIZE * 0.5 + level as f32 * (BOX_SIZE + 0.1);
        scene.add_body_with_layers(
            RigidShape::rectangle(Vec2::new(20.0, y), BOX_SIZE, BOX_SIZE, 1.0, 0.8, 0.1),
            false,
            CollisionLayers::DYNAMIC,
            CollisionLayers::ALL,
        )?;
    }

    for i in 0..4 {
        let x = -45.0 + i as f32 * 4.0;
        scene.add_body_with_layers(
            RigidShape::circle(Vec2::new(x, 0.0), BALL_RADIUS, 0.5, 0.4, 0.5),
            false,
            CollisionLayers::DYNAMIC,
            CollisionLayers::ALL,
        )?;
    }

    Ok(scene)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level("info");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SceneConfig::load_from_file(path)?,
        None => SceneConfig::new("sandbox"),
    };
    let seconds = match args.next() {
        Some(value) => value.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };

    let mut scene = build_scene(config)?;
    log::info!("Scene '{}' starts with {} bodies", scene.name(), scene.body_count());

    let frames = (seconds / FRAME_TIME).ceil() as u32;
    let mut contact_ticks = 0u32;
    for _ in 0..frames {
        if scene.advance(FRAME_TIME) > 0 && !scene.collisions().is_empty() {
            contact_ticks += 1;
        }
    }

    log::info!(
        "Ran {} ticks in {:.1}s, frames ending in contact: {}",
        scene.tick_count(),
        seconds,
        contact_ticks
    );

    for (handle, body) in scene.bodies() {
        let shape = &body.shape;
        let kind = match shape.kind() {
            ShapeKind::Rectangle(_) => "box",
            ShapeKind::Circle { .. } => "ball",
        };
        log::info!(
            "{:?} {:<4} center ({:>7.2}, {:>7.2}) angle {:>6.2} speed {:>6.2}{}",
            handle,
            kind,
            shape.center().x,
            shape.center().y,
            shape.angle(),
            shape.velocity.magnitude(),
            if body.is_indexed() { "" } else { " (left world)" }
        );
    }

    let floor_zone = BoundingRect::new(Vec2::new(-60.0, -42.0), Vec2::new(60.0, -30.0));
    log::info!("Bodies near the floor: {}", scene.query_area(&floor_zone).len());

    Ok(())
}
