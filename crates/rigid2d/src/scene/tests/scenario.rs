//! Scenario tests: several bodies over many ticks
//!
//! These drive shapes through integration, the quadtree broad phase and the
//! solver together, checking outcomes rather than single formulas.

use crate::core::config::{PhysicsConfig, SceneConfig};
use crate::foundation::math::Vec2;
use crate::physics::{Physics, RigidShape};
use crate::scene::Scene;
use approx::assert_relative_eq;

const DT: f32 = 1.0 / 60.0;

fn zero_gravity_scene() -> Scene {
    let physics = PhysicsConfig::default().with_gravity(Vec2::zeros());
    Scene::new(SceneConfig::new("zero-g").with_physics(physics)).unwrap()
}

#[test]
fn test_falling_rectangle_meets_resting_rectangle() {
    let physics = Physics::new();
    let mut a = RigidShape::rectangle(Vec2::zeros(), 2.0, 2.0, 1.0, 0.8, 0.2);
    let mut b = RigidShape::rectangle(Vec2::new(0.0, 3.0), 2.0, 2.0, 1.0, 0.8, 0.2);
    b.velocity = Vec2::new(0.0, -1.0);

    let mut hit = None;
    for tick in 1..=120 {
        a.update(DT);
        b.update(DT);
        if let Some(info) = physics.collision(&a, &b) {
            hit = Some((tick, info));
            break;
        }
    }

    let (tick, info) = hit.expect("rectangles never touched");
    // The gap of 1.0 closes after 60 ticks
    assert!((60..=62).contains(&tick), "first contact at tick {tick}");
    assert!(info.depth > 0.0);
    assert!(info.depth < 0.05);
    assert_relative_eq!(info.normal.x, 0.0, epsilon = 1.0e-5);
    assert_relative_eq!(info.normal.y.abs(), 1.0, epsilon = 1.0e-5);
}

#[test]
fn test_head_on_rectangles_conserve_momentum() {
    let mut scene = zero_gravity_scene();
    let a = scene
        .add_body(RigidShape::rectangle(Vec2::zeros(), 2.0, 2.0, 1.0, 0.8, 0.2), false)
        .unwrap();
    let mut falling = RigidShape::rectangle(Vec2::new(0.0, 3.0), 2.0, 2.0, 1.0, 0.8, 0.2);
    falling.velocity = Vec2::new(0.0, -1.0);
    let b = scene.add_body(falling, false).unwrap();

    let mut saw_contact = false;
    for _ in 0..120 {
        scene.step();
        saw_contact |= !scene.collisions().is_empty();
    }
    assert!(saw_contact);

    let va = scene.body(a).unwrap().shape.velocity;
    let vb = scene.body(b).unwrap().shape.velocity;
    assert!(va.y < 0.0, "resting body was not pushed: {va:?}");
    assert!(vb.y > -1.0, "falling body was not slowed: {vb:?}");
    assert_relative_eq!(va.y + vb.y, -1.0, epsilon = 1.0e-3);
    assert_relative_eq!(va.x + vb.x, 0.0, epsilon = 1.0e-3);

    let ya = scene.body(a).unwrap().shape.center().y;
    let yb = scene.body(b).unwrap().shape.center().y;
    assert!(yb > ya, "bodies passed through each other");
}

#[test]
fn test_ball_comes_to_rest_on_static_ground() {
    let mut scene = Scene::new(SceneConfig::new("ground")).unwrap();
    scene
        .add_body(RigidShape::rectangle(Vec2::zeros(), 40.0, 2.0, 0.0, 0.8, 0.2), true)
        .unwrap();
    let ball = scene
        .add_body(RigidShape::circle(Vec2::new(0.0, 5.0), 1.0, 1.0, 0.5, 0.2), false)
        .unwrap();

    let mut lowest = f32::MAX;
    for _ in 0..300 {
        scene.step();
        lowest = lowest.min(scene.body(ball).unwrap().shape.center().y);
    }

    let shape = &scene.body(ball).unwrap().shape;
    // Ground top is y = 1, so the resting center is at 2
    assert!(lowest > 1.5, "ball sank to {lowest}");
    assert_relative_eq!(shape.center().y, 2.0, epsilon = 0.1);
    assert_relative_eq!(shape.center().x, 0.0, epsilon = 1.0e-3);
    assert!(shape.velocity.y.abs() < 1.0);
    assert_eq!(scene.tick_count(), 300);
}

#[test]
fn test_ground_is_never_moved() {
    let mut scene = Scene::new(SceneConfig::new("ground")).unwrap();
    let ground = scene
        .add_body(RigidShape::rectangle(Vec2::zeros(), 40.0, 2.0, 0.0, 0.8, 0.2), true)
        .unwrap();
    for x in [-6.0, -2.0, 2.0, 6.0] {
        scene
            .add_body(RigidShape::rectangle(Vec2::new(x, 4.0), 1.5, 1.5, 2.0, 0.8, 0.2), false)
            .unwrap();
    }

    for _ in 0..180 {
        scene.step();
    }

    let ground = &scene.body(ground).unwrap().shape;
    assert_eq!(ground.center(), Vec2::zeros());
    assert_eq!(ground.velocity, Vec2::zeros());
    assert_eq!(ground.angle(), 0.0);
}

#[test]
fn test_advance_uses_fixed_ticks() {
    let physics = PhysicsConfig::default()
        .with_gravity(Vec2::zeros())
        .with_fixed_timestep(0.25);
    let mut scene = Scene::new(SceneConfig::new("clock").with_physics(physics)).unwrap();
    let mut moving = RigidShape::circle(Vec2::zeros(), 1.0, 1.0, 0.5, 0.5);
    moving.velocity = Vec2::new(4.0, 0.0);
    let handle = scene.add_body(moving, false).unwrap();

    assert_eq!(scene.advance(1.0), 4);
    assert_relative_eq!(scene.body(handle).unwrap().shape.center().x, 4.0);

    // Eight substeps at most, the rest is dropped
    assert_eq!(scene.advance(10.0), 8);
    assert_eq!(scene.tick_count(), 12);
    assert_relative_eq!(scene.body(handle).unwrap().shape.center().x, 12.0);
}

#[test]
fn test_ball_thrown_out_of_world_lands_on_ground() {
    let mut scene = Scene::new(SceneConfig::new("throw")).unwrap();
    scene
        .add_body(RigidShape::rectangle(Vec2::zeros(), 40.0, 2.0, 0.0, 0.8, 0.2), true)
        .unwrap();
    let mut thrown = RigidShape::circle(Vec2::new(0.0, 90.0), 1.0, 1.0, 0.5, 0.2);
    thrown.velocity = Vec2::new(0.0, 60.0);
    let ball = scene.add_body(thrown, false).unwrap();

    // Peaks near y = 180, well above the world top at 100
    let mut left_world = false;
    let mut lowest = f32::MAX;
    for _ in 0..900 {
        scene.step();
        let body = scene.body(ball).unwrap();
        left_world |= !body.is_indexed();
        lowest = lowest.min(body.shape.center().y);
    }

    let body = scene.body(ball).unwrap();
    assert!(left_world);
    assert!(body.is_indexed());
    assert!(lowest > 1.0, "ball fell through the ground to {lowest}");
    assert_relative_eq!(body.shape.center().y, 2.0, epsilon = 0.1);
}
