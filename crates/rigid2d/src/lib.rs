//! # rigid2d
//!
//! A 2D rigid-body physics and spatial query core.
//!
//! ## Features
//!
//! - **Narrow Phase**: Rectangle and circle collision with separating-axis
//!   penetration search
//! - **Resolution**: Impulse response with friction and positional correction
//! - **Broad Phase**: Statically partitioned quadtree over bounding rectangles
//! - **Fixed Timestep**: Accumulator-driven ticks with capped substeps
//! - **Configuration**: TOML or RON scene files
//!
//! ## Quick Start
//!
//! ```rust
//! use rigid2d::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut scene = Scene::new(SceneConfig::new("demo"))?;
//!
//!     scene.add_body(RigidShape::rectangle(Vec2::new(0.0, -5.0), 40.0, 2.0, 0.0, 0.8, 0.2), true)?;
//!     let ball = scene.add_body(RigidShape::circle(Vec2::new(0.0, 5.0), 1.0, 1.0, 0.5, 0.2), false)?;
//!
//!     for _ in 0..60 {
//!         scene.step();
//!     }
//!     assert!(scene.body(ball).unwrap().shape.center().y < 5.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod physics;
pub mod scene;
pub mod spatial;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ConfigError, PhysicsConfig, SceneConfig, SpatialConfig},
        foundation::math::{Mat3, Transform2D, Vec2, Vec2Ext},
        physics::{
            BodyHandle, CollisionInfo, CollisionLayers, Contact, Physics, PhysicsSystem, RigidBody,
            RigidShape, ShapeKind,
        },
        scene::{BoundingRect, CollideStatus, Scene, SceneError},
        spatial::{QuadTree, QuadTreeData, QuadTreeKey, SpatialError},
    };
}
