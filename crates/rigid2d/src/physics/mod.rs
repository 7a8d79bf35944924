//! Physics module for collision detection and response
//!
//! Narrow-phase shape tests, impulse resolution with positional correction,
//! and the fixed-timestep system that drives them over a quadtree broad phase.

pub mod body;
pub mod collision;
pub mod collision_layers;
pub mod resolution;
pub mod shape;
pub mod system;

pub use body::{BodyHandle, RigidBody};
pub use collision::CollisionInfo;
pub use collision_layers::CollisionLayers;
pub use resolution::Physics;
pub use shape::{RectangleGeometry, RigidShape, ShapeKind, SupportPoint};
pub use system::{BodySet, Contact, PhysicsSystem};
