//! Scene and bounds primitives
//!
//! [`BoundingRect`] is the shared axis-aligned box used by shapes, the
//! quadtree and culling callers. [`Scene`] owns a set of bodies together
//! with the solver, the broad-phase index and the fixed-timestep loop.

mod bounding_rect;
mod physics_scene;

#[cfg(test)]
mod tests;

pub use bounding_rect::{BoundingRect, CollideStatus};
pub use physics_scene::{Scene, SceneError};
