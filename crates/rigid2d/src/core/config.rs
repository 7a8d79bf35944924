//! # Unified Configuration System
//!
//! Configuration for the physics solver, the spatial index and the scene
//! that owns both. Every struct has working defaults and `#[serde(default)]`,
//! so a file only needs the values it changes.
//!
//! ```toml
//! name = "sandbox"
//!
//! [physics]
//! gravity = [0.0, -9.81]
//! relaxation_iterations = 8
//!
//! [spatial]
//! world_min = [-50.0, -50.0]
//! world_max = [50.0, 50.0]
//! ```

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;
use crate::scene::BoundingRect;
use crate::spatial::DEFAULT_MAX_DEPTH;

// Re-export from the config module for compatibility
pub use crate::config::{Config, ConfigError};

/// # Physics Configuration
///
/// Integration step and solver tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration given to every dynamic body when it is added
    pub gravity: Vec2,
    /// Length of one physics tick in seconds
    pub fixed_timestep: f32,
    /// Most ticks a single `advance` call may run before dropping time
    pub max_substeps: u32,
    /// Whether overlap is corrected directly before impulses
    pub position_correction: bool,
    /// Fraction of the overlap removed by each correction
    pub position_correction_rate: f32,
    /// Detect/resolve passes per tick
    pub relaxation_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -20.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 8,
            position_correction: true,
            position_correction_rate: 0.8,
            relaxation_iterations: 15,
        }
    }
}

impl PhysicsConfig {
    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set tick length
    pub fn with_fixed_timestep(mut self, timestep: f32) -> Self {
        self.fixed_timestep = timestep;
        self
    }

    /// Set relaxation pass count
    pub fn with_relaxation_iterations(mut self, iterations: u32) -> Self {
        self.relaxation_iterations = iterations;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.position_correction_rate) {
            return Err(ConfigError::Invalid(format!(
                "position_correction_rate must be within [0, 1], got {}",
                self.position_correction_rate
            )));
        }
        Ok(())
    }
}

/// # Spatial Configuration
///
/// World extent and cell size of the quadtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Lower-left corner of the indexed world
    pub world_min: Vec2,
    /// Upper-right corner of the indexed world
    pub world_max: Vec2,
    /// Smallest allowed leaf size
    pub min_cell_size: Vec2,
    /// Margin added around a body's bounds when looking for neighbours
    pub broad_phase_margin: f32,
    /// Deepest quadtree level, even if the minimum cell size allows more
    pub max_depth: u32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            world_min: Vec2::new(-100.0, -100.0),
            world_max: Vec2::new(100.0, 100.0),
            min_cell_size: Vec2::new(10.0, 10.0),
            broad_phase_margin: 0.1,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SpatialConfig {
    /// World bounds as a rectangle
    pub fn world_bounds(&self) -> BoundingRect {
        BoundingRect::new(self.world_min, self.world_max)
    }

    /// Bounds whose size is the minimum cell size
    pub fn min_bounds(&self) -> BoundingRect {
        BoundingRect::new(Vec2::zeros(), self.min_cell_size)
    }

    /// Set the quadtree depth cap
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// # Scene Configuration
///
/// Top-level configuration for one physics scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene name used in log output
    pub name: String,
    /// Solver settings
    pub physics: PhysicsConfig,
    /// Spatial index settings
    pub spatial: SpatialConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new("scene")
    }
}

impl SceneConfig {
    /// Create a configuration with defaults
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            physics: PhysicsConfig::default(),
            spatial: SpatialConfig::default(),
        }
    }

    /// Replace the physics settings
    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Replace the spatial settings
    pub fn with_spatial(mut self, spatial: SpatialConfig) -> Self {
        self.spatial = spatial;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()
    }
}

impl Config for SceneConfig {}
