//! # Core Module
//!
//! Shared configuration used by every subsystem.
//!
//! ## Organization
//!
//! - **Config**: Physics, spatial index and scene configuration

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    PhysicsConfig,
    SpatialConfig,
    SceneConfig,
    Config,
    ConfigError,
};
