//! Math utilities and types
//!
//! Provides the 2D math types used by the physics and spatial modules.
//! Everything is a thin alias over nalgebra so callers can reach for the
//! full nalgebra API when they need it.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type (homogeneous 2D transform)
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Transform representing position, rotation, and scale in the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Position in world space
    pub position: Vec2,

    /// Rotation in radians, counter-clockwise
    pub rotation: f32,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a homogeneous transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::new_translation(&self.position)
            * Mat3::new_rotation(self.rotation)
            * Mat3::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.to_matrix()
            .transform_point(&Point2::from(point))
            .coords
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// 2D-specific helpers that nalgebra does not spell the way physics code reads
pub trait Vec2Ext {
    /// Rotate this point about `center` by `angle` radians
    fn rotate_about(&self, center: &Vec2, angle: f32) -> Vec2;

    /// Velocity contribution of an angular velocity at lever arm `self`
    fn angular_velocity_at(&self, angular_velocity: f32) -> Vec2;
}

impl Vec2Ext for Vec2 {
    fn rotate_about(&self, center: &Vec2, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        let offset = self - center;
        Vec2::new(
            offset.x * cos - offset.y * sin + center.x,
            offset.x * sin + offset.y * cos + center.y,
        )
    }

    fn angular_velocity_at(&self, angular_velocity: f32) -> Vec2 {
        Vec2::new(-angular_velocity * self.y, angular_velocity * self.x)
    }
}
