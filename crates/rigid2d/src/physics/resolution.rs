//! Impulse-based collision response
//!
//! [`Physics`] holds the solver settings and applies positional correction,
//! a normal impulse and a Coulomb-capped friction impulse to a colliding
//! pair. There is no per-pair state between calls (no warm starting).

use crate::core::config::PhysicsConfig;
use crate::foundation::math::{Vec2, Vec2Ext};

use super::collision::{self, CollisionInfo};
use super::shape::RigidShape;

/// Collision detection and resolution settings
#[derive(Debug, Clone, PartialEq)]
pub struct Physics {
    position_correction: bool,
    position_correction_rate: f32,
    relaxation_iterations: u32,
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

impl Physics {
    /// Default correction rate applied to residual penetration
    pub const DEFAULT_CORRECTION_RATE: f32 = 0.8;

    /// Default number of detect/resolve passes per tick
    pub const DEFAULT_RELAXATIONS: u32 = 15;

    /// Create a resolver with default settings
    pub fn new() -> Self {
        Self {
            position_correction: true,
            position_correction_rate: Self::DEFAULT_CORRECTION_RATE,
            relaxation_iterations: Self::DEFAULT_RELAXATIONS,
        }
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            position_correction: config.position_correction,
            position_correction_rate: config.position_correction_rate,
            relaxation_iterations: config.relaxation_iterations,
        }
    }

    /// Enable or disable positional correction
    pub fn set_pos_correction_flag(&mut self, enabled: bool) {
        self.position_correction = enabled;
    }

    /// Whether positional correction runs before each impulse
    pub fn pos_correction_flag(&self) -> bool {
        self.position_correction
    }

    /// Fraction of penetration removed per correction
    pub fn set_pos_correction_rate(&mut self, rate: f32) {
        self.position_correction_rate = rate.clamp(0.0, 1.0);
    }

    /// Current correction rate
    pub fn pos_correction_rate(&self) -> f32 {
        self.position_correction_rate
    }

    /// Number of detect/resolve passes run each tick
    pub fn set_num_relaxations(&mut self, iterations: u32) {
        self.relaxation_iterations = iterations;
    }

    /// Current relaxation pass count
    pub fn num_relaxations(&self) -> u32 {
        self.relaxation_iterations
    }

    /// Narrow-phase test for a pair of shapes
    pub fn collision(&self, a: &RigidShape, b: &RigidShape) -> Option<CollisionInfo> {
        collision::test_shapes(a, b)
    }

    /// Orient `info` from `a` toward `b`, then resolve
    ///
    /// Returns the oriented contact that was applied.
    pub fn resolve(&self, a: &mut RigidShape, b: &mut RigidShape, info: CollisionInfo) -> CollisionInfo {
        let info = if info.normal.dot(&(b.center() - a.center())) < 0.0 {
            info.reversed()
        } else {
            info
        };
        self.resolve_collision(a, b, &info);
        info
    }

    /// Apply positional correction and impulses for a contact oriented from `a` to `b`
    pub fn resolve_collision(&self, a: &mut RigidShape, b: &mut RigidShape, info: &CollisionInfo) {
        let inverse_mass_sum = a.inverse_mass() + b.inverse_mass();
        if inverse_mass_sum == 0.0 {
            return;
        }

        if self.position_correction {
            self.positional_correction(a, b, info);
        }

        let normal = info.normal;

        // Contact point weighted toward the lighter body's surface
        let contact = info.start * (b.inverse_mass() / inverse_mass_sum)
            + info.end * (a.inverse_mass() / inverse_mass_sum);
        let lever_a = contact - a.center();
        let lever_b = contact - b.center();

        let velocity_a = a.velocity + lever_a.angular_velocity_at(a.angular_velocity);
        let velocity_b = b.velocity + lever_b.angular_velocity_at(b.angular_velocity);
        let relative_velocity = velocity_b - velocity_a;

        let normal_velocity = relative_velocity.dot(&normal);
        if normal_velocity > 0.0 {
            return;
        }

        let restitution = a.restitution.min(b.restitution);
        let friction = a.friction.min(b.friction);

        let lever_a_cross_n = lever_a.perp(&normal);
        let lever_b_cross_n = lever_b.perp(&normal);
        let normal_mass = inverse_mass_sum
            + lever_a_cross_n * lever_a_cross_n * a.inverse_inertia()
            + lever_b_cross_n * lever_b_cross_n * b.inverse_inertia();
        let normal_impulse = -(1.0 + restitution) * normal_velocity / normal_mass;
        apply_impulse(a, b, normal, normal_impulse, lever_a_cross_n, lever_b_cross_n);

        let tangential = relative_velocity - normal * relative_velocity.dot(&normal);
        let Some(tangent) = tangential.try_normalize(f32::EPSILON).map(|t| -t) else {
            return;
        };

        let lever_a_cross_t = lever_a.perp(&tangent);
        let lever_b_cross_t = lever_b.perp(&tangent);
        let tangent_mass = inverse_mass_sum
            + lever_a_cross_t * lever_a_cross_t * a.inverse_inertia()
            + lever_b_cross_t * lever_b_cross_t * b.inverse_inertia();
        let tangent_impulse =
            (-(1.0 + restitution) * relative_velocity.dot(&tangent) * friction / tangent_mass).min(normal_impulse);
        apply_impulse(a, b, tangent, tangent_impulse, lever_a_cross_t, lever_b_cross_t);
    }

    /// Push the pair apart along the normal, split by inverse mass
    pub fn positional_correction(&self, a: &mut RigidShape, b: &mut RigidShape, info: &CollisionInfo) {
        let inverse_mass_sum = a.inverse_mass() + b.inverse_mass();
        if inverse_mass_sum == 0.0 {
            return;
        }
        let amount = info.normal * (info.depth / inverse_mass_sum * self.position_correction_rate);
        a.move_by(amount * -a.inverse_mass());
        b.move_by(amount * b.inverse_mass());
    }
}

fn apply_impulse(a: &mut RigidShape, b: &mut RigidShape, direction: Vec2, magnitude: f32, lever_a_cross: f32, lever_b_cross: f32) {
    let impulse = direction * magnitude;
    a.velocity -= impulse * a.inverse_mass();
    b.velocity += impulse * b.inverse_mass();
    a.angular_velocity -= lever_a_cross * magnitude * a.inverse_inertia();
    b.angular_velocity += lever_b_cross * magnitude * b.inverse_inertia();
}
