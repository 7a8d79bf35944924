//! Physics scene
//!
//! A [`Scene`] owns the bodies, the solver settings, the broad-phase
//! quadtree and the fixed-timestep system. Nothing is global: two scenes
//! never share state.

use crate::core::config::{ConfigError, SceneConfig};
use crate::foundation::math::Vec2;
use crate::physics::{
    BodyHandle, BodySet, CollisionLayers, Contact, Physics, PhysicsSystem, RigidBody, RigidShape,
};
use crate::spatial::{QuadTree, QuadTreeData, SpatialError};

use super::BoundingRect;

/// Errors from scene construction and body management
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// The quadtree could not be built
    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),

    /// The configuration was rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A body was added entirely outside the world bounds
    #[error("body bounds {0:?} lie outside the world")]
    OutOfBounds(BoundingRect),

    /// The handle does not name a body in this scene
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
}

/// Bodies plus everything needed to simulate them
#[derive(Debug)]
pub struct Scene {
    name: String,
    gravity: Vec2,
    bodies: BodySet,
    physics: Physics,
    quadtree: QuadTree<BodyHandle>,
    system: PhysicsSystem,
}

impl Scene {
    /// Build an empty scene
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let quadtree = QuadTree::create_with_max_depth(
            config.spatial.min_bounds(),
            config.spatial.world_bounds(),
            config.spatial.max_depth,
        )?;
        let physics = Physics::from_config(&config.physics);
        let system = PhysicsSystem::from_config(&config.physics, &config.spatial);

        log::info!(
            "Created scene '{}' (dt {:.4}s, {} relaxations, {} quadtree nodes)",
            config.name,
            system.fixed_timestep(),
            physics.num_relaxations(),
            quadtree.node_count()
        );

        Ok(Self {
            name: config.name,
            gravity: config.physics.gravity,
            bodies: BodySet::with_key(),
            physics,
            quadtree,
            system,
        })
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a body on the default layer that collides with everything
    ///
    /// Dynamic bodies receive gravity as their acceleration. Kinematic
    /// bodies are made static and never integrated.
    pub fn add_body(&mut self, shape: RigidShape, kinematic: bool) -> Result<BodyHandle, SceneError> {
        self.add_body_with_layers(shape, kinematic, CollisionLayers::DEFAULT, CollisionLayers::ALL)
    }

    /// Add a body with explicit collision layer and mask
    pub fn add_body_with_layers(
        &mut self,
        shape: RigidShape,
        kinematic: bool,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Result<BodyHandle, SceneError> {
        let mut body = RigidBody::new(shape, kinematic).with_layers(layer, mask);
        if !kinematic {
            body.shape.set_acceleration(self.gravity);
        }

        let bounds = body.shape.bounds();
        let handle = self.bodies.insert(body);
        let Some(key) = self.quadtree.insert(QuadTreeData::new(bounds, handle)) else {
            self.bodies.remove(handle);
            log::warn!("Rejected body at {:?}: outside the world bounds", bounds.center());
            return Err(SceneError::OutOfBounds(bounds));
        };
        self.bodies[handle].spatial_key = Some(key);

        log::debug!(
            "Added {} body {:?} at {:?}",
            if kinematic { "kinematic" } else { "dynamic" },
            handle,
            bounds.center()
        );
        Ok(handle)
    }

    /// Remove a body, returning it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody, SceneError> {
        let mut body = self.bodies.remove(handle).ok_or(SceneError::UnknownBody(handle))?;
        if let Some(key) = body.spatial_key.take() {
            self.quadtree.remove(key);
        }
        log::debug!("Removed body {:?}", handle);
        Ok(body)
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Look up a body for modification
    ///
    /// Moving the shape directly is picked up by the quadtree on the next tick.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies.iter()
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Gravity given to dynamic bodies
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Change gravity for every current and future dynamic body
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
        for body in self.bodies.values_mut() {
            if !body.is_kinematic() {
                body.shape.set_acceleration(gravity);
            }
        }
    }

    /// Feed frame time to the fixed-timestep loop, returning ticks run
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.system
            .advance(frame_time, &mut self.bodies, &mut self.quadtree, &self.physics)
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self) {
        let dt = self.system.fixed_timestep();
        self.system.step(dt, &mut self.bodies, &mut self.quadtree, &self.physics);
    }

    /// Bodies whose quadtree cells touch `area`
    ///
    /// A candidate list for culling or picking; callers wanting exact
    /// overlap test the returned bodies' bounds.
    pub fn query_area(&self, area: &BoundingRect) -> Vec<BodyHandle> {
        self.quadtree
            .query(area)
            .into_iter()
            .filter_map(|key| self.quadtree.get(key).map(|data| data.owner))
            .collect()
    }

    /// Contacts found during the last tick
    pub fn collisions(&self) -> &[Contact] {
        self.system.contacts()
    }

    /// Solver settings
    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Mutable solver settings
    pub fn physics_mut(&mut self) -> &mut Physics {
        &mut self.physics
    }

    /// Broad-phase index
    pub fn quadtree(&self) -> &QuadTree<BodyHandle> {
        &self.quadtree
    }

    /// Ticks run since creation
    pub fn tick_count(&self) -> u64 {
        self.system.tick_count()
    }
}
