//! Fixed-timestep physics orchestration
//!
//! Each tick integrates every non-kinematic body, then refreshes every
//! body's quadtree entry, then runs the configured number of
//! detect-and-resolve passes over the candidate pairs the quadtree yields.
//! Integration finishes for all bodies before any contact is looked at.
//!
//! A body that drifts outside the world bounds drops out of the quadtree and
//! stops colliding. Every tick it is offered to the tree again, so it picks
//! up collisions as soon as its bounds are back inside.

use slotmap::SlotMap;

use crate::core::config::{PhysicsConfig, SpatialConfig};
use crate::spatial::{QuadTree, QuadTreeData, QuadTreeKey};

use super::body::{BodyHandle, RigidBody};
use super::collision::CollisionInfo;
use super::resolution::Physics;

/// Body storage the system steps over
pub type BodySet = SlotMap<BodyHandle, RigidBody>;

/// A contact found during the last tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Body the normal points away from
    pub a: BodyHandle,
    /// Body the normal points toward
    pub b: BodyHandle,
    /// Contact geometry
    pub info: CollisionInfo,
}

/// Fixed-timestep driver for a set of bodies
#[derive(Debug, Clone)]
pub struct PhysicsSystem {
    fixed_timestep: f32,
    max_substeps: u32,
    broad_phase_margin: f32,
    accumulator: f32,
    tick_count: u64,
    contacts: Vec<Contact>,

    // Scratch buffers reused across ticks
    pairs: Vec<(BodyHandle, BodyHandle)>,
    recorded: Vec<bool>,
    candidates: Vec<QuadTreeKey>,
}

impl PhysicsSystem {
    /// Create a system ticking at `fixed_timestep` seconds
    pub fn new(fixed_timestep: f32, max_substeps: u32) -> Self {
        Self {
            fixed_timestep,
            max_substeps: max_substeps.max(1),
            broad_phase_margin: 0.0,
            accumulator: 0.0,
            tick_count: 0,
            contacts: Vec::new(),
            pairs: Vec::new(),
            recorded: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Create a system from configuration
    pub fn from_config(physics: &PhysicsConfig, spatial: &SpatialConfig) -> Self {
        Self::new(physics.fixed_timestep, physics.max_substeps)
            .with_broad_phase_margin(spatial.broad_phase_margin)
    }

    /// Grow each body's bounds by `margin` when looking for neighbours
    pub fn with_broad_phase_margin(mut self, margin: f32) -> Self {
        self.broad_phase_margin = margin.max(0.0);
        self
    }

    /// Length of one tick in seconds
    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Most ticks one `advance` call may run
    pub fn max_substeps(&self) -> u32 {
        self.max_substeps
    }

    /// Time carried over to the next `advance`
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Ticks run since creation
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Contacts found during the last tick
    ///
    /// Each pair appears at most once, with the geometry from the first
    /// relaxation pass in which it touched.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Accumulate frame time and run as many whole ticks as it covers
    ///
    /// At most `max_substeps` ticks run; whole ticks beyond that are dropped
    /// so a long frame cannot snowball. Returns the number of ticks run.
    pub fn advance(
        &mut self,
        frame_time: f32,
        bodies: &mut BodySet,
        quadtree: &mut QuadTree<BodyHandle>,
        physics: &Physics,
    ) -> u32 {
        if !(frame_time.is_finite() && frame_time > 0.0) {
            return 0;
        }

        self.accumulator += frame_time;
        let mut ticks = 0;
        while self.accumulator >= self.fixed_timestep && ticks < self.max_substeps {
            self.step(self.fixed_timestep, bodies, quadtree, physics);
            self.accumulator -= self.fixed_timestep;
            ticks += 1;
        }

        if self.accumulator >= self.fixed_timestep {
            let remainder = self.accumulator % self.fixed_timestep;
            log::warn!(
                "Physics fell behind: dropped {:.4}s after {} substeps",
                self.accumulator - remainder,
                ticks
            );
            self.accumulator = remainder;
        }
        ticks
    }

    /// Run one tick of `dt` seconds
    pub fn step(
        &mut self,
        dt: f32,
        bodies: &mut BodySet,
        quadtree: &mut QuadTree<BodyHandle>,
        physics: &Physics,
    ) {
        self.tick_count += 1;
        self.contacts.clear();

        for body in bodies.values_mut() {
            if !body.is_kinematic() {
                body.shape.update(dt);
            }
        }

        for (handle, body) in bodies.iter_mut() {
            let bounds = body.shape.bounds();
            match body.spatial_key {
                Some(key) => {
                    if !quadtree.update(key, bounds) {
                        log::warn!("Body {:?} left the world bounds and is no longer collidable", handle);
                        body.spatial_key = None;
                    }
                }
                None => {
                    body.spatial_key = quadtree.insert(QuadTreeData::new(bounds, handle));
                    if body.is_indexed() {
                        log::debug!("Body {:?} re-entered the world bounds", handle);
                    }
                }
            }
        }

        self.collect_pairs(bodies, quadtree);
        self.recorded.clear();
        self.recorded.resize(self.pairs.len(), false);

        let passes = physics.num_relaxations().max(1);
        for _ in 0..passes {
            for (index, &(handle_a, handle_b)) in self.pairs.iter().enumerate() {
                let Some([a, b]) = bodies.get_disjoint_mut([handle_a, handle_b]) else {
                    continue;
                };
                if !a.shape.bounding_radius_overlaps(&b.shape) {
                    continue;
                }
                let Some(info) = physics.collision(&a.shape, &b.shape) else {
                    continue;
                };

                let info = if a.is_trigger() || b.is_trigger() {
                    info
                } else {
                    physics.resolve(&mut a.shape, &mut b.shape, info)
                };
                if !self.recorded[index] {
                    self.recorded[index] = true;
                    self.contacts.push(Contact {
                        a: handle_a,
                        b: handle_b,
                        info,
                    });
                }
            }
        }

        log::trace!(
            "Physics tick {}: {} candidate pairs, {} contacts",
            self.tick_count,
            self.pairs.len(),
            self.contacts.len()
        );
    }

    /// Build the candidate pair list, each unordered pair once
    fn collect_pairs(&mut self, bodies: &BodySet, quadtree: &QuadTree<BodyHandle>) {
        self.pairs.clear();
        for (handle, body) in bodies.iter() {
            if body.spatial_key.is_none() {
                continue;
            }
            let area = body.shape.bounds().expanded(self.broad_phase_margin);
            quadtree.query_into(&area, &mut self.candidates);

            for key in &self.candidates {
                let Some(other) = quadtree.get(*key).map(|data| data.owner) else {
                    continue;
                };
                if other <= handle {
                    continue;
                }
                let Some(other_body) = bodies.get(other) else {
                    continue;
                };
                if body.shape.is_static() && other_body.shape.is_static() {
                    continue;
                }
                if !body.should_collide(other_body) {
                    continue;
                }
                self.pairs.push((handle, other));
            }
        }
        self.pairs.sort_unstable();
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default(), &SpatialConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::{CollisionLayers, RigidShape};
    use crate::scene::BoundingRect;
    use approx::assert_relative_eq;

    struct Fixture {
        bodies: BodySet,
        tree: QuadTree<BodyHandle>,
        physics: Physics,
        system: PhysicsSystem,
    }

    impl Fixture {
        fn new(timestep: f32) -> Self {
            let world = BoundingRect::new(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0));
            let cell = BoundingRect::new(Vec2::zeros(), Vec2::new(5.0, 5.0));
            Self {
                bodies: BodySet::with_key(),
                tree: QuadTree::create(cell, world).unwrap(),
                physics: Physics::new(),
                system: PhysicsSystem::new(timestep, 8),
            }
        }

        fn add(&mut self, body: RigidBody) -> BodyHandle {
            let bounds = body.shape.bounds();
            let handle = self.bodies.insert(body);
            self.bodies[handle].spatial_key = self.tree.insert(QuadTreeData::new(bounds, handle));
            handle
        }

        fn step(&mut self) {
            let dt = self.system.fixed_timestep();
            self.system.step(dt, &mut self.bodies, &mut self.tree, &self.physics);
        }
    }

    fn ball(x: f32, y: f32) -> RigidShape {
        RigidShape::circle(Vec2::new(x, y), 1.0, 1.0, 0.0, 1.0)
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut f = Fixture::new(0.25);

        assert_eq!(f.system.advance(1.0, &mut f.bodies, &mut f.tree, &f.physics), 4);
        assert_eq!(f.system.tick_count(), 4);

        assert_eq!(f.system.advance(0.125, &mut f.bodies, &mut f.tree, &f.physics), 0);
        assert_relative_eq!(f.system.accumulator(), 0.125);
        assert_eq!(f.system.advance(0.125, &mut f.bodies, &mut f.tree, &f.physics), 1);
        assert_relative_eq!(f.system.accumulator(), 0.0);

        assert_eq!(f.system.advance(-1.0, &mut f.bodies, &mut f.tree, &f.physics), 0);
        assert_eq!(f.system.advance(f32::NAN, &mut f.bodies, &mut f.tree, &f.physics), 0);
    }

    #[test]
    fn test_advance_caps_substeps_and_drops_excess() {
        let mut f = Fixture::new(0.25);

        assert_eq!(f.system.advance(10.0, &mut f.bodies, &mut f.tree, &f.physics), 8);
        assert_eq!(f.system.tick_count(), 8);
        assert!(f.system.accumulator() < f.system.fixed_timestep());
    }

    #[test]
    fn test_kinematic_bodies_are_not_integrated() {
        let mut f = Fixture::new(0.1);
        let mut shape = ball(0.0, 0.0);
        shape.velocity = Vec2::new(5.0, 0.0);
        let kinematic = f.add(RigidBody::new(shape.clone(), true));
        shape.set_center(Vec2::new(20.0, 0.0));
        let dynamic = f.add(RigidBody::new(shape, false));

        f.step();

        assert_eq!(f.bodies[kinematic].shape.center(), Vec2::zeros());
        assert_relative_eq!(f.bodies[dynamic].shape.center().x, 20.5, epsilon = 1.0e-5);
    }

    #[test]
    fn test_overlapping_pair_is_resolved_once_per_pass() {
        let mut f = Fixture::new(0.01);
        f.physics.set_num_relaxations(1);
        f.physics.set_pos_correction_flag(false);

        let mut left = ball(0.0, 0.0);
        left.velocity = Vec2::new(1.0, 0.0);
        let mut right = ball(1.9, 0.0);
        right.velocity = Vec2::new(-1.0, 0.0);
        let a = f.add(RigidBody::new(left, false));
        let b = f.add(RigidBody::new(right, false));

        f.step();

        let contacts = f.system.contacts();
        assert_eq!(contacts.len(), 1);
        assert_eq!((contacts[0].a, contacts[0].b), if a < b { (a, b) } else { (b, a) });
        // Equal masses with full restitution swap velocities
        assert_relative_eq!(f.bodies[a].shape.velocity.x, -1.0, epsilon = 1.0e-4);
        assert_relative_eq!(f.bodies[b].shape.velocity.x, 1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn test_layer_filter_suppresses_resolution() {
        let mut f = Fixture::new(0.01);
        let mut left = ball(0.0, 0.0);
        left.velocity = Vec2::new(1.0, 0.0);
        let a = f.add(
            RigidBody::new(left, false).with_layers(CollisionLayers::PLAYER, CollisionLayers::ENEMY),
        );
        let b = f.add(
            RigidBody::new(ball(1.5, 0.0), false)
                .with_layers(CollisionLayers::PROJECTILE, CollisionLayers::ALL),
        );

        f.step();

        assert!(f.system.contacts().is_empty());
        assert_relative_eq!(f.bodies[a].shape.velocity.x, 1.0);
        assert_eq!(f.bodies[b].shape.velocity, Vec2::zeros());
    }

    #[test]
    fn test_trigger_reports_without_response() {
        let mut f = Fixture::new(0.01);
        let mut mover = ball(0.0, 0.0);
        mover.velocity = Vec2::new(1.0, 0.0);
        let a = f.add(RigidBody::new(mover, false));
        f.add(
            RigidBody::new(ball(1.5, 0.0), true)
                .with_layers(CollisionLayers::TRIGGER, CollisionLayers::ALL),
        );

        f.step();

        assert_eq!(f.system.contacts().len(), 1);
        assert_relative_eq!(f.bodies[a].shape.velocity.x, 1.0);
        assert_relative_eq!(f.bodies[a].shape.center().x, 0.01, epsilon = 1.0e-6);
    }

    #[test]
    fn test_static_pairs_are_skipped() {
        let mut f = Fixture::new(0.01);
        f.add(RigidBody::new(ball(0.0, 0.0), true));
        f.add(RigidBody::new(ball(0.5, 0.0), true));

        f.step();

        assert!(f.system.contacts().is_empty());
    }

    #[test]
    fn test_body_leaving_world_is_unindexed() {
        let mut f = Fixture::new(1.0);
        let mut shape = ball(45.0, 0.0);
        shape.velocity = Vec2::new(100.0, 0.0);
        let handle = f.add(RigidBody::new(shape, false));
        assert!(f.bodies[handle].is_indexed());

        f.step();

        assert!(!f.bodies[handle].is_indexed());
        assert!(f.tree.is_empty());
        // Still integrated
        f.step();
        assert_relative_eq!(f.bodies[handle].shape.center().x, 245.0);
        assert!(!f.bodies[handle].is_indexed());
    }

    #[test]
    fn test_body_reentering_world_is_indexed_again() {
        let mut f = Fixture::new(1.0);
        let mut shape = ball(45.0, 0.0);
        shape.velocity = Vec2::new(100.0, 0.0);
        let handle = f.add(RigidBody::new(shape, false));
        let wall = f.add(RigidBody::new(ball(0.0, 0.0), true));

        f.step();
        assert!(!f.bodies[handle].is_indexed());

        f.bodies[handle].shape.velocity = Vec2::new(-144.5, 0.0);
        f.step();

        // Back at x = 0.5, overlapping the static ball at the origin
        assert!(f.bodies[handle].is_indexed());
        assert_eq!(f.tree.len(), 2);
        let contacts = f.system.contacts();
        assert_eq!(contacts.len(), 1);
        assert!(contacts[0].a == wall || contacts[0].b == wall);
        assert!(f.bodies[handle].shape.velocity.x > 0.0);
    }

    #[test]
    fn test_contact_found_in_later_pass_is_reported_once() {
        let mut f = Fixture::new(0.01);
        // Inserted first so its pair with the mover is checked before the wall pair
        let sensor = f.add(
            RigidBody::new(ball(3.55, 0.0), true)
                .with_layers(CollisionLayers::TRIGGER, CollisionLayers::ALL),
        );
        let wall = f.add(RigidBody::new(ball(0.0, 0.0), true));
        let mover = f.add(RigidBody::new(ball(1.5, 0.0), false));

        f.step();

        // The first pass pushes the mover off the wall and into the sensor
        let contacts = f.system.contacts();
        assert_eq!(contacts.len(), 2);
        let involves = |x: BodyHandle, y: BodyHandle| {
            contacts
                .iter()
                .filter(|c| (c.a == x && c.b == y) || (c.a == y && c.b == x))
                .count()
        };
        assert_eq!(involves(wall, mover), 1);
        assert_eq!(involves(sensor, mover), 1);
        assert!(f.bodies[mover].shape.center().x > 1.55);
    }
}
