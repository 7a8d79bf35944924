//! Scene-owned rigid body records

use slotmap::new_key_type;

use crate::spatial::QuadTreeKey;

use super::collision_layers::CollisionLayers;
use super::shape::RigidShape;

new_key_type! {
    /// Handle to a body owned by a scene
    pub struct BodyHandle;
}

/// A shape plus the bookkeeping the physics system needs around it
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Simulated shape and kinematic state
    pub shape: RigidShape,
    /// Kinematic bodies are never integrated and have infinite mass
    kinematic: bool,
    /// What this body is
    pub layer: CollisionLayers,
    /// What this body collides with
    pub mask: CollisionLayers,
    /// Entry in the broad-phase index, None once the body has left it
    pub(crate) spatial_key: Option<QuadTreeKey>,
}

impl RigidBody {
    /// Wrap a shape on the default layer, colliding with everything
    ///
    /// Kinematic bodies get their mass zeroed, which also clears their
    /// acceleration and inertia.
    pub fn new(mut shape: RigidShape, kinematic: bool) -> Self {
        if kinematic {
            shape.set_mass(0.0);
        }
        Self {
            shape,
            kinematic,
            layer: CollisionLayers::DEFAULT,
            mask: CollisionLayers::ALL,
            spatial_key: None,
        }
    }

    /// Set layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Whether the body is excluded from integration
    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    /// Whether the body sits in the broad-phase index
    pub fn is_indexed(&self) -> bool {
        self.spatial_key.is_some()
    }

    /// Whether the body only reports contacts
    pub fn is_trigger(&self) -> bool {
        self.layer.contains(CollisionLayers::TRIGGER)
    }

    /// Layer/mask check against another body
    pub fn should_collide(&self, other: &RigidBody) -> bool {
        CollisionLayers::should_collide(self.layer, self.mask, other.layer, other.mask)
    }
}
