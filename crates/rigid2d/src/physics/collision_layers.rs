//! Collision layer system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."

use bitflags::bitflags;

bitflags! {
    /// Collision layer and mask bits
    ///
    /// A body carries one value as its layer (what it is) and one as its mask
    /// (what it collides with). Bits 8-31 are free for game-defined layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Layer for bodies created without an explicit one
        const DEFAULT = 1 << 0;
        /// Static environment geometry
        const STATIC = 1 << 1;
        /// Ordinary simulated bodies
        const DYNAMIC = 1 << 2;
        /// Player character layer
        const PLAYER = 1 << 3;
        /// Enemy character layer
        const ENEMY = 1 << 4;
        /// Projectiles (bullets, missiles, etc.)
        const PROJECTILE = 1 << 5;
        /// Trigger volumes (contacts are reported, never resolved)
        const TRIGGER = 1 << 6;

        // Game-defined layers
        const _ = !0;
    }
}

impl CollisionLayers {
    /// Every layer bit, used as the default mask
    pub const ALL: Self = Self::all();

    /// Check if two bodies should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    ///
    /// # Example
    /// ```
    /// use rigid2d::physics::CollisionLayers;
    ///
    /// let player_mask = CollisionLayers::ENEMY | CollisionLayers::STATIC;
    /// let enemy_mask = CollisionLayers::PLAYER | CollisionLayers::PROJECTILE;
    ///
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::PLAYER, player_mask,
    ///     CollisionLayers::ENEMY, enemy_mask,
    /// ));
    /// ```
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }

    /// Custom game layer from a bit index in 8..32
    pub fn custom(bit: u32) -> Option<Self> {
        (8..32).contains(&bit).then(|| Self::from_bits_retain(1 << bit))
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::DEFAULT
    }
}
