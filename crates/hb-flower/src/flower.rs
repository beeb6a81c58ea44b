//! A single nectar flower.

use hb_core::{ColliderId, FlowerId, NodeId, Vec3};
use hb_world::{Capability, SceneGraph};

/// Nectar held by a full flower.
pub const NECTAR_CAPACITY: f32 = 1.0;

/// Remaining nectar at or below this is treated as empty.
///
/// Absorbs `f32` drift so that e.g. 100 feeds of 0.01 drain a full flower
/// on exactly the 100th call.
const EMPTY_EPSILON: f32 = 1e-5;

// ── Colours ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Display colours for the full and empty states.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowerColors {
    pub full:  Rgb,
    pub empty: Rgb,
}

impl Default for FlowerColors {
    fn default() -> Self {
        Self {
            full:  Rgb::new(1.0, 0.0, 0.3),
            empty: Rgb::new(0.5, 0.0, 1.0),
        }
    }
}

// ── Flower ────────────────────────────────────────────────────────────────────

/// A depletable nectar source.
///
/// Invariant: `0 <= nectar_amount() <= NECTAR_CAPACITY`.  When the amount
/// reaches zero both the body and the nectar geometry are deactivated and
/// stay that way until [`reset_flower`][Self::reset_flower].
///
/// Flowers start full.
#[derive(Clone, Debug)]
pub struct Flower {
    id:              FlowerId,
    node:            NodeId,
    body_collider:   ColliderId,
    nectar_collider: ColliderId,
    nectar_amount:   f32,
    body_active:     bool,
    nectar_active:   bool,
    colors:          FlowerColors,
    color:           Rgb,
    // Cached world geometry, refreshed by `sync_geometry`.
    position:        Vec3,
    center:          Vec3,
    up:              Vec3,
}

impl Flower {
    pub(crate) fn new(
        id:              FlowerId,
        node:            NodeId,
        body_collider:   ColliderId,
        nectar_collider: ColliderId,
        colors:          FlowerColors,
        scene:           &SceneGraph,
    ) -> Self {
        let mut flower = Self {
            id,
            node,
            body_collider,
            nectar_collider,
            nectar_amount: NECTAR_CAPACITY,
            body_active: true,
            nectar_active: true,
            colors,
            color: colors.full,
            position: Vec3::ZERO,
            center: Vec3::ZERO,
            up: Vec3::Y,
        };
        flower.sync_geometry(scene);
        flower
    }

    /// Take up to `amount` nectar.  Returns how much was actually available.
    ///
    /// The stored amount drops by the *requested* amount, not by the returned
    /// one; over-requesting simply drains the flower.  A remainder at or
    /// below `1e-5` counts as zero: the amount snaps to 0, the flower's
    /// geometry is deactivated and it turns the empty colour.  So
    /// `feed(0.999995)` on a full flower empties it.  Negative requests are
    /// treated as zero.
    pub fn feed(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let taken = amount.clamp(0.0, self.nectar_amount);

        self.nectar_amount -= amount;
        if self.nectar_amount <= EMPTY_EPSILON {
            self.nectar_amount = 0.0;
            self.body_active = false;
            self.nectar_active = false;
            self.color = self.colors.empty;
        }

        taken
    }

    /// Refill to capacity and reactivate all geometry.
    pub fn reset_flower(&mut self) {
        self.nectar_amount = NECTAR_CAPACITY;
        self.body_active = true;
        self.nectar_active = true;
        self.color = self.colors.full;
    }

    #[inline]
    pub fn has_nectar(&self) -> bool {
        self.nectar_amount > 0.0
    }

    #[inline]
    pub fn nectar_amount(&self) -> f32 {
        self.nectar_amount
    }

    #[inline]
    pub fn id(&self) -> FlowerId {
        self.id
    }

    /// Scene node of the flower root.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    pub fn body_collider(&self) -> ColliderId {
        self.body_collider
    }

    #[inline]
    pub fn nectar_collider(&self) -> ColliderId {
        self.nectar_collider
    }

    #[inline]
    pub fn is_body_active(&self) -> bool {
        self.body_active
    }

    #[inline]
    pub fn is_nectar_active(&self) -> bool {
        self.nectar_active
    }

    /// Current display colour.
    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// World position of the flower root.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit normal out of the feeding face.
    #[inline]
    pub fn up_vector(&self) -> Vec3 {
        self.up
    }

    /// World position of the nectar probe.
    #[inline]
    pub fn center_position(&self) -> Vec3 {
        self.center
    }

    /// Re-read root and probe world poses from the scene.
    pub fn sync_geometry(&mut self, scene: &SceneGraph) {
        self.position = scene.world_pose(self.node).position;
        let probe = scene
            .find_child(self.node, Capability::NectarProbe)
            .map(|n| scene.world_pose(n));
        if let Some(pose) = probe {
            self.center = pose.position;
            self.up = pose.up().normalize_or_zero();
        }
    }
}
