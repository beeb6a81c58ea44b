//! `FlowerArea` — the per-arena flower registry.
//!
//! # Discovery
//!
//! The registry is populated once from a [`SceneGraph`] by a depth-first walk
//! of the arena root.  For each child:
//!
//! - `Plant` nodes are recorded and recursed into,
//! - `Flower` nodes are registered and **not** recursed into (flowers do not
//!   nest),
//! - every other node is recursed into.
//!
//! Registration order is depth-first child order and defines [`FlowerId`]s.
//!
//! # Collider sync
//!
//! A `Flower` only flips its own activity flags; [`FlowerArea::sync_colliders`]
//! pushes them into the physics world.  Call it after any batch of feeds or
//! after [`FlowerArea::reset_flowers`].

use hb_core::math::euler_degrees;
use hb_core::{ColliderId, FlowerId, NodeId, RandomSource, Vec3};
use hb_world::{Capability, SceneGraph, StaticWorld};
use tracing::debug;

use crate::{Flower, FlowerColors, FlowerError, FlowerResult};

/// Nominal diameter of an arena, in metres.  Used to normalise distances.
pub const AREA_DIAMETER: f32 = 20.0;

/// Plant orientation jitter on reset, in degrees: `(pitch, yaw, roll)` bounds.
const PLANT_JITTER_DEG: (f32, f32, f32) = (5.0, 180.0, 5.0);

#[cfg(feature = "fx-hash")]
type ProbeMap = rustc_hash::FxHashMap<ColliderId, FlowerId>;
#[cfg(not(feature = "fx-hash"))]
type ProbeMap = std::collections::HashMap<ColliderId, FlowerId>;

// ── FlowerArea ────────────────────────────────────────────────────────────────

pub struct FlowerArea {
    root:    NodeId,
    center:  Vec3,
    flowers: Vec<Flower>,
    plants:  Vec<NodeId>,
    probes:  ProbeMap,
}

impl FlowerArea {
    /// Discover every flower and plant under the scene root.
    ///
    /// # Errors
    ///
    /// - [`FlowerError::MalformedFlower`] if a flower lacks a body or nectar
    ///   child with a registered collider.
    /// - [`FlowerError::DuplicateProbe`] if two flowers share a nectar collider.
    pub fn discover(
        scene:  &SceneGraph,
        world:  &StaticWorld,
        colors: FlowerColors,
    ) -> FlowerResult<Self> {
        let root = scene.root();
        let mut area = Self {
            root,
            center: scene.world_pose(root).position,
            flowers: Vec::new(),
            plants: Vec::new(),
            probes: ProbeMap::default(),
        };
        area.find_child_flowers(scene, world, colors, root)?;

        debug!(
            flowers = area.flowers.len(),
            plants = area.plants.len(),
            "flower area discovered"
        );
        Ok(area)
    }

    fn find_child_flowers(
        &mut self,
        scene:  &SceneGraph,
        world:  &StaticWorld,
        colors: FlowerColors,
        parent: NodeId,
    ) -> FlowerResult<()> {
        for &child in scene.children(parent) {
            match scene.node(child).capability {
                Capability::Plant => {
                    self.plants.push(child);
                    self.find_child_flowers(scene, world, colors, child)?;
                }
                Capability::Flower => self.register_flower(scene, world, colors, child)?,
                _ => self.find_child_flowers(scene, world, colors, child)?,
            }
        }
        Ok(())
    }

    fn register_flower(
        &mut self,
        scene:  &SceneGraph,
        world:  &StaticWorld,
        colors: FlowerColors,
        node:   NodeId,
    ) -> FlowerResult<()> {
        let collider_of = |capability: Capability, missing: &'static str| {
            scene
                .find_child(node, capability)
                .and_then(|child| world.collider_for_node(child))
                .ok_or(FlowerError::MalformedFlower { node, missing })
        };
        let body = collider_of(Capability::FlowerBody, "body")?;
        let nectar = collider_of(Capability::NectarProbe, "nectar")?;

        let id = FlowerId(self.flowers.len() as u32);
        if self.probes.insert(nectar, id).is_some() {
            return Err(FlowerError::DuplicateProbe(nectar));
        }
        self.flowers.push(Flower::new(id, node, body, nectar, colors, scene));
        Ok(())
    }

    // ── Episode reset ─────────────────────────────────────────────────────────

    /// Re-randomise every plant's orientation and refill every flower.
    ///
    /// Each plant gets an independent rotation with pitch and roll in ±5° and
    /// yaw in ±180°.  Cached flower geometry is refreshed from `scene`; the
    /// caller is responsible for re-syncing collider poses in the physics
    /// world and then calling [`sync_colliders`][Self::sync_colliders].
    pub fn reset_flowers<R: RandomSource + ?Sized>(
        &mut self,
        scene: &mut SceneGraph,
        rng:   &mut R,
    ) {
        let (px, py, pz) = PLANT_JITTER_DEG;
        for &plant in &self.plants {
            let pitch = rng.range_f32(-px, px);
            let yaw = rng.range_f32(-py, py);
            let roll = rng.range_f32(-pz, pz);
            scene.set_local_rotation(plant, euler_degrees(pitch, yaw, roll));
        }
        for flower in &mut self.flowers {
            flower.reset_flower();
            flower.sync_geometry(scene);
        }
    }

    /// Push each flower's body/nectar activity into the physics world.
    pub fn sync_colliders(&self, world: &mut StaticWorld) -> FlowerResult<()> {
        for flower in &self.flowers {
            world.set_enabled(flower.body_collider(), flower.is_body_active())?;
            world.set_enabled(flower.nectar_collider(), flower.is_nectar_active())?;
        }
        Ok(())
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// The flower owning nectar collider `collider`.
    ///
    /// # Errors
    ///
    /// [`FlowerError::ProbeNotRegistered`] if no flower owns it.  This is an
    /// integration bug and should be treated as fatal.
    pub fn flower_from_nectar(&self, collider: ColliderId) -> FlowerResult<FlowerId> {
        self.probes
            .get(&collider)
            .copied()
            .ok_or(FlowerError::ProbeNotRegistered(collider))
    }

    /// # Panics
    /// Panics if `id` was not issued by this area.
    #[inline]
    pub fn flower(&self, id: FlowerId) -> &Flower {
        &self.flowers[id.index()]
    }

    #[inline]
    pub fn flower_mut(&mut self, id: FlowerId) -> &mut Flower {
        &mut self.flowers[id.index()]
    }

    #[inline]
    pub fn get(&self, id: FlowerId) -> Option<&Flower> {
        self.flowers.get(id.index())
    }

    /// All flowers in discovery order.
    #[inline]
    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    #[inline]
    pub fn plants(&self) -> &[NodeId] {
        &self.plants
    }

    /// Scene node the area was discovered from.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// World position of the arena root.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    /// Sum of nectar left across all flowers.
    pub fn remaining_nectar(&self) -> f32 {
        self.flowers.iter().map(Flower::nectar_amount).sum()
    }

    pub fn flowers_with_nectar(&self) -> usize {
        self.flowers.iter().filter(|f| f.has_nectar()).count()
    }
}
