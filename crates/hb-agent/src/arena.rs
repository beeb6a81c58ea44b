//! `Arena` — the scene, its physics and its flowers, kept in step.

use hb_core::{FlowerId, Quat, RandomSource, Vec3};
use hb_flower::{FlowerArea, FlowerColors};
use hb_world::{SceneGraph, StaticWorld};

use crate::AgentResult;

/// One flight arena.  Shared by every agent flying in it.
///
/// The three parts are public for read access and for tests; mutate them
/// through the methods below so that collider poses and enabled flags stay
/// consistent with flower state.
pub struct Arena {
    pub scene:   SceneGraph,
    pub world:   StaticWorld,
    pub flowers: FlowerArea,
}

impl Arena {
    /// Build the physics world from `scene` and discover its flowers.
    pub fn new(scene: SceneGraph, colors: FlowerColors) -> AgentResult<Self> {
        let world = StaticWorld::from_scene(&scene);
        let flowers = FlowerArea::discover(&scene, &world, colors)?;
        Ok(Self { scene, world, flowers })
    }

    /// Jitter plant orientations, refill all flowers and bring the physics
    /// world up to date.
    pub fn reset_flowers<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> AgentResult<()> {
        self.flowers.reset_flowers(&mut self.scene, rng);
        self.world.sync_poses(&self.scene);
        self.flowers.sync_colliders(&mut self.world)?;
        Ok(())
    }

    /// Push one flower's activity flags into the physics world.
    pub fn sync_flower(&mut self, id: FlowerId) -> AgentResult<()> {
        let flower = self.flowers.flower(id);
        self.world.set_enabled(flower.body_collider(), flower.is_body_active())?;
        self.world.set_enabled(flower.nectar_collider(), flower.is_nectar_active())?;
        Ok(())
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.flowers.center()
    }

    /// World rotation of the arena root.
    pub fn rotation(&self) -> Quat {
        self.scene.world_pose(self.scene.root()).rotation
    }
}
