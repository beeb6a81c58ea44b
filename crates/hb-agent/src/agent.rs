//! `HummingbirdAgent` — episode lifecycle, flight, feeding and rewards.

use hb_core::math::{clamp01, euler_degrees, move_towards, to_euler_degrees, wrap_degrees};
use hb_core::{AgentId, ColliderId, FlowerId, Pose, RandomSource, Vec3};
use hb_flower::{AREA_DIAMETER, NearestFlower};
use hb_world::{ColliderTag, PhysicsWorld, RigidBody};
use tracing::{debug, trace, warn};

use crate::spawn::{SpawnMode, SpawnOutcome, find_spawn_pose};
use crate::{Action, AgentConfig, AgentResult, Arena, OBSERVATION_LEN, Observation};

/// Pitch is clamped to ±this many degrees so the bird cannot flip over.
pub const MAX_PITCH_DEG: f32 = 80.0;
/// The beak must be this close to the nectar probe surface to feed.
pub const BEAK_TIP_RADIUS: f32 = 0.008;
/// Nectar requested per fixed tick of feeding contact.
pub const NECTAR_PER_TICK: f32 = 0.01;
/// Base reward per successful feeding tick (training only).
pub const FEED_REWARD: f32 = 0.01;
/// Extra reward at perfect alignment with the flower (training only).
pub const ALIGNMENT_BONUS: f32 = 0.02;
/// Reward for hitting the arena boundary (training only).
pub const BOUNDARY_PENALTY: f32 = -0.5;
/// Rotation-rate smoothing, in input units per second.
const SMOOTHING_RATE: f32 = 2.0;

/// One hummingbird.
///
/// The agent owns its rigid body; the simulation integrates it and delivers
/// contacts back through [`on_trigger`][Self::on_trigger] and
/// [`on_collision_enter`][Self::on_collision_enter].  The target flower is
/// held as an ID into the arena's flower list and re-resolved on every use.
pub struct HummingbirdAgent {
    id:              AgentId,
    config:          AgentConfig,
    body:            RigidBody,
    nearest:         NearestFlower,
    smooth_pitch:    f32,
    smooth_yaw:      f32,
    nectar_obtained: f32,
    frozen:          bool,
    pending_reward:  f32,
    episode_reward:  f32,
}

impl HummingbirdAgent {
    pub fn new(id: AgentId, config: AgentConfig, pose: Pose) -> Self {
        let body = RigidBody::new(pose, config.body.clone());
        Self {
            id,
            config,
            body,
            nearest: NearestFlower::default(),
            smooth_pitch: 0.0,
            smooth_yaw: 0.0,
            nectar_obtained: 0.0,
            frozen: false,
            pending_reward: 0.0,
            episode_reward: 0.0,
        }
    }

    // ── Episode lifecycle ─────────────────────────────────────────────────

    /// Start a new episode.
    ///
    /// In training the arena's flowers are reset first (assumes one agent per
    /// arena).  The agent is stopped, its nectar and episode reward zeroed,
    /// and it is respawned: in training half the time in front of a flower,
    /// otherwise always in front of one.  The target is then re-selected.
    pub fn begin_episode<R: RandomSource + ?Sized>(
        &mut self,
        arena: &mut Arena,
        rng:   &mut R,
    ) -> AgentResult<SpawnOutcome> {
        if self.config.training {
            arena.reset_flowers(rng)?;
        }

        self.nectar_obtained = 0.0;
        self.pending_reward = 0.0;
        self.episode_reward = 0.0;
        self.body.velocity = Vec3::ZERO;
        self.body.angular_velocity = Vec3::ZERO;

        let in_front = !self.config.training || rng.value() > 0.5;
        let mode = if in_front { SpawnMode::InFrontOfFlower } else { SpawnMode::Anywhere };
        let outcome = self.move_to_safe_random_position(mode, arena, rng);

        self.update_nearest_flower(arena);
        debug!(
            agent = %self.id,
            attempts = outcome.attempts,
            safe = outcome.safe,
            target = ?self.nearest.get(),
            "episode begin"
        );
        Ok(outcome)
    }

    /// Place the agent at a collision-free pose, or the last candidate tried
    /// if none was found.
    pub fn move_to_safe_random_position<R: RandomSource + ?Sized>(
        &mut self,
        mode:  SpawnMode,
        arena: &Arena,
        rng:   &mut R,
    ) -> SpawnOutcome {
        let outcome = find_spawn_pose(mode, &arena.flowers, &arena.world, rng);
        if !outcome.safe {
            warn!(
                agent = %self.id,
                attempts = outcome.attempts,
                "no collision-free spawn found; using last candidate"
            );
        }
        self.body.set_pose(outcome.pose);
        outcome
    }

    // ── Actions ───────────────────────────────────────────────────────────

    /// Apply one fixed tick of `action`.  Ignored while frozen.
    ///
    /// The movement triple becomes a world-space force.  Pitch and yaw inputs
    /// are smoothed toward their targets at a fixed rate, integrated into the
    /// current orientation, and pitch is clamped to ±[`MAX_PITCH_DEG`].  Roll
    /// is always zero.
    pub fn apply_action(&mut self, action: &Action, dt: f32) {
        if self.frozen {
            return;
        }

        self.body.add_force(action.movement() * self.config.move_force);

        let (current_pitch, current_yaw, _) = to_euler_degrees(self.body.rotation);
        self.smooth_pitch = move_towards(self.smooth_pitch, action.pitch(), SMOOTHING_RATE * dt);
        self.smooth_yaw = move_towards(self.smooth_yaw, action.yaw(), SMOOTHING_RATE * dt);

        let pitch = wrap_degrees(current_pitch + self.smooth_pitch * dt * self.config.pitch_speed)
            .clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);
        let yaw = current_yaw + self.smooth_yaw * dt * self.config.yaw_speed;

        self.body.rotation = euler_degrees(pitch, yaw, 0.0);
    }

    // ── Observations ──────────────────────────────────────────────────────

    /// Assemble the 10-float observation.  All zeros with no target.
    pub fn collect_observations(&self, arena: &Arena) -> Observation {
        let Some(flower) = self.nearest.get().and_then(|id| arena.flowers.get(id)) else {
            return Observation::ZERO;
        };

        let local_rotation = (arena.rotation().inverse() * self.body.rotation).normalize();
        let to_flower = flower.center_position() - self.beak_tip();
        let direction = to_flower.normalize_or_zero();
        let away_from_face = -flower.up_vector().normalize_or_zero();

        let mut obs = [0.0; OBSERVATION_LEN];
        obs[0..4].copy_from_slice(&local_rotation.to_array());
        obs[4..7].copy_from_slice(&direction.to_array());
        obs[7] = direction.dot(away_from_face);
        obs[8] = self.forward().dot(away_from_face);
        obs[9] = to_flower.length() / AREA_DIAMETER;
        Observation(obs)
    }

    // ── Contacts ──────────────────────────────────────────────────────────

    /// Trigger enter or stay with `collider`.
    ///
    /// Only nectar probes matter, and only when the probe surface is within
    /// [`BEAK_TIP_RADIUS`] of the beak tip.  Returns the nectar taken, if
    /// the agent fed.
    ///
    /// # Errors
    ///
    /// A nectar collider that no flower owns is an integration bug and is
    /// reported as [`FlowerError::ProbeNotRegistered`][hb_flower::FlowerError].
    pub fn on_trigger(&mut self, collider: ColliderId, arena: &mut Arena) -> AgentResult<Option<f32>> {
        let Some(c) = arena.world.collider(collider) else { return Ok(None) };
        if c.tag != ColliderTag::Nectar {
            return Ok(None);
        }

        let beak_tip = self.beak_tip();
        let closest = c.closest_point(beak_tip);
        if beak_tip.distance(closest) >= BEAK_TIP_RADIUS {
            return Ok(None);
        }

        let flower_id = arena.flowers.flower_from_nectar(collider)?;
        let taken = arena.flowers.flower_mut(flower_id).feed(NECTAR_PER_TICK);
        self.nectar_obtained += taken;

        if self.config.training {
            let bonus = ALIGNMENT_BONUS * clamp01(self.forward().dot(-self.reward_up_axis(arena, flower_id)));
            self.add_reward(FEED_REWARD + bonus);
        }
        trace!(agent = %self.id, flower = %flower_id, taken, "fed");

        if !arena.flowers.flower(flower_id).has_nectar() {
            arena.sync_flower(flower_id)?;
            self.update_nearest_flower(arena);
        }
        Ok(Some(taken))
    }

    /// Solid collision enter.  Boundary hits are penalised in training.
    pub fn on_collision_enter(&mut self, tag: ColliderTag) {
        if self.config.training && tag == ColliderTag::Boundary {
            self.add_reward(BOUNDARY_PENALTY);
        }
    }

    /// Alignment bonus axis: the current target's, or the fed flower's if
    /// there is no target.
    fn reward_up_axis(&self, arena: &Arena, fed: FlowerId) -> Vec3 {
        let id = self.nearest.get().unwrap_or(fed);
        arena
            .flowers
            .get(id)
            .unwrap_or_else(|| arena.flowers.flower(fed))
            .up_vector()
            .normalize_or_zero()
    }

    // ── Targeting ─────────────────────────────────────────────────────────

    /// Full selection pass from the current beak tip.
    pub fn update_nearest_flower(&mut self, arena: &Arena) {
        let before = self.nearest.get();
        let after = self.nearest.update(self.beak_tip(), arena.flowers.flowers());
        if before != after {
            debug!(agent = %self.id, from = ?before, to = ?after, "target changed");
        }
    }

    /// Start-of-tick check: re-select if the held target was drained.
    pub fn refresh_target(&mut self, arena: &Arena) -> bool {
        self.nearest.refresh_if_depleted(self.beak_tip(), arena.flowers.flowers())
    }

    #[inline]
    pub fn target(&self) -> Option<FlowerId> {
        self.nearest.get()
    }

    /// Read-only debug segment: beak tip → target nectar centre.
    pub fn debug_line(&self, arena: &Arena) -> Option<(Vec3, Vec3)> {
        let flower = arena.flowers.get(self.nearest.get()?)?;
        Some((self.beak_tip(), flower.center_position()))
    }

    // ── Freeze ────────────────────────────────────────────────────────────

    /// Stop the agent and ignore actions.  Outside training only; in training
    /// this logs a warning and does nothing.
    pub fn freeze(&mut self) {
        if self.config.training {
            warn!(agent = %self.id, "freeze is not supported in training");
            return;
        }
        self.frozen = true;
        self.body.sleep();
    }

    pub fn unfreeze(&mut self) {
        if self.config.training {
            warn!(agent = %self.id, "unfreeze is not supported in training");
            return;
        }
        self.frozen = false;
        self.body.wake_up();
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // ── Rewards ───────────────────────────────────────────────────────────

    pub fn add_reward(&mut self, reward: f32) {
        self.pending_reward += reward;
        self.episode_reward += reward;
    }

    /// Reward accumulated since the last call.
    pub fn take_pending_reward(&mut self) -> f32 {
        std::mem::take(&mut self.pending_reward)
    }

    #[inline]
    pub fn pending_reward(&self) -> f32 {
        self.pending_reward
    }

    #[inline]
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    #[inline]
    pub fn nectar_obtained(&self) -> f32 {
        self.nectar_obtained
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[inline]
    pub fn is_training(&self) -> bool {
        self.config.training
    }

    #[inline]
    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.body.pose()
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.body.pose().forward()
    }

    /// World position of the beak tip.
    #[inline]
    pub fn beak_tip(&self) -> Vec3 {
        self.body.pose().transform_point(self.config.beak_tip_offset)
    }

    /// World position of the trigger sensor (the body origin).
    #[inline]
    pub fn sensor_center(&self) -> Vec3 {
        self.body.position
    }
}
