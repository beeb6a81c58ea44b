//! A scripted pilot: fly at the target, turn to face it, slow down close in.

use hb_agent::{Action, ActionSource, DecisionRequest};
use hb_core::{AgentRng, RandomSource, Vec3};
use hb_flower::AREA_DIAMETER;

/// Turn-rate gain on the heading error (radians → input units).
const TURN_GAIN: f32 = 2.0;
/// Inside this distance (metres) thrust scales down linearly.
const BRAKE_DISTANCE: f32 = 0.5;

pub struct Autopilot {
    /// Thrust at full input, as a fraction of `move_force`.
    pub throttle: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { throttle: 0.6 }
    }
}

impl ActionSource for Autopilot {
    fn decide(&self, request: &DecisionRequest, rng: &mut AgentRng) -> Action {
        let obs = &request.observation;
        if obs.is_zero() {
            // Nothing to fly to: drift and look around.
            return Action::new(Vec3::ZERO, 0.0, rng.range_f32(-0.5, 0.5));
        }

        let to_target = obs.to_target();
        let distance = obs.as_slice()[9] * AREA_DIAMETER;
        let thrust = self.throttle * (distance / BRAKE_DISTANCE).min(1.0);

        let local = request.rotation.inverse() * to_target;
        let yaw = (local.x.atan2(local.z) * TURN_GAIN).clamp(-1.0, 1.0);
        // Positive pitch is nose down: dive toward targets below.
        let pitch = (-local.y * TURN_GAIN).clamp(-1.0, 1.0);

        Action::new(to_target * thrust, pitch, yaw)
    }
}
