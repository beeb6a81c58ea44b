//! The fixed-size action and observation contracts, and the keyboard-style
//! mapping onto the action contract.

use hb_core::math::{FORWARD, RIGHT, UP};
use hb_core::{Quat, Vec3};

use crate::{AgentError, AgentResult};

/// Number of floats in an [`Action`].
pub const ACTION_LEN: usize = 5;
/// Number of floats in an [`Observation`].
pub const OBSERVATION_LEN: usize = 10;

// ── Action ────────────────────────────────────────────────────────────────────

/// `[move_x, move_y, move_z, pitch, yaw]`.
///
/// The movement triple is a world-space force direction; pitch and yaw are
/// target rotation rates.  Each element is expected in `[-1, 1]` but nothing
/// enforces it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Action(pub [f32; ACTION_LEN]);

impl Action {
    pub const ZERO: Action = Action([0.0; ACTION_LEN]);

    pub fn new(movement: Vec3, pitch: f32, yaw: f32) -> Self {
        Action([movement.x, movement.y, movement.z, pitch, yaw])
    }

    /// Build from a policy's raw output.
    pub fn from_slice(values: &[f32]) -> AgentResult<Self> {
        let arr: [f32; ACTION_LEN] = values.try_into().map_err(|_| AgentError::ActionLength {
            expected: ACTION_LEN,
            got:      values.len(),
        })?;
        Ok(Action(arr))
    }

    #[inline]
    pub fn movement(&self) -> Vec3 {
        Vec3::new(self.0[0], self.0[1], self.0[2])
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.0[4]
    }
}

// ── Observation ───────────────────────────────────────────────────────────────

/// What the policy sees each decision step.
///
/// | Index | Meaning                                                  |
/// |-------|----------------------------------------------------------|
/// | 0–3   | agent rotation relative to the arena (`x, y, z, w`)      |
/// | 4–6   | unit direction beak tip → target nectar centre           |
/// | 7     | that direction · −target up (>0: beak in front of face)  |
/// | 8     | agent forward · −target up (1: pointing straight in)     |
/// | 9     | beak tip → target distance / arena diameter              |
///
/// All zeros when the agent has no target.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Observation(pub [f32; OBSERVATION_LEN]);

impl Observation {
    pub const ZERO: Observation = Observation([0.0; OBSERVATION_LEN]);

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Unit direction to the target (indices 4–6).
    #[inline]
    pub fn to_target(&self) -> Vec3 {
        Vec3::new(self.0[4], self.0[5], self.0[6])
    }
}

// ── Manual input ──────────────────────────────────────────────────────────────

/// Held/released state of the manual flight controls.
///
/// | Field                      | Default binding |
/// |----------------------------|-----------------|
/// | `forward` / `back`         | W / S           |
/// | `left` / `right`           | A / D           |
/// | `up` / `down`              | E / C           |
/// | `pitch_up` / `pitch_down`  | ↑ / ↓           |
/// | `yaw_left` / `yaw_right`   | ← / →           |
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyState {
    pub forward:    bool,
    pub back:       bool,
    pub left:       bool,
    pub right:      bool,
    pub up:         bool,
    pub down:       bool,
    pub pitch_up:   bool,
    pub pitch_down: bool,
    pub yaw_left:   bool,
    pub yaw_right:  bool,
}

/// `+1` / `-1` / `0`; both held cancels out.
#[inline]
fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(positive as u8) - f32::from(negative as u8)
}

/// Map held keys to an [`Action`] for an agent currently at `rotation`.
///
/// Movement keys act along the agent's own axes and the combined direction
/// is normalised, so diagonal input is no faster than straight input.
/// Pitch-up is a negative pitch rate (positive pitch tilts the nose down).
pub fn heuristic_action(keys: &KeyState, rotation: Quat) -> Action {
    let forward = rotation * FORWARD * axis(keys.forward, keys.back);
    let right = rotation * RIGHT * axis(keys.right, keys.left);
    let up = rotation * UP * axis(keys.up, keys.down);
    let combined = (forward + right + up).normalize_or_zero();

    Action::new(
        combined,
        axis(keys.pitch_down, keys.pitch_up),
        axis(keys.yaw_right, keys.yaw_left),
    )
}
