//! Per-agent tunables.

use hb_core::Vec3;
use hb_world::BodyConfig;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Force applied per unit of the action's movement vector.
    pub move_force:      f32,
    /// Degrees per second at full pitch input.
    pub pitch_speed:     f32,
    /// Degrees per second at full yaw input.
    pub yaw_speed:       f32,
    /// Training mode: flowers reset every episode, feeding and boundary hits
    /// are rewarded, freezing is not allowed.
    pub training:        bool,
    /// Beak tip in the agent's local frame.
    pub beak_tip_offset: Vec3,
    /// Radius of the trigger sensor around the body origin.  Must reach past
    /// the beak tip for feeding contacts to be reported.
    pub sensor_radius:   f32,
    pub body:            BodyConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_force:      2.0,
            pitch_speed:     100.0,
            yaw_speed:       100.0,
            training:        true,
            beak_tip_offset: Vec3::new(0.0, 0.0, 0.06),
            sensor_radius:   0.1,
            body:            BodyConfig::default(),
        }
    }
}
