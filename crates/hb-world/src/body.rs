//! Minimal rigid body used by the reference physics.
//!
//! Integration is semi-implicit Euler with linear drag, matching the usual
//! game-engine behaviour: forces accumulate during a tick and are consumed
//! by the next [`RigidBody::integrate`].  No gravity: hummingbirds hover.

use hb_core::{Pose, Quat, Vec3};

/// Tunables for an agent body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BodyConfig {
    pub mass:         f32,
    /// Fraction of linear velocity removed per second.
    pub drag:         f32,
    /// Fraction of angular velocity removed per second.
    pub angular_drag: f32,
    /// Radius of the solid collision sphere around the body origin.
    pub radius:       f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass:         1.0,
            drag:         1.5,
            angular_drag: 2.0,
            radius:       0.04,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RigidBody {
    pub position:         Vec3,
    pub rotation:         Quat,
    pub velocity:         Vec3,
    pub angular_velocity: Vec3,
    pub config:           BodyConfig,
    force:                Vec3,
    sleeping:             bool,
}

impl RigidBody {
    pub fn new(pose: Pose, config: BodyConfig) -> Self {
        Self {
            position:         pose.position,
            rotation:         pose.rotation,
            velocity:         Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            config,
            force:            Vec3::ZERO,
            sleeping:         false,
        }
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Teleport the body.  Velocities are left untouched.
    #[inline]
    pub fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
    }

    /// Accumulate a world-space force for the next integration step.
    /// Wakes a sleeping body.
    pub fn add_force(&mut self, force: Vec3) {
        self.sleeping = false;
        self.force += force;
    }

    /// Force accumulated since the last integration step.
    #[inline]
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    /// Stop all motion and skip integration until woken.
    pub fn sleep(&mut self) {
        self.sleeping = true;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.force = Vec3::ZERO;
    }

    pub fn wake_up(&mut self) {
        self.sleeping = false;
    }

    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Advance position/rotation by `dt` seconds and clear accumulated force.
    pub fn integrate(&mut self, dt: f32) {
        if self.sleeping {
            self.force = Vec3::ZERO;
            return;
        }

        let inv_mass = if self.config.mass > 0.0 { 1.0 / self.config.mass } else { 0.0 };
        self.velocity += self.force * inv_mass * dt;
        self.velocity *= (1.0 - self.config.drag * dt).clamp(0.0, 1.0);
        self.position += self.velocity * dt;

        self.angular_velocity *= (1.0 - self.config.angular_drag * dt).clamp(0.0, 1.0);
        if self.angular_velocity != Vec3::ZERO {
            let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
            self.rotation = (spin * self.rotation).normalize();
        }

        self.force = Vec3::ZERO;
    }
}
