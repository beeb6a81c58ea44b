//! Small 3-D math helpers on top of `glam`.
//!
//! Angles in public APIs are **degrees** unless a name says otherwise; the
//! conversion to radians happens here so callers can use the same numbers
//! that appear in arena tuning (±80° pitch clamp, ±180° yaw draws, …).

use glam::{EulerRot, Mat3, Quat, Vec3};

/// World-space forward axis.
pub const FORWARD: Vec3 = Vec3::Z;
/// World-space up axis.
pub const UP: Vec3 = Vec3::Y;
/// World-space right axis.
pub const RIGHT: Vec3 = Vec3::X;

// ── Pose ──────────────────────────────────────────────────────────────────────

/// A rigid transform: translation plus rotation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose { position: Vec3::ZERO, rotation: Quat::IDENTITY };

    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pure translation.
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self { position, rotation: Quat::IDENTITY }
    }

    /// Compose `self` (parent) with `local` (child) → child in parent's space.
    #[inline]
    pub fn mul_pose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * local.position,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    /// Transform a point from local to world space.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.position + self.rotation * p
    }

    /// Transform a world-space point into this pose's local frame.
    #[inline]
    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.inverse() * (p - self.position)
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * UP
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * RIGHT
    }
}

// ── Euler angles ──────────────────────────────────────────────────────────────

/// Rotation from `(pitch, yaw, roll)` in degrees, applied roll → pitch → yaw.
#[inline]
pub fn euler_degrees(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

/// Inverse of [`euler_degrees`]: returns `(pitch, yaw, roll)` in degrees,
/// pitch in `[-90, 90]`.
///
/// At ±90° pitch yaw and roll are degenerate; roll is reported as zero and
/// the whole heading goes into yaw.
pub fn to_euler_degrees(q: Quat) -> (f32, f32, f32) {
    let m = Mat3::from_quat(q.normalize());
    let sin_pitch = (-m.z_axis.y).clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();
    let (yaw, roll) = if sin_pitch.abs() < GIMBAL_LIMIT {
        (m.z_axis.x.atan2(m.z_axis.z), m.x_axis.y.atan2(m.y_axis.y))
    } else {
        ((-m.x_axis.z).atan2(m.x_axis.x), 0.0)
    };
    (pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// |sin(pitch)| beyond which the pose is treated as gimbal-locked.
const GIMBAL_LIMIT: f32 = 0.999_999;

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Rotation whose forward axis points along `direction` with world up kept
/// upright.  Returns identity for a zero-length direction.
pub fn look_rotation(direction: Vec3) -> Quat {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let yaw = dir.x.atan2(dir.z);
    // Nose-down is positive pitch, so climbing directions get a negative angle.
    let pitch = -dir.y.clamp(-1.0, 1.0).asin();
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

// ── Scalars ───────────────────────────────────────────────────────────────────

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Clamp to `[0, 1]`.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
