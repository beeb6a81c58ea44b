//! Collider geometry and classification.

use hb_core::{ColliderId, NodeId, Pose, Vec3};

// ── Shape ─────────────────────────────────────────────────────────────────────

/// Collision geometry in the owning node's local frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Sphere { radius: f32 },
    /// Oriented box centred on the node origin.
    Cuboid { half_extents: Vec3 },
}

impl Shape {
    /// Closest point on (or inside) the shape to `point`, shape posed at `pose`.
    ///
    /// Points already inside the shape are returned unchanged.
    pub fn closest_point(&self, pose: &Pose, point: Vec3) -> Vec3 {
        match *self {
            Shape::Sphere { radius } => {
                let offset = point - pose.position;
                let dist = offset.length();
                if dist <= radius {
                    point
                } else {
                    pose.position + offset * (radius / dist)
                }
            }
            Shape::Cuboid { half_extents } => {
                let local = pose.inverse_transform_point(point);
                pose.transform_point(local.clamp(-half_extents, half_extents))
            }
        }
    }

    /// World-space axis-aligned bounds `(min, max)` of the posed shape.
    pub fn aabb(&self, pose: &Pose) -> (Vec3, Vec3) {
        let extent = match *self {
            Shape::Sphere { radius } => Vec3::splat(radius),
            Shape::Cuboid { half_extents } => {
                let x = (pose.rotation * Vec3::X).abs() * half_extents.x;
                let y = (pose.rotation * Vec3::Y).abs() * half_extents.y;
                let z = (pose.rotation * Vec3::Z).abs() * half_extents.z;
                x + y + z
            }
        };
        (pose.position - extent, pose.position + extent)
    }
}

// ── Classification ────────────────────────────────────────────────────────────

/// Whether contacts with this collider are reported as triggers (no contact
/// response) or as solid collisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColliderKind {
    Solid,
    Trigger,
}

/// What a collider means to the agent logic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColliderTag {
    /// A flower's feeding probe.
    Nectar,
    /// The arena's outer walls and floor.
    Boundary,
    /// Anything else solid (flower bodies, rocks, stems).
    Other,
}

// ── Collider ──────────────────────────────────────────────────────────────────

/// A collider registered with [`StaticWorld`][crate::StaticWorld].
#[derive(Clone, Debug)]
pub struct Collider {
    pub id:      ColliderId,
    /// Scene node the collider is attached to.
    pub node:    NodeId,
    pub shape:   Shape,
    pub kind:    ColliderKind,
    pub tag:     ColliderTag,
    /// World-space pose, refreshed by `StaticWorld::sync_poses`.
    pub pose:    Pose,
    /// Disabled colliders are invisible to every query.
    pub enabled: bool,
}

impl Collider {
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        self.shape.closest_point(&self.pose, point)
    }

    /// `true` if a sphere at `center` with `radius` touches this collider.
    #[inline]
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) <= radius * radius
    }

    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.kind == ColliderKind::Trigger
    }
}
