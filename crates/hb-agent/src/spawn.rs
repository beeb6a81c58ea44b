//! Collision-free spawn placement.
//!
//! Candidates are sampled until one has nothing within [`SPAWN_CLEARANCE`]
//! or [`SPAWN_ATTEMPTS`] have been tried.  Exhausting the budget is not an
//! error: the last candidate is used and the outcome reports `safe: false`.

use hb_core::math::{FORWARD, UP, euler_degrees, look_rotation};
use hb_core::{Pose, RandomSource};
use hb_flower::FlowerArea;
use hb_world::PhysicsWorld;

/// Maximum candidates tried per spawn.
pub const SPAWN_ATTEMPTS: u32 = 100;
/// Probe radius for the overlap check.
pub const SPAWN_CLEARANCE: f32 = 0.05;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnMode {
    /// Just in front of a random flower's feeding face, beak aimed at it.
    InFrontOfFlower,
    /// Anywhere in the flight ring around the arena centre.
    Anywhere,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnOutcome {
    pub pose:     Pose,
    pub mode:     SpawnMode,
    /// Candidates sampled, `1..=SPAWN_ATTEMPTS`.
    pub attempts: u32,
    /// `false` if the budget ran out and `pose` may be colliding.
    pub safe:     bool,
}

/// Sample candidate poses until one is clear.
///
/// `InFrontOfFlower` with no flowers in the area samples `Anywhere` instead.
pub fn find_spawn_pose<W, R>(
    mode:    SpawnMode,
    flowers: &FlowerArea,
    world:   &W,
    rng:     &mut R,
) -> SpawnOutcome
where
    W: PhysicsWorld + ?Sized,
    R: RandomSource + ?Sized,
{
    let mode = if flowers.is_empty() { SpawnMode::Anywhere } else { mode };

    let mut pose = Pose::IDENTITY;
    let mut safe = false;
    let mut attempts = 0;
    while !safe && attempts < SPAWN_ATTEMPTS {
        attempts += 1;
        pose = match mode {
            SpawnMode::InFrontOfFlower => in_front_of_flower(flowers, rng),
            SpawnMode::Anywhere => anywhere(flowers, rng),
        };
        safe = world.overlap_sphere(pose.position, SPAWN_CLEARANCE).is_empty();
    }

    SpawnOutcome { pose, mode, attempts, safe }
}

/// 10–20 cm out along a random flower's up axis, looking at its centre.
fn in_front_of_flower<R: RandomSource + ?Sized>(flowers: &FlowerArea, rng: &mut R) -> Pose {
    let flower = &flowers.flowers()[rng.range_usize(0, flowers.len())];
    let distance = rng.range_f32(0.1, 0.2);
    let position = flower.position() + flower.up_vector() * distance;
    let rotation = look_rotation(flower.center_position() - position);
    Pose::new(position, rotation)
}

/// Height 1.2–2.5, radius 2–7 around the centre, pitch ±60°, any yaw.
fn anywhere<R: RandomSource + ?Sized>(flowers: &FlowerArea, rng: &mut R) -> Pose {
    let height = rng.range_f32(1.2, 2.5);
    let radius = rng.range_f32(2.0, 7.0);
    let direction = euler_degrees(0.0, rng.range_f32(-180.0, 180.0), 0.0);
    let position = flowers.center() + UP * height + direction * FORWARD * radius;

    let pitch = rng.range_f32(-60.0, 60.0);
    let yaw = rng.range_f32(-180.0, 180.0);
    Pose::new(position, euler_degrees(pitch, yaw, 0.0))
}
