//! Synthetic flower garden.
//!
//! A ring of plants around the arena centre, each carrying a few flowers on
//! tilted stems, a handful of rocks between them, and a floor plus four
//! walls tagged as the arena boundary.

use hb_core::math::euler_degrees;
use hb_core::{NodeId, Pose, Vec3};
use hb_flower::AREA_DIAMETER;
use hb_world::{SceneBuilder, SceneGraph, Shape};

/// Radius of the plant ring.
const RING_RADIUS: f32 = 4.0;
const WALL_HEIGHT: f32 = 4.0;
const WALL_THICKNESS: f32 = 0.5;

/// Flower stems: (height, tilt in degrees, yaw offset in degrees).
const STEMS: [(f32, f32, f32); 3] = [(0.9, 20.0, 0.0), (1.3, 35.0, 120.0), (1.7, 15.0, 240.0)];

/// Build the garden with `plants` plants spaced evenly around the ring.
pub fn build_garden(plants: usize) -> SceneGraph {
    let mut b = SceneBuilder::new();
    let root = b.root();

    for i in 0..plants {
        let angle = 360.0 * i as f32 / plants.max(1) as f32;
        let facing = euler_degrees(0.0, angle, 0.0);
        let plant = b.add_plant(root, Pose::new(facing * Vec3::Z * RING_RADIUS, facing));
        add_flowers(&mut b, plant);

        // A rock halfway to the next plant.
        let between = euler_degrees(0.0, angle + 180.0 / plants.max(1) as f32, 0.0);
        b.add_obstacle(
            root,
            Pose::from_position(between * Vec3::Z * (RING_RADIUS + 1.0)),
            Shape::Sphere { radius: 0.4 },
        );
    }

    add_boundary(&mut b, root);
    b.build()
}

fn add_flowers(b: &mut SceneBuilder, plant: NodeId) {
    for (height, tilt, yaw) in STEMS {
        let stem = euler_degrees(tilt, yaw, 0.0);
        b.add_flower(plant, Pose::new(Vec3::Y * height, stem));
    }
}

/// Floor with its top face at y = 0 and four walls at the arena edge.
fn add_boundary(b: &mut SceneBuilder, root: NodeId) {
    let half = AREA_DIAMETER / 2.0;
    b.add_boundary(
        root,
        Pose::from_position(Vec3::new(0.0, -WALL_THICKNESS, 0.0)),
        Vec3::new(half, WALL_THICKNESS, half),
    );

    let along_x = Vec3::new(half, WALL_HEIGHT, WALL_THICKNESS);
    let along_z = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, half);
    for (offset, extents) in [
        (Vec3::new(0.0, WALL_HEIGHT, half), along_x),
        (Vec3::new(0.0, WALL_HEIGHT, -half), along_x),
        (Vec3::new(half, WALL_HEIGHT, 0.0), along_z),
        (Vec3::new(-half, WALL_HEIGHT, 0.0), along_z),
    ] {
        b.add_boundary(root, Pose::from_position(offset), extents);
    }
}
