//! Unit tests for hb-world.

use hb_core::{ColliderId, Pose, Vec3};

use crate::{Capability, SceneBuilder, SceneGraph, Shape, StaticWorld};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One plant at x=3 with a single upright flower 1.5 above it, plus a floor.
fn single_flower_scene() -> SceneGraph {
    let mut b = SceneBuilder::new();
    let root = b.root();
    let plant = b.add_plant(root, Pose::from_position(Vec3::new(3.0, 0.0, 0.0)));
    b.add_flower(plant, Pose::from_position(Vec3::new(0.0, 1.5, 0.0)));
    b.add_boundary(root, Pose::from_position(Vec3::new(0.0, -0.5, 0.0)), Vec3::new(10.0, 0.5, 10.0));
    b.build()
}

// ── Shapes ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod shape_tests {
    use hb_core::math::euler_degrees;

    use super::*;

    #[test]
    fn sphere_closest_point_on_surface() {
        let shape = Shape::Sphere { radius: 1.0 };
        let pose = Pose::from_position(Vec3::new(0.0, 0.0, 0.0));
        let p = shape.closest_point(&pose, Vec3::new(3.0, 0.0, 0.0));
        assert!(p.distance(Vec3::new(1.0, 0.0, 0.0)) < 1e-6);
    }

    #[test]
    fn inside_point_is_its_own_closest_point() {
        let shape = Shape::Sphere { radius: 1.0 };
        let inside = Vec3::new(0.2, 0.1, 0.0);
        assert_eq!(shape.closest_point(&Pose::IDENTITY, inside), inside);

        let cube = Shape::Cuboid { half_extents: Vec3::splat(0.5) };
        let inside = Vec3::new(0.1, -0.2, 0.3);
        assert!(cube.closest_point(&Pose::IDENTITY, inside).distance(inside) < 1e-6);
    }

    #[test]
    fn rotated_cuboid_closest_point() {
        let cube = Shape::Cuboid { half_extents: Vec3::new(1.0, 0.1, 0.1) };
        // Long axis rotated from X onto Z.
        let pose = Pose::new(Vec3::ZERO, euler_degrees(0.0, 90.0, 0.0));
        let p = cube.closest_point(&pose, Vec3::new(0.0, 0.0, 5.0));
        assert!(p.distance(Vec3::new(0.0, 0.0, 1.0)) < 1e-5, "got {p}");
    }

    #[test]
    fn rotated_cuboid_aabb_covers_extent() {
        let cube = Shape::Cuboid { half_extents: Vec3::new(1.0, 0.1, 0.1) };
        let pose = Pose::new(Vec3::ZERO, euler_degrees(0.0, 90.0, 0.0));
        let (min, max) = cube.aabb(&pose);
        assert!((max.z - 1.0).abs() < 1e-5);
        assert!((min.z + 1.0).abs() < 1e-5);
        assert!((max.x - 0.1).abs() < 1e-5);
    }
}

// ── Scene graph ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod scene_tests {
    use hb_core::math::euler_degrees;
    use hb_core::NodeId;

    use super::*;

    #[test]
    fn flower_bundle_layout() {
        let scene = single_flower_scene();
        let flower = NodeId(2);
        assert_eq!(scene.node(flower).capability, Capability::Flower);
        assert!(scene.find_child(flower, Capability::FlowerBody).is_some());
        assert!(scene.find_child(flower, Capability::NectarProbe).is_some());
        assert!(scene.find_child(flower, Capability::Plant).is_none());
    }

    #[test]
    fn world_pose_composes_parents() {
        let scene = single_flower_scene();
        let probe = scene.find_child(NodeId(2), Capability::NectarProbe).unwrap();
        let pose = scene.world_pose(probe);
        assert!(pose.position.distance(Vec3::new(3.0, 1.52, 0.0)) < 1e-5);
    }

    #[test]
    fn rotating_a_plant_moves_its_flowers() {
        let mut b = SceneBuilder::new();
        let plant = b.add_plant(b.root(), Pose::IDENTITY);
        let flower = b.add_flower(plant, Pose::from_position(Vec3::new(0.0, 0.0, 1.0)));
        let mut scene = b.build();

        scene.set_local_rotation(plant, euler_degrees(0.0, 90.0, 0.0));
        let pos = scene.world_pose(flower).position;
        assert!(pos.distance(Vec3::new(1.0, 0.0, 0.0)) < 1e-5, "got {pos}");
    }

    #[test]
    fn root_has_no_parent() {
        let scene = single_flower_scene();
        assert!(scene.node(scene.root()).parent.is_none());
        assert_eq!(scene.node_ids().count(), scene.len());
    }
}

// ── StaticWorld ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod world_tests {
    use hb_core::math::euler_degrees;

    use super::*;
    use crate::{BodyConfig, ColliderKind, ColliderTag, PhysicsWorld, RigidBody};

    #[test]
    fn colliders_registered_with_tags() {
        let world = StaticWorld::from_scene(&single_flower_scene());
        // body, probe, floor
        assert_eq!(world.len(), 3);
        let tags: Vec<ColliderTag> = world.colliders().iter().map(|c| c.tag).collect();
        assert_eq!(tags, vec![ColliderTag::Other, ColliderTag::Nectar, ColliderTag::Boundary]);
        assert_eq!(world.colliders()[1].kind, ColliderKind::Trigger);
    }

    #[test]
    fn overlap_sphere_finds_probe() {
        let world = StaticWorld::from_scene(&single_flower_scene());
        let hits = world.overlap_sphere(Vec3::new(3.0, 1.55, 0.0), 0.05);
        assert!(hits.contains(&ColliderId(1)), "hits {hits:?}");
    }

    #[test]
    fn overlap_sphere_in_open_air_is_empty() {
        let world = StaticWorld::from_scene(&single_flower_scene());
        assert!(world.overlap_sphere(Vec3::new(-3.0, 2.0, 0.0), 0.05).is_empty());
    }

    #[test]
    fn disabled_colliders_are_invisible() {
        let mut world = StaticWorld::from_scene(&single_flower_scene());
        let probe = ColliderId(1);
        world.set_enabled(probe, false).unwrap();
        assert!(!world.is_enabled(probe));
        let hits = world.overlap_sphere(Vec3::new(3.0, 1.55, 0.0), 0.05);
        assert!(!hits.contains(&probe));
    }

    #[test]
    fn set_enabled_unknown_collider_errors() {
        let mut world = StaticWorld::from_scene(&single_flower_scene());
        assert!(world.set_enabled(ColliderId(99), false).is_err());
        assert!(!world.is_enabled(ColliderId(99)));
    }

    #[test]
    fn sync_poses_follows_plant_rotation() {
        let mut b = SceneBuilder::new();
        let plant = b.add_plant(b.root(), Pose::IDENTITY);
        let flower = b.add_flower(plant, Pose::from_position(Vec3::new(0.0, 0.0, 1.0)));
        let mut scene = b.build();
        let mut world = StaticWorld::from_scene(&scene);

        scene.set_local_rotation(plant, euler_degrees(0.0, 90.0, 0.0));
        world.sync_poses(&scene);

        let probe_node = scene.find_child(flower, Capability::NectarProbe).unwrap();
        let probe = world.collider_for_node(probe_node).unwrap();
        let hits = world.overlap_sphere(Vec3::new(1.0, 0.02, 0.0), 0.01);
        assert!(hits.contains(&probe), "hits {hits:?}");
        assert!(world.overlap_sphere(Vec3::new(0.0, 0.02, 1.0), 0.01).is_empty());
    }

    #[test]
    fn penetration_resolution_pushes_out_and_stops_inward_motion() {
        let world = StaticWorld::from_scene(&single_flower_scene());
        let mut body = RigidBody::new(
            Pose::from_position(Vec3::new(-3.0, 0.02, 0.0)),
            BodyConfig::default(),
        );
        body.velocity = Vec3::new(0.5, -1.0, 0.0);

        let touching = world.resolve_penetration(&mut body);
        assert_eq!(touching, vec![ColliderId(2)]);
        assert!((body.position.y - body.config.radius).abs() < 1e-5);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.velocity.x, 0.5);
    }

    #[test]
    fn triggers_do_not_block_bodies() {
        let world = StaticWorld::from_scene(&single_flower_scene());
        let start = Vec3::new(3.0, 1.55, 0.0);
        let mut body = RigidBody::new(Pose::from_position(start), BodyConfig::default());
        let solids = world.resolve_penetration(&mut body);
        assert!(solids.is_empty());
        assert_eq!(body.position, start);
    }
}

// ── RigidBody ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod body_tests {
    use super::*;
    use crate::{BodyConfig, RigidBody};

    fn frictionless() -> BodyConfig {
        BodyConfig { mass: 2.0, drag: 0.0, angular_drag: 0.0, radius: 0.05 }
    }

    #[test]
    fn force_accelerates_then_clears() {
        let mut body = RigidBody::new(Pose::IDENTITY, frictionless());
        body.add_force(Vec3::new(4.0, 0.0, 0.0));
        body.integrate(0.5);
        // a = F/m = 2, v = 1, x = 0.5
        assert!((body.velocity.x - 1.0).abs() < 1e-6);
        assert!((body.position.x - 0.5).abs() < 1e-6);
        assert_eq!(body.pending_force(), Vec3::ZERO);
    }

    #[test]
    fn drag_slows_the_body() {
        let mut body = RigidBody::new(Pose::IDENTITY, BodyConfig::default());
        body.velocity = Vec3::new(1.0, 0.0, 0.0);
        body.integrate(0.02);
        assert!(body.velocity.x < 1.0);
    }

    #[test]
    fn sleeping_body_does_not_move() {
        let mut body = RigidBody::new(Pose::IDENTITY, frictionless());
        body.velocity = Vec3::new(1.0, 0.0, 0.0);
        body.sleep();
        body.integrate(1.0);
        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.velocity, Vec3::ZERO);
        body.wake_up();
        assert!(!body.is_sleeping());
    }

    #[test]
    fn add_force_wakes_body() {
        let mut body = RigidBody::new(Pose::IDENTITY, frictionless());
        body.sleep();
        body.add_force(Vec3::X);
        assert!(!body.is_sleeping());
    }
}

// ── ContactTracker ────────────────────────────────────────────────────────────

#[cfg(test)]
mod contact_tests {
    use super::*;
    use crate::{ContactPhase, ContactTracker};

    #[test]
    fn enter_then_stay_then_reenter() {
        let mut tracker = ContactTracker::new();
        let a = ColliderId(4);

        assert_eq!(tracker.update([a]), vec![(a, ContactPhase::Enter)]);
        assert_eq!(tracker.update([a]), vec![(a, ContactPhase::Stay)]);
        assert!(tracker.update([]).is_empty());
        assert_eq!(tracker.update([a]), vec![(a, ContactPhase::Enter)]);
    }

    #[test]
    fn output_is_sorted_by_collider() {
        let mut tracker = ContactTracker::new();
        let edges = tracker.update([ColliderId(9), ColliderId(2), ColliderId(5)]);
        let ids: Vec<u32> = edges.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn clear_forgets_contacts() {
        let mut tracker = ContactTracker::new();
        let a = ColliderId(1);
        tracker.update([a]);
        assert!(tracker.is_touching(a));
        tracker.clear();
        assert_eq!(tracker.update([a]), vec![(a, ContactPhase::Enter)]);
    }
}
