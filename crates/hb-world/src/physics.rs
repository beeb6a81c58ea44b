//! The physics collaborator seam and its in-process implementation.
//!
//! # Broad phase
//!
//! An R-tree (via `rstar`) indexes every collider by its world-space AABB.
//! The entry's `distance_2` is the exact squared distance from a query point
//! to the collider surface, so `locate_within_distance(p, r²)` returns
//! precisely the colliders a sphere of radius `r` at `p` touches.
//!
//! Collider poses only change when plant orientations are re-randomised;
//! [`StaticWorld::sync_poses`] recomputes them and rebuilds the tree.
//! Enabling/disabling colliders is a flag flip and does not touch the tree.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use hb_core::{ColliderId, NodeId, Pose, Vec3};

use crate::{
    Capability, Collider, ColliderKind, ColliderTag, RigidBody, SceneGraph, Shape, WorldError,
    WorldResult,
};

// ── PhysicsWorld ──────────────────────────────────────────────────────────────

/// The queries the agent logic needs from a physics engine.
pub trait PhysicsWorld {
    /// IDs of every enabled collider touching the sphere, in ascending order.
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<ColliderId>;

    /// Closest point on `collider` to `point`.  `None` if the ID is unknown.
    fn closest_point(&self, collider: ColliderId, point: Vec3) -> Option<Vec3>;

    /// Full collider record.  `None` if the ID is unknown.
    fn collider(&self, id: ColliderId) -> Option<&Collider>;
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct ColliderEntry {
    id:    ColliderId,
    shape: Shape,
    pose:  Pose,
}

impl RTreeObject for ColliderEntry {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        let (min, max) = self.shape.aabb(&self.pose);
        AABB::from_corners(min.to_array(), max.to_array())
    }
}

impl PointDistance for ColliderEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let p = Vec3::from_array(*point);
        self.shape.closest_point(&self.pose, p).distance_squared(p)
    }
}

// ── StaticWorld ───────────────────────────────────────────────────────────────

/// Static colliders extracted from a [`SceneGraph`].
pub struct StaticWorld {
    colliders: Vec<Collider>,
    by_node:   HashMap<NodeId, ColliderId>,
    tree:      RTree<ColliderEntry>,
}

impl StaticWorld {
    /// Register one collider per scene node that carries a shape.
    ///
    /// Nectar probes become triggers; everything else is solid.  Collider IDs
    /// follow scene insertion order.
    pub fn from_scene(scene: &SceneGraph) -> Self {
        let mut colliders = Vec::new();
        let mut by_node = HashMap::new();

        for node_id in scene.node_ids() {
            let node = scene.node(node_id);
            let Some(shape) = node.shape else { continue };

            let (kind, tag) = match node.capability {
                Capability::NectarProbe => (ColliderKind::Trigger, ColliderTag::Nectar),
                Capability::Boundary    => (ColliderKind::Solid, ColliderTag::Boundary),
                _                       => (ColliderKind::Solid, ColliderTag::Other),
            };

            let id = ColliderId(colliders.len() as u32);
            by_node.insert(node_id, id);
            colliders.push(Collider {
                id,
                node: node_id,
                shape,
                kind,
                tag,
                pose: scene.world_pose(node_id),
                enabled: true,
            });
        }

        let tree = build_tree(&colliders);
        Self { colliders, by_node, tree }
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Collider attached to scene node `node`, if any.
    pub fn collider_for_node(&self, node: NodeId) -> Option<ColliderId> {
        self.by_node.get(&node).copied()
    }

    pub fn set_enabled(&mut self, id: ColliderId, enabled: bool) -> WorldResult<()> {
        let collider = self
            .colliders
            .get_mut(id.index())
            .ok_or(WorldError::UnknownCollider(id))?;
        collider.enabled = enabled;
        Ok(())
    }

    /// `false` for disabled or unknown colliders.
    pub fn is_enabled(&self, id: ColliderId) -> bool {
        self.colliders.get(id.index()).is_some_and(|c| c.enabled)
    }

    /// Recompute world poses from `scene` and rebuild the broad phase.
    pub fn sync_poses(&mut self, scene: &SceneGraph) {
        for collider in &mut self.colliders {
            collider.pose = scene.world_pose(collider.node);
        }
        self.tree = build_tree(&self.colliders);
    }

    /// Enabled colliders of `kind` touching the sphere, ascending by ID.
    pub fn overlap_sphere_of_kind(
        &self,
        center: Vec3,
        radius: f32,
        kind:   ColliderKind,
    ) -> Vec<ColliderId> {
        self.query(center, radius, |c| c.kind == kind)
    }

    /// Push `body` out of every enabled solid collider its sphere penetrates
    /// and cancel the velocity component driving into the surface.
    ///
    /// Returns the solids the body is touching after resolution, ascending.
    pub fn resolve_penetration(&self, body: &mut RigidBody) -> Vec<ColliderId> {
        let radius = body.config.radius;
        let touching = self.overlap_sphere_of_kind(body.position, radius, ColliderKind::Solid);

        for &id in &touching {
            let collider = &self.colliders[id.index()];
            let closest = collider.closest_point(body.position);
            let offset = body.position - closest;
            let dist = offset.length();
            // Centre inside the solid: no usable normal, leave it to the next tick.
            if dist <= f32::EPSILON {
                continue;
            }
            let normal = offset / dist;
            if dist < radius {
                body.position += normal * (radius - dist);
            }
            let into_surface = body.velocity.dot(normal);
            if into_surface < 0.0 {
                body.velocity -= normal * into_surface;
            }
        }
        touching
    }

    fn query(
        &self,
        center: Vec3,
        radius: f32,
        filter: impl Fn(&Collider) -> bool,
    ) -> Vec<ColliderId> {
        let mut hits: Vec<ColliderId> = self
            .tree
            .locate_within_distance(center.to_array(), radius * radius)
            .map(|entry| entry.id)
            .filter(|id| {
                let c = &self.colliders[id.index()];
                c.enabled && filter(c)
            })
            .collect();
        hits.sort_unstable();
        hits
    }
}

impl PhysicsWorld for StaticWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<ColliderId> {
        self.query(center, radius, |_| true)
    }

    fn closest_point(&self, collider: ColliderId, point: Vec3) -> Option<Vec3> {
        self.colliders.get(collider.index()).map(|c| c.closest_point(point))
    }

    fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id.index())
    }
}

fn build_tree(colliders: &[Collider]) -> RTree<ColliderEntry> {
    let entries = colliders
        .iter()
        .map(|c| ColliderEntry { id: c.id, shape: c.shape, pose: c.pose })
        .collect();
    RTree::bulk_load(entries)
}
