//! Arena scene graph — the world index the flower registry is built from.
//!
//! # Data layout
//!
//! Nodes live in a flat `Vec<SceneNode>` indexed by [`NodeId`]; each node
//! stores its parent and an ordered child list.  Node 0 is always the arena
//! root.  The graph is built once with [`SceneBuilder`] and afterwards only
//! local rotations change (plant orientation jitter on flower reset).
//!
//! # Flower layout
//!
//! [`SceneBuilder::add_flower`] creates the three-node bundle the flower
//! registry expects:
//!
//! ```text
//! Flower                   (root; +Y is the feeding face normal)
//! ├── FlowerCollider       FlowerBody,  solid disc under the petals
//! └── FlowerNectarCollider NectarProbe, trigger sphere over the centre
//! ```

use hb_core::{NodeId, Pose, Quat, Vec3};

use crate::Shape;

/// Half extents of the solid flower body disc.
pub const FLOWER_BODY_HALF_EXTENTS: Vec3 = Vec3::new(0.05, 0.01, 0.05);
/// Local offset of the body disc from the flower root.
pub const FLOWER_BODY_OFFSET: Vec3 = Vec3::new(0.0, -0.01, 0.0);
/// Radius of the nectar probe trigger sphere.
pub const NECTAR_PROBE_RADIUS: f32 = 0.02;
/// Local offset of the nectar probe from the flower root.
pub const NECTAR_PROBE_OFFSET: Vec3 = Vec3::new(0.0, 0.02, 0.0);

// ── Capability ────────────────────────────────────────────────────────────────

/// The closed set of roles a scene node can play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capability {
    /// Plain container; recursed into during discovery.
    Group,
    /// Cosmetic plant grouping; its orientation is jittered on reset.
    Plant,
    /// A flower root.  Discovery stops here (no nested flowers).
    Flower,
    /// The solid body geometry of a flower.
    FlowerBody,
    /// The trigger geometry a beak must touch to feed.
    NectarProbe,
    /// Arena walls/floor; colliding with one is penalised in training.
    Boundary,
    /// Any other solid scenery.
    Obstacle,
}

// ── SceneNode ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name:       String,
    pub capability: Capability,
    /// Pose relative to the parent node.
    pub local:      Pose,
    pub parent:     Option<NodeId>,
    pub children:   Vec<NodeId>,
    /// Collision geometry, if this node has a collider.
    pub shape:      Option<Shape>,
}

// ── SceneGraph ────────────────────────────────────────────────────────────────

/// Immutable-topology scene hierarchy.  Construct with [`SceneBuilder`].
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// The arena root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    /// # Panics
    /// Panics if `id` is out of range.  IDs handed out by the builder are
    /// always valid for the graph it built.
    #[inline]
    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Iterator over every node id in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// First direct child of `parent` with the given capability.
    pub fn find_child(&self, parent: NodeId, capability: Capability) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.node(c).capability == capability)
    }

    /// World-space pose of `id`, composed from the root down.
    pub fn world_pose(&self, id: NodeId) -> Pose {
        let node = self.node(id);
        match node.parent {
            None => node.local,
            Some(parent) => self.world_pose(parent).mul_pose(&node.local),
        }
    }

    /// Replace a node's local rotation (position is kept).
    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) {
        self.nodes[id.index()].local.rotation = rotation;
    }
}

// ── SceneBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`SceneGraph`].
///
/// # Example
///
/// ```rust
/// use hb_core::{Pose, Vec3};
/// use hb_world::{Capability, SceneBuilder};
///
/// let mut b = SceneBuilder::new();
/// let plant = b.add_plant(b.root(), Pose::from_position(Vec3::new(3.0, 0.0, 0.0)));
/// let flower = b.add_flower(plant, Pose::from_position(Vec3::new(0.0, 1.5, 0.0)));
/// let scene = b.build();
///
/// assert_eq!(scene.node(flower).capability, Capability::Flower);
/// assert_eq!(scene.children(flower).len(), 2);
/// ```
pub struct SceneBuilder {
    nodes: Vec<SceneNode>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    /// Start a scene with an arena root at the world origin.
    pub fn new() -> Self {
        Self::with_root_pose(Pose::IDENTITY)
    }

    /// Start a scene with the arena root at `pose`.
    pub fn with_root_pose(pose: Pose) -> Self {
        let root = SceneNode {
            name:       "FlowerArea".to_owned(),
            capability: Capability::Group,
            local:      pose,
            parent:     None,
            children:   Vec::new(),
            shape:      None,
        };
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a node without geometry under `parent`.
    pub fn add_node(
        &mut self,
        parent:     NodeId,
        name:       &str,
        capability: Capability,
        local:      Pose,
    ) -> NodeId {
        self.push(parent, name, capability, local, None)
    }

    /// Add a node carrying a collider under `parent`.
    pub fn add_collider(
        &mut self,
        parent:     NodeId,
        name:       &str,
        capability: Capability,
        local:      Pose,
        shape:      Shape,
    ) -> NodeId {
        self.push(parent, name, capability, local, Some(shape))
    }

    /// Add a cosmetic plant grouping.
    pub fn add_plant(&mut self, parent: NodeId, local: Pose) -> NodeId {
        self.add_node(parent, "FlowerPlant", Capability::Plant, local)
    }

    /// Add a flower bundle (root, body, nectar probe).  Returns the root.
    pub fn add_flower(&mut self, parent: NodeId, local: Pose) -> NodeId {
        let flower = self.add_node(parent, "Flower", Capability::Flower, local);
        self.add_collider(
            flower,
            "FlowerCollider",
            Capability::FlowerBody,
            Pose::from_position(FLOWER_BODY_OFFSET),
            Shape::Cuboid { half_extents: FLOWER_BODY_HALF_EXTENTS },
        );
        self.add_collider(
            flower,
            "FlowerNectarCollider",
            Capability::NectarProbe,
            Pose::from_position(NECTAR_PROBE_OFFSET),
            Shape::Sphere { radius: NECTAR_PROBE_RADIUS },
        );
        flower
    }

    /// Add a solid boundary box (wall, floor, ceiling).
    pub fn add_boundary(&mut self, parent: NodeId, local: Pose, half_extents: Vec3) -> NodeId {
        self.add_collider(
            parent,
            "Boundary",
            Capability::Boundary,
            local,
            Shape::Cuboid { half_extents },
        )
    }

    /// Add a solid, untagged obstacle.
    pub fn add_obstacle(&mut self, parent: NodeId, local: Pose, shape: Shape) -> NodeId {
        self.add_collider(parent, "Obstacle", Capability::Obstacle, local, shape)
    }

    pub fn build(self) -> SceneGraph {
        SceneGraph { nodes: self.nodes }
    }

    fn push(
        &mut self,
        parent:     NodeId,
        name:       &str,
        capability: Capability,
        local:      Pose,
        shape:      Option<Shape>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            name: name.to_owned(),
            capability,
            local,
            parent: Some(parent),
            children: Vec::new(),
            shape,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }
}
