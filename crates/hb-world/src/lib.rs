//! `hb-world` — the arena's world index and reference physics.
//!
//! The agent and flower logic treat both of these as external
//! collaborators; this crate provides a deterministic, in-process
//! implementation of each so arenas can be simulated headless.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`scene`]    | `SceneGraph`, `SceneBuilder`, `Capability` (closed tag set)   |
//! | [`collider`] | `Shape`, `Collider`, `ColliderKind`, `ColliderTag`            |
//! | [`body`]     | `RigidBody`, `BodyConfig`                                     |
//! | [`physics`]  | `PhysicsWorld` trait, `StaticWorld` (R-tree broad phase)      |
//! | [`contact`]  | `ContactTracker` — overlap sets → enter/stay edges            |
//! | [`error`]    | `WorldError`, `WorldResult<T>`                                |
//!
//! # Capabilities
//!
//! Scene nodes carry exactly one [`Capability`], resolved when the scene is
//! built.  Colliders inherit a [`ColliderTag`] from their node, so contact
//! handling matches on an enum instead of comparing tag strings per event.

pub mod body;
pub mod collider;
pub mod contact;
pub mod error;
pub mod physics;
pub mod scene;

#[cfg(test)]
mod tests;

pub use body::{BodyConfig, RigidBody};
pub use collider::{Collider, ColliderKind, ColliderTag, Shape};
pub use contact::{ContactPhase, ContactTracker};
pub use error::{WorldError, WorldResult};
pub use physics::{PhysicsWorld, StaticWorld};
pub use scene::{Capability, SceneBuilder, SceneGraph, SceneNode};
