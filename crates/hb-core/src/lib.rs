//! `hb-core` — foundational types for the hummingbird flight arena.
//!
//! This crate is a dependency of every other `hb-*` crate.  It has no `hb-*`
//! dependencies and few external ones (`glam`, `rand`, `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `FlowerId`, `ColliderId`, `NodeId`             |
//! | [`math`]        | `Pose`, Euler helpers, `move_towards`, `look_rotation`    |
//! | [`time`]        | `Tick`, `FixedClock`, `SimConfig`                         |
//! | [`rng`]         | `RandomSource` trait, `AgentRng`, `SimRng`                |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Axis conventions
//!
//! `+Y` is up, `+Z` is forward and `+X` is right.  Rotations are composed as
//! yaw (about Y), then pitch (about X), then roll (about Z).  Positive pitch
//! tilts the nose *down*; positive yaw turns to the right.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use glam::{Quat, Vec3};
pub use ids::{AgentId, ColliderId, FlowerId, NodeId};
pub use math::Pose;
pub use rng::{AgentRng, RandomSource, SimRng};
pub use time::{FixedClock, SimConfig, Tick};
