//! `hb-agent` — the hummingbird agent controller.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                          |
//! |------------|-------------------------------------------------------------------|
//! | [`agent`]  | `HummingbirdAgent` — episode reset, flight, feeding, rewards      |
//! | [`arena`]  | `Arena` — scene + physics + flowers kept consistent               |
//! | [`action`] | `Action`, `Observation`, `KeyState`, `heuristic_action`           |
//! | [`source`] | `ActionSource` trait, `DecisionRequest`, built-in sources         |
//! | [`spawn`]  | Collision-free spawn sampling, `SpawnOutcome`                     |
//! | [`config`] | `AgentConfig`                                                     |
//! | [`error`]  | `AgentError`, `AgentResult<T>`                                    |
//!
//! # Per-tick contract
//!
//! The simulation drives an agent in this order each fixed tick:
//!
//! 1. [`HummingbirdAgent::refresh_target`]: drop a target someone else drained.
//! 2. On decision ticks: [`HummingbirdAgent::collect_observations`] →
//!    [`ActionSource::decide`].
//! 3. [`HummingbirdAgent::apply_action`] with the latest action.
//! 4. Physics integration (outside this crate).
//! 5. Contact callbacks: [`HummingbirdAgent::on_trigger`] for every trigger
//!    enter/stay, [`HummingbirdAgent::on_collision_enter`] for solid enters.
//!
//! Feeding and rewards therefore always see the post-motion pose.

pub mod action;
pub mod agent;
pub mod arena;
pub mod config;
pub mod error;
pub mod source;
pub mod spawn;


pub use action::{ACTION_LEN, Action, KeyState, OBSERVATION_LEN, Observation, heuristic_action};
pub use agent::HummingbirdAgent;
pub use arena::Arena;
pub use config::AgentConfig;
pub use error::{AgentError, AgentResult};
pub use source::{
    ActionSource, DecisionRequest, EpisodeSummary, HeuristicSource, NoopSource, RandomActions,
};
pub use spawn::{SPAWN_ATTEMPTS, SPAWN_CLEARANCE, SpawnMode, SpawnOutcome, find_spawn_pose};
