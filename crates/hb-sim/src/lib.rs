//! `hb-sim` — fixed-tick loop orchestrator for the hummingbird arena.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Refresh   — agents holding a drained target re-select.
//!   ② Decide    — agents on a decision step (episode_step % decision_period
//!                 == 0) collect observations and call ActionSource::decide
//!                 (parallel with the `parallel` feature).
//!   ③ Fly       — apply the latest action, integrate, resolve penetration.
//!   ④ Detect    — trigger-sphere and solid overlaps → enter/stay events.
//!   ⑤ Dispatch  — in ascending AgentId order:
//!                   trigger enter/stay → on_trigger (feeding)
//!                   solid enter        → on_collision_enter (penalty)
//!   ⑥ Episodes  — step += 1; at max_step report an EpisodeSummary and
//!                 begin the next episode.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Decision phase and [`run_arenas`] on Rayon's thread pool.    |
//! | `fx-hash`  | FxHash for the nectar-probe lookup in `hb-flower`.           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hb_agent::{AgentConfig, Arena, RandomActions};
//! use hb_core::SimConfig;
//! use hb_flower::FlowerColors;
//! use hb_sim::{NoopObserver, SimBuilder};
//!
//! let arena = Arena::new(scene, FlowerColors::default())?;
//! let mut sim = SimBuilder::new(SimConfig::default(), arena, RandomActions)
//!     .agent(AgentConfig::default())
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod batch;
pub mod builder;
pub mod error;
pub mod event;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use batch::run_arenas;
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event::{ContactEvent, ContactKind, EventQueue};
pub use observer::{NoopObserver, SimObserver, TickStats};
pub use sim::{EpisodeState, Sim};
