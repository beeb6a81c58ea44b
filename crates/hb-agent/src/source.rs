//! The `ActionSource` trait — where a policy, trainer or human plugs in.

use hb_core::{AgentId, AgentRng, Quat, RandomSource, Tick};

use crate::{Action, KeyState, Observation, heuristic_action};

/// Everything handed to an [`ActionSource`] at a decision step.
#[derive(Copy, Clone, Debug)]
pub struct DecisionRequest {
    pub agent:             AgentId,
    pub tick:              Tick,
    /// Zero-based episode counter for this agent.
    pub episode:           u64,
    /// Fixed ticks since the episode began.
    pub episode_step:      u64,
    pub observation:       Observation,
    /// Reward accumulated since the previous decision.
    pub reward:            f32,
    /// Reward accumulated since the episode began.
    pub cumulative_reward: f32,
    /// Current world rotation of the agent.
    pub rotation:          Quat,
}

/// Handed to [`ActionSource::on_episode_end`] when an agent's episode ends.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub agent:           AgentId,
    pub episode:         u64,
    /// Tick the episode ended on.
    pub tick:            Tick,
    pub steps:           u64,
    /// Total reward over the episode.
    pub reward:          f32,
    /// Reward earned after the last decision, not yet seen by the source.
    pub trailing_reward: f32,
    pub nectar:          f32,
}

/// Pluggable decision maker.
///
/// A learned policy, a training bridge and manual input all produce the same
/// [`Action`] from the same [`DecisionRequest`], so they are interchangeable.
///
/// # Thread safety
///
/// With the `parallel` feature of `hb-sim` decisions for all agents of an
/// arena are taken on Rayon's thread pool, so implementations must be
/// `Send + Sync`.  Per-agent randomness comes in through `rng`; anything
/// else that varies per agent should be keyed by `request.agent`.
pub trait ActionSource: Send + Sync + 'static {
    fn decide(&self, request: &DecisionRequest, rng: &mut AgentRng) -> Action;

    /// Default: ignored.
    fn on_episode_end(&self, _summary: &EpisodeSummary) {}
}

impl ActionSource for Box<dyn ActionSource> {
    fn decide(&self, request: &DecisionRequest, rng: &mut AgentRng) -> Action {
        (**self).decide(request, rng)
    }

    fn on_episode_end(&self, summary: &EpisodeSummary) {
        (**self).on_episode_end(summary)
    }
}

// ── Built-in sources ──────────────────────────────────────────────────────────

/// Always returns [`Action::ZERO`]: the agent hovers in place.
pub struct NoopSource;

impl ActionSource for NoopSource {
    fn decide(&self, _request: &DecisionRequest, _rng: &mut AgentRng) -> Action {
        Action::ZERO
    }
}

/// Uniform random actions in `[-1, 1]`.  For smoke runs.
pub struct RandomActions;

impl ActionSource for RandomActions {
    fn decide(&self, _request: &DecisionRequest, rng: &mut AgentRng) -> Action {
        let mut values = [0.0; crate::ACTION_LEN];
        for v in &mut values {
            *v = rng.range_f32(-1.0, 1.0);
        }
        Action(values)
    }
}

/// Manual flight: reads a [`KeyState`] per agent and maps it with
/// [`heuristic_action`].
pub struct HeuristicSource<F> {
    keys: F,
}

impl<F> HeuristicSource<F>
where
    F: Fn(AgentId) -> KeyState + Send + Sync + 'static,
{
    pub fn new(keys: F) -> Self {
        Self { keys }
    }
}

impl<F> ActionSource for HeuristicSource<F>
where
    F: Fn(AgentId) -> KeyState + Send + Sync + 'static,
{
    fn decide(&self, request: &DecisionRequest, _rng: &mut AgentRng) -> Action {
        heuristic_action(&(self.keys)(request.agent), request.rotation)
    }
}
