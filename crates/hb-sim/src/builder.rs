//! Fluent builder for constructing a [`Sim`].

use hb_agent::{ActionSource, AgentConfig, Arena, HummingbirdAgent};
use hb_core::{AgentId, AgentRng, Pose, SimConfig};
use tracing::{debug, warn};

use crate::sim::EpisodeState;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<S>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick length, total ticks, episode length, …
/// - [`Arena`]: scene, physics and flowers
/// - `S: ActionSource`: the policy, trainer bridge or manual input
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                          |
/// |-----------------|----------------------------------|
/// | `.agent(c)`     | one agent with `AgentConfig::default()` |
/// | `.agents(n, c)` | —                                |
///
/// # Example
///
/// ```rust,ignore
/// let arena = Arena::new(scene, FlowerColors::default())?;
/// let mut sim = SimBuilder::new(config, arena, RandomActions)
///     .agent(AgentConfig::default())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<S: ActionSource> {
    config: SimConfig,
    arena:  Arena,
    source: S,
    agents: Vec<AgentConfig>,
}

impl<S: ActionSource> SimBuilder<S> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, arena: Arena, source: S) -> Self {
        Self { config, arena, source, agents: Vec::new() }
    }

    /// Add one agent.  Agents get IDs in the order they are added.
    pub fn agent(mut self, config: AgentConfig) -> Self {
        self.agents.push(config);
        self
    }

    /// Add `n` agents sharing `config`.
    pub fn agents(mut self, n: usize, config: AgentConfig) -> Self {
        self.agents.extend(std::iter::repeat_n(config, n));
        self
    }

    /// Validate inputs, create the agents and begin their first episode.
    ///
    /// Agents not in training run without an episode limit regardless of
    /// `config.max_step`.
    pub fn build(mut self) -> SimResult<Sim<S>> {
        self.config.validate()?;

        let configs = if self.agents.is_empty() {
            vec![AgentConfig::default()]
        } else {
            std::mem::take(&mut self.agents)
        };
        if configs.iter().filter(|c| c.training).count() > 1 {
            // Training resets the whole arena at every episode start.
            warn!(
                agents = configs.len(),
                "several training agents share one arena; each episode start resets every flower"
            );
        }

        let mut agents = Vec::with_capacity(configs.len());
        let mut rngs = Vec::with_capacity(configs.len());
        let mut episodes = Vec::with_capacity(configs.len());
        let start = Pose::from_position(self.arena.center());
        for (i, agent_config) in configs.into_iter().enumerate() {
            let id = AgentId::try_from(i)
                .map_err(|_| SimError::Config(format!("too many agents: {i}")))?;
            let max_step = if agent_config.training { self.config.max_step } else { 0 };
            episodes.push(EpisodeState::new(max_step));
            rngs.push(AgentRng::new(self.config.seed, id));
            agents.push(HummingbirdAgent::new(id, agent_config, start));
        }

        for (agent, rng) in agents.iter_mut().zip(rngs.iter_mut()) {
            agent.begin_episode(&mut self.arena, rng)?;
        }
        debug!(
            agents = agents.len(),
            flowers = self.arena.flowers.len(),
            "sim built"
        );

        Ok(Sim::from_parts(self.config, self.arena, agents, rngs, episodes, self.source))
    }
}
