//! The `Sim` struct and its tick loop.

use hb_agent::{Action, ActionSource, Arena, DecisionRequest, EpisodeSummary, HummingbirdAgent};
use hb_core::{AgentId, AgentRng, FixedClock, SimConfig, Tick};
use hb_world::{ColliderKind, ContactPhase, ContactTracker, PhysicsWorld};
use tracing::debug;

use crate::event::{ContactKind, EventQueue};
use crate::observer::TickStats;
use crate::{SimObserver, SimResult};

// ── Per-agent episode bookkeeping ─────────────────────────────────────────────

/// Where one agent is within its current episode.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EpisodeState {
    /// Zero-based episode counter.
    pub episode:     u64,
    /// Fixed ticks since the episode began.
    pub step:        u64,
    /// Ticks per episode for this agent; 0 = unbounded.
    pub max_step:    u64,
    /// Latest action from the source, repeated between decisions.
    pub last_action: Action,
}

impl EpisodeState {
    pub(crate) fn new(max_step: u64) -> Self {
        Self { episode: 0, step: 0, max_step, last_action: Action::ZERO }
    }

    #[inline]
    fn is_over(&self) -> bool {
        self.max_step > 0 && self.step >= self.max_step
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// Runs one arena.
///
/// `Sim<S>` holds the arena, its agents and their RNGs and drives the
/// fixed-tick loop:
///
/// 1. **Target refresh**: agents whose target was drained re-select.
/// 2. **Decision phase** (optionally parallel with the `parallel` feature):
///    agents on a decision step build an observation and ask the
///    [`ActionSource`] for a new action.
/// 3. **Flight**: every agent applies its latest action, its body is
///    integrated and pushed out of solids.
/// 4. **Contact detection**: each agent's trigger sphere and solid contacts
///    are diffed against the previous tick into enter/stay events.
/// 5. **Dispatch** (sequential, ascending `AgentId`): trigger events feed,
///    solid enters penalise.  Colliders disabled earlier in the same
///    dispatch are skipped.
/// 6. **Episodes**: step counters advance; agents at `max_step` report an
///    [`EpisodeSummary`] and begin a new episode immediately.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: ActionSource> {
    /// Global configuration (tick length, total ticks, episode length, …).
    pub config: SimConfig,

    /// Fixed-step clock.
    pub clock: FixedClock,

    /// Scene, physics world and flowers shared by all agents.
    pub arena: Arena,

    /// Agents, indexed by `AgentId`.
    pub agents: Vec<HummingbirdAgent>,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: Vec<AgentRng>,

    /// Per-agent episode bookkeeping, indexed by `AgentId`.
    pub episodes: Vec<EpisodeState>,

    /// The decision maker.  Called once per agent per decision step.
    pub source: S,

    sensors: Vec<ContactTracker>,
    solids:  Vec<ContactTracker>,
    events:  EventQueue,
}

impl<S: ActionSource> Sim<S> {
    pub(crate) fn from_parts(
        config:   SimConfig,
        arena:    Arena,
        agents:   Vec<HummingbirdAgent>,
        rngs:     Vec<AgentRng>,
        episodes: Vec<EpisodeState>,
        source:   S,
    ) -> Self {
        let n = agents.len();
        Self {
            clock: config.make_clock(),
            config,
            arena,
            agents,
            rngs,
            episodes,
            source,
            sensors: vec![ContactTracker::new(); n],
            solids:  vec![ContactTracker::new(); n],
            events:  EventQueue::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step_once(now, observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step_once(now, observer)?;
        }
        Ok(())
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn agent(&self, id: AgentId) -> &HummingbirdAgent {
        &self.agents[id.index()]
    }

    #[inline]
    pub fn agent_mut(&mut self, id: AgentId) -> &mut HummingbirdAgent {
        &mut self.agents[id.index()]
    }

    #[inline]
    pub fn episode(&self, id: AgentId) -> &EpisodeState {
        &self.episodes[id.index()]
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step_once<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(now);
        let stats = self.process_tick(now, observer)?;
        observer.on_tick_end(now, &stats);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.agents, &self.arena);
        }
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<TickStats> {
        let mut stats = TickStats::default();
        let dt = self.config.fixed_delta_secs;

        // ── Phase 1: target refresh ───────────────────────────────────────
        //
        // Another agent may have drained this agent's target since its last
        // selection; without this it would keep observing an empty flower.
        for agent in &mut self.agents {
            agent.refresh_target(&self.arena);
        }

        // ── Phase 2: decisions ────────────────────────────────────────────
        //
        // Requests are assembled sequentially so the decision phase itself
        // (which may run in parallel) only reads immutable data.
        let requests = self.collect_requests(now);
        if !requests.is_empty() {
            let actions = self.compute_actions(&requests);
            for (request, action) in requests.iter().zip(actions) {
                observer.on_decision(request, &action);
                self.episodes[request.agent.index()].last_action = action;
            }
            stats.decisions = requests.len();
        }

        // ── Phase 3 + 4: flight and contact detection ─────────────────────
        for (i, agent) in self.agents.iter_mut().enumerate() {
            agent.apply_action(&self.episodes[i].last_action, dt);

            let body = agent.body_mut();
            body.integrate(dt);
            let touching = self.arena.world.resolve_penetration(body);

            let sensed = self.arena.world.overlap_sphere_of_kind(
                agent.sensor_center(),
                agent.config().sensor_radius,
                ColliderKind::Trigger,
            );
            let id = agent.id();
            self.events.extend_from_edges(id, ContactKind::Trigger, self.sensors[i].update(sensed));
            self.events.extend_from_edges(id, ContactKind::Collision, self.solids[i].update(touching));
        }

        // ── Phase 5: dispatch ─────────────────────────────────────────────
        if let Err(e) = self.dispatch_events(&mut stats) {
            self.events.clear();
            return Err(e);
        }

        // ── Phase 6: episode bookkeeping ──────────────────────────────────
        for i in 0..self.agents.len() {
            self.episodes[i].step += 1;
            if self.episodes[i].is_over() {
                self.restart_episode(i, now, observer)?;
                stats.episodes_ended += 1;
            }
        }

        Ok(stats)
    }

    /// One request per agent whose episode step falls on the decision period.
    fn collect_requests(&mut self, now: Tick) -> Vec<DecisionRequest> {
        let period = self.config.effective_decision_period();
        let arena = &self.arena;
        self.agents
            .iter_mut()
            .zip(&self.episodes)
            .filter(|(_, state)| state.step.is_multiple_of(period))
            .map(|(agent, state)| DecisionRequest {
                agent:             agent.id(),
                tick:              now,
                episode:           state.episode,
                episode_step:      state.step,
                observation:       agent.collect_observations(arena),
                reward:            agent.take_pending_reward(),
                cumulative_reward: agent.episode_reward(),
                rotation:          agent.pose().rotation,
            })
            .collect()
    }

    /// Ask the source for one action per request.
    ///
    /// With the `parallel` Cargo feature the calls run on Rayon's thread
    /// pool.  Results come back in request order either way.
    fn compute_actions(&mut self, requests: &[DecisionRequest]) -> Vec<Action> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let source = &self.source;
        let rng_refs = select_rngs(&mut self.rngs, requests);

        #[cfg(not(feature = "parallel"))]
        {
            requests
                .iter()
                .zip(rng_refs)
                .map(|(request, rng)| source.decide(request, rng))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            requests
                .par_iter()
                .zip(rng_refs.into_par_iter())
                .map(|(request, rng)| source.decide(request, rng))
                .collect()
        }
    }

    fn dispatch_events(&mut self, stats: &mut TickStats) -> SimResult<()> {
        while let Some(event) = self.events.pop() {
            // A flower emptied earlier in this dispatch no longer reports.
            if !self.arena.world.is_enabled(event.collider) {
                continue;
            }
            let agent = &mut self.agents[event.agent.index()];
            match (event.kind, event.phase) {
                (ContactKind::Trigger, _) => {
                    if let Some(taken) = agent.on_trigger(event.collider, &mut self.arena)? {
                        stats.feeds += 1;
                        stats.nectar_taken += taken;
                    }
                }
                (ContactKind::Collision, ContactPhase::Enter) => {
                    if let Some(collider) = self.arena.world.collider(event.collider) {
                        agent.on_collision_enter(collider.tag);
                        stats.collisions += 1;
                    }
                }
                (ContactKind::Collision, ContactPhase::Stay) => {}
            }
        }
        Ok(())
    }

    /// Report the finished episode, then begin the next one in place.
    fn restart_episode<O: SimObserver>(
        &mut self,
        index:    usize,
        now:      Tick,
        observer: &mut O,
    ) -> SimResult<()> {
        let agent = &mut self.agents[index];
        let state = &mut self.episodes[index];

        let summary = EpisodeSummary {
            agent:           agent.id(),
            episode:         state.episode,
            tick:            now,
            steps:           state.step,
            reward:          agent.episode_reward(),
            trailing_reward: agent.pending_reward(),
            nectar:          agent.nectar_obtained(),
        };
        self.source.on_episode_end(&summary);
        observer.on_episode_end(&summary);
        debug!(
            agent = %summary.agent,
            episode = summary.episode,
            reward = summary.reward,
            nectar = summary.nectar,
            "episode end"
        );

        state.episode += 1;
        state.step = 0;
        state.last_action = Action::ZERO;
        self.sensors[index].clear();
        self.solids[index].clear();
        agent.begin_episode(&mut self.arena, &mut self.rngs[index])?;
        Ok(())
    }
}

/// Disjoint `&mut` RNGs for the requesting agents, in request order.
///
/// Requests are built in ascending `AgentId` order with no repeats, so one
/// forward walk over `rngs` suffices.
fn select_rngs<'a>(rngs: &'a mut [AgentRng], requests: &[DecisionRequest]) -> Vec<&'a mut AgentRng> {
    let mut wanted = requests.iter().map(|r| r.agent.index()).peekable();
    rngs.iter_mut()
        .enumerate()
        .filter_map(|(i, rng)| {
            if wanted.peek() == Some(&i) {
                wanted.next();
                Some(rng)
            } else {
                None
            }
        })
        .collect()
}
