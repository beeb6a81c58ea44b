//! Integration tests for hb-sim.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hb_agent::{
    Action, ActionSource, AgentConfig, Arena, DecisionRequest, EpisodeSummary, HummingbirdAgent,
    NoopSource,
};
use hb_core::math::look_rotation;
use hb_core::{AgentId, AgentRng, FlowerId, Pose, SimConfig, Tick, Vec3};
use hb_flower::FlowerColors;
use hb_world::SceneBuilder;

use crate::{NoopObserver, SimBuilder, SimObserver, TickStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        seed:                  42,
        fixed_delta_secs:      0.02,
        total_ticks,
        max_step:              0,
        decision_period:       1,
        output_interval_ticks: 0,
    }
}

/// Upright flowers at (0, 1, 3) and (0, 1, -3) over a floor whose top face
/// is y = 0.
fn garden() -> Arena {
    let mut b = SceneBuilder::new();
    let root = b.root();
    for z in [3.0, -3.0] {
        let plant = b.add_plant(root, Pose::from_position(Vec3::new(0.0, 0.0, z)));
        b.add_flower(plant, Pose::from_position(Vec3::Y));
    }
    b.add_boundary(root, Pose::from_position(Vec3::new(0.0, -0.5, 0.0)), Vec3::new(12.0, 0.5, 12.0));
    Arena::new(b.build(), FlowerColors::default()).unwrap()
}

fn agent_config(training: bool) -> AgentConfig {
    AgentConfig { training, ..AgentConfig::default() }
}

/// Pose with the beak tip on `flower`'s nectar probe, approaching from above
/// at 60° so the body stays clear of the flower.
fn feeding_pose(arena: &Arena, flower: FlowerId, agent: &HummingbirdAgent) -> Pose {
    let center = arena.flowers.flower(flower).center_position();
    let rotation = look_rotation(Vec3::new(0.0, -0.866, 0.5));
    let reach = rotation * agent.config().beak_tip_offset;
    Pose::new(center - reach, rotation)
}

/// Counts decisions and remembers every request.
#[derive(Clone, Default)]
struct Recording {
    calls:    Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<DecisionRequest>>>,
    episodes: Arc<Mutex<Vec<EpisodeSummary>>>,
}

impl ActionSource for Recording {
    fn decide(&self, request: &DecisionRequest, _rng: &mut AgentRng) -> Action {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().unwrap().push(*request);
        Action::ZERO
    }

    fn on_episode_end(&self, summary: &EpisodeSummary) {
        self.episodes.lock().unwrap().push(*summary);
    }
}

/// Returns the same movement every decision.
struct Thrust(Vec3);

impl ActionSource for Thrust {
    fn decide(&self, _request: &DecisionRequest, _rng: &mut AgentRng) -> Action {
        Action::new(self.0, 0.0, 0.0)
    }
}

#[derive(Default)]
struct Log {
    tick_starts: Vec<Tick>,
    decisions:   usize,
    stats:       Vec<TickStats>,
    episodes:    Vec<EpisodeSummary>,
    snapshots:   Vec<(Tick, usize)>,
    end_tick:    Option<Tick>,
}

impl SimObserver for Log {
    fn on_tick_start(&mut self, tick: Tick) {
        self.tick_starts.push(tick);
    }

    fn on_decision(&mut self, _request: &DecisionRequest, _action: &Action) {
        self.decisions += 1;
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.episodes.push(*summary);
    }

    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        self.stats.push(*stats);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[HummingbirdAgent], _arena: &Arena) {
        self.snapshots.push((tick, agents.len()));
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.end_tick = Some(final_tick);
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_one_default_agent() {
        let sim = SimBuilder::new(test_config(10), garden(), NoopSource).build().unwrap();
        assert_eq!(sim.agents.len(), 1);
        assert_eq!(sim.rngs.len(), 1);
        assert!(sim.agents[0].target().is_some(), "first episode selects a target");
    }

    #[test]
    fn agents_get_sequential_ids() {
        let sim = SimBuilder::new(test_config(10), garden(), NoopSource)
            .agents(3, agent_config(false))
            .build()
            .unwrap();
        let ids: Vec<_> = sim.agents.iter().map(|a| a.id()).collect();
        assert_eq!(ids, [AgentId(0), AgentId(1), AgentId(2)]);
    }

    #[test]
    fn invalid_tick_length_errors() {
        let config = SimConfig { fixed_delta_secs: 0.0, ..test_config(10) };
        let result = SimBuilder::new(config, garden(), NoopSource).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn non_training_agents_are_unbounded() {
        let config = SimConfig { max_step: 5, ..test_config(10) };
        let sim = SimBuilder::new(config, garden(), NoopSource)
            .agent(agent_config(true))
            .agent(agent_config(false))
            .build()
            .unwrap();
        assert_eq!(sim.episode(AgentId(0)).max_step, 5);
        assert_eq!(sim.episode(AgentId(1)).max_step, 0);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loop_tests {
    use super::*;

    #[test]
    fn run_stops_at_end_tick() {
        let mut sim = SimBuilder::new(test_config(7), garden(), NoopSource).build().unwrap();
        let mut log = Log::default();
        sim.run(&mut log).unwrap();
        assert_eq!(log.tick_starts.len(), 7);
        assert_eq!(log.tick_starts.first(), Some(&Tick(0)));
        assert_eq!(log.end_tick, Some(Tick(7)));
        assert_eq!(sim.current_tick(), Tick(7));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = SimBuilder::new(test_config(2), garden(), NoopSource).build().unwrap();
        sim.run_ticks(5, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(5));
    }

    #[test]
    fn snapshots_follow_output_interval() {
        let config = SimConfig { output_interval_ticks: 5, ..test_config(12) };
        let mut sim = SimBuilder::new(config, garden(), NoopSource)
            .agents(2, agent_config(false))
            .build()
            .unwrap();
        let mut log = Log::default();
        sim.run(&mut log).unwrap();
        assert_eq!(log.snapshots, [(Tick(0), 2), (Tick(5), 2), (Tick(10), 2)]);
    }

    #[test]
    fn zero_interval_disables_snapshots() {
        let mut sim = SimBuilder::new(test_config(12), garden(), NoopSource).build().unwrap();
        let mut log = Log::default();
        sim.run(&mut log).unwrap();
        assert!(log.snapshots.is_empty());
    }

    #[test]
    fn hovering_agent_stays_put() {
        let mut sim = SimBuilder::new(test_config(50), garden(), NoopSource)
            .agent(agent_config(false))
            .build()
            .unwrap();
        let start = sim.agents[0].pose().position;
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.agents[0].pose().position.distance(start) < 1e-4);
    }
}

// ── Decisions ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decision_tests {
    use super::*;

    #[test]
    fn decisions_follow_period() {
        let config = SimConfig { decision_period: 5, ..test_config(12) };
        let source = Recording::default();
        let mut sim = SimBuilder::new(config, garden(), source.clone())
            .agent(agent_config(false))
            .build()
            .unwrap();
        let mut log = Log::default();
        sim.run(&mut log).unwrap();

        assert_eq!(source.calls.load(Ordering::Relaxed), 3);
        assert_eq!(log.decisions, 3);
        let steps: Vec<u64> = source.requests.lock().unwrap().iter().map(|r| r.episode_step).collect();
        assert_eq!(steps, [0, 5, 10]);
    }

    #[test]
    fn zero_period_decides_every_tick() {
        let config = SimConfig { decision_period: 0, ..test_config(4) };
        let source = Recording::default();
        let mut sim = SimBuilder::new(config, garden(), source.clone()).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(source.calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn every_agent_decides() {
        let source = Recording::default();
        let mut sim = SimBuilder::new(test_config(3), garden(), source.clone())
            .agents(4, agent_config(false))
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 12);
        let first_tick: Vec<AgentId> = requests.iter().take(4).map(|r| r.agent).collect();
        assert_eq!(first_tick, [AgentId(0), AgentId(1), AgentId(2), AgentId(3)]);
    }

    #[test]
    fn random_actions_are_deterministic_per_seed() {
        let run = || {
            let mut sim = SimBuilder::new(test_config(40), garden(), hb_agent::RandomActions)
                .agents(2, agent_config(false))
                .build()
                .unwrap();
            sim.run(&mut NoopObserver).unwrap();
            sim.agents.iter().map(|a| a.pose().position).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}

// ── Feeding and rewards ───────────────────────────────────────────────────────

#[cfg(test)]
mod feeding_tests {
    use hb_agent::agent::{ALIGNMENT_BONUS, FEED_REWARD};

    use super::*;

    fn feeding_sim<S: ActionSource>(source: S, training: bool) -> crate::Sim<S> {
        let mut sim = SimBuilder::new(test_config(1_000), garden(), source)
            .agent(agent_config(training))
            .build()
            .unwrap();
        let pose = feeding_pose(&sim.arena, FlowerId(0), &sim.agents[0]);
        sim.agents[0].body_mut().set_pose(pose);
        sim
    }

    #[test]
    fn beak_on_probe_feeds_every_tick() {
        let mut sim = feeding_sim(NoopSource, false);
        let mut log = Log::default();
        sim.run_ticks(10, &mut log).unwrap();

        assert!(log.stats.iter().all(|s| s.feeds == 1));
        assert!((sim.agents[0].nectar_obtained() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn draining_switches_target() {
        let mut sim = feeding_sim(NoopSource, false);
        sim.run_ticks(99, &mut NoopObserver).unwrap();
        assert!(sim.arena.flowers.flower(FlowerId(0)).has_nectar());

        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let drained = sim.arena.flowers.flower(FlowerId(0));
        assert!(!drained.has_nectar());
        assert!(!sim.arena.world.is_enabled(drained.nectar_collider()));
        assert_eq!(sim.agents[0].target(), Some(FlowerId(1)));

        let mut log = Log::default();
        sim.run_ticks(5, &mut log).unwrap();
        assert!(log.stats.iter().all(|s| s.feeds == 0));
        assert!((sim.agents[0].nectar_obtained() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn feeding_reward_reaches_next_decision() {
        let source = Recording::default();
        let mut sim = feeding_sim(source.clone(), true);
        sim.run_ticks(2, &mut NoopObserver).unwrap();

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests[0].reward, 0.0);
        let reward = requests[1].reward;
        assert!(reward > FEED_REWARD, "alignment bonus expected, got {reward}");
        assert!(reward <= FEED_REWARD + ALIGNMENT_BONUS + 1e-6);
        assert!((requests[1].cumulative_reward - reward).abs() < 1e-6);
    }

    #[test]
    fn no_reward_outside_training() {
        let source = Recording::default();
        let mut sim = feeding_sim(source.clone(), false);
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert!(source.requests.lock().unwrap().iter().all(|r| r.reward == 0.0));
        assert!(sim.agents[0].nectar_obtained() > 0.0);
    }

    #[test]
    fn flower_emptied_mid_dispatch_stops_reporting() {
        let mut sim = SimBuilder::new(test_config(10), garden(), NoopSource)
            .agents(2, agent_config(false))
            .build()
            .unwrap();
        let pose = feeding_pose(&sim.arena, FlowerId(0), &sim.agents[0]);
        for agent in &mut sim.agents {
            agent.body_mut().set_pose(pose);
        }
        sim.arena.flowers.flower_mut(FlowerId(0)).feed(0.99);

        let mut log = Log::default();
        sim.run_ticks(1, &mut log).unwrap();

        assert_eq!(log.stats[0].feeds, 1);
        assert!(sim.agents[0].nectar_obtained() > 0.0);
        assert_eq!(sim.agents[1].nectar_obtained(), 0.0);
        assert!(!sim.arena.flowers.flower(FlowerId(0)).has_nectar());
    }

    #[test]
    fn boundary_hit_is_penalised_once() {
        let mut sim = SimBuilder::new(test_config(10), garden(), NoopSource)
            .agent(agent_config(true))
            .build()
            .unwrap();
        sim.agents[0].body_mut().set_pose(Pose::from_position(Vec3::new(0.0, 0.03, 0.0)));

        let mut log = Log::default();
        sim.run_ticks(1, &mut log).unwrap();
        assert_eq!(log.stats[0].collisions, 1);
        assert!((sim.agents[0].episode_reward() + 0.5).abs() < 1e-6);
        assert!(sim.agents[0].pose().position.y >= 0.04 - 1e-5, "pushed out of the floor");
    }

    #[test]
    fn sustained_floor_contact_is_penalised_on_enter_only() {
        let mut sim = SimBuilder::new(test_config(1_000), garden(), Thrust(Vec3::NEG_Y))
            .agent(agent_config(true))
            .build()
            .unwrap();
        sim.agents[0].body_mut().set_pose(Pose::from_position(Vec3::new(0.0, 0.03, 0.0)));

        let mut log = Log::default();
        sim.run_ticks(60, &mut log).unwrap();
        let collisions: usize = log.stats.iter().map(|s| s.collisions).sum();
        assert_eq!(collisions, 1);
        assert!((sim.agents[0].episode_reward() + 0.5).abs() < 1e-6);

        // Lift clear for a tick, then dive back in.
        sim.agents[0].body_mut().set_pose(Pose::from_position(Vec3::new(0.0, 1.0, 0.0)));
        sim.run_ticks(1, &mut log).unwrap();
        assert_eq!(log.stats[60].collisions, 0);

        sim.agents[0].body_mut().set_pose(Pose::from_position(Vec3::new(0.0, 0.03, 0.0)));
        sim.run_ticks(30, &mut log).unwrap();
        let collisions: usize = log.stats.iter().map(|s| s.collisions).sum();
        assert_eq!(collisions, 2);
        assert!((sim.agents[0].episode_reward() + 1.0).abs() < 1e-6);
    }
}

// ── Episodes ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod episode_tests {
    use super::*;

    #[test]
    fn max_step_restarts_episode() {
        let config = SimConfig { max_step: 10, ..test_config(25) };
        let source = Recording::default();
        let mut sim = SimBuilder::new(config, garden(), source.clone())
            .agent(agent_config(true))
            .build()
            .unwrap();
        let mut log = Log::default();
        sim.run(&mut log).unwrap();

        assert_eq!(log.episodes.len(), 2);
        assert_eq!(log.episodes[0].episode, 0);
        assert_eq!(log.episodes[0].steps, 10);
        assert_eq!(log.episodes[0].tick, Tick(9));
        assert_eq!(log.episodes[1].tick, Tick(19));
        assert_eq!(*source.episodes.lock().unwrap(), log.episodes);

        let state = sim.episode(AgentId(0));
        assert_eq!(state.episode, 2);
        assert_eq!(state.step, 5);
    }

    #[test]
    fn decisions_restart_with_episode() {
        let config = SimConfig { max_step: 7, decision_period: 5, ..test_config(14) };
        let source = Recording::default();
        let mut sim = SimBuilder::new(config, garden(), source.clone())
            .agent(agent_config(true))
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let steps: Vec<(u64, u64)> = source
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.episode, r.episode_step))
            .collect();
        assert_eq!(steps, [(0, 0), (0, 5), (1, 0), (1, 5)]);
    }

    #[test]
    fn trailing_reward_is_reported() {
        let config = SimConfig { max_step: 3, decision_period: 100, ..test_config(3) };
        let mut sim = SimBuilder::new(config, garden(), NoopSource)
            .agent(agent_config(true))
            .build()
            .unwrap();
        sim.agents[0].body_mut().set_pose(Pose::from_position(Vec3::new(0.0, 0.03, 0.0)));

        let mut log = Log::default();
        sim.run(&mut log).unwrap();
        let summary = log.episodes[0];
        assert!((summary.reward + 0.5).abs() < 1e-6);
        assert!((summary.trailing_reward + 0.5).abs() < 1e-6);
        assert_eq!(sim.agents[0].episode_reward(), 0.0, "new episode starts at zero");
    }

    #[test]
    fn unbounded_without_training() {
        let config = SimConfig { max_step: 5, ..test_config(30) };
        let mut sim = SimBuilder::new(config, garden(), NoopSource)
            .agent(agent_config(false))
            .build()
            .unwrap();
        let mut log = Log::default();
        sim.run(&mut log).unwrap();
        assert!(log.episodes.is_empty());
        assert_eq!(sim.episode(AgentId(0)).step, 30);
    }
}

// ── Batches ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod batch_tests {
    use super::*;
    use crate::{SimError, run_arenas};

    #[test]
    fn runs_every_arena() {
        let mut sims: Vec<_> = (0..3)
            .map(|_| SimBuilder::new(test_config(6), garden(), NoopSource).build().unwrap())
            .collect();
        let mut logs: Vec<Log> = (0..3).map(|_| Log::default()).collect();
        run_arenas(&mut sims, &mut logs).unwrap();
        assert!(logs.iter().all(|l| l.end_tick == Some(Tick(6))));
    }

    #[test]
    fn observer_count_must_match() {
        let mut sims = vec![SimBuilder::new(test_config(6), garden(), NoopSource).build().unwrap()];
        let mut observers: Vec<NoopObserver> = Vec::new();
        assert!(matches!(
            run_arenas(&mut sims, &mut observers),
            Err(SimError::ArenaCountMismatch { expected: 1, got: 0, .. })
        ));
    }
}

// ── Freeze ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod freeze_tests {
    use super::*;

    #[test]
    fn frozen_agent_holds_position_under_thrust() {
        let mut sim = SimBuilder::new(test_config(30), garden(), Thrust(Vec3::Y))
            .agents(2, agent_config(false))
            .build()
            .unwrap();
        sim.agent_mut(AgentId(0)).freeze();
        let frozen_at = sim.agent(AgentId(0)).pose().position;
        let free_at = sim.agent(AgentId(1)).pose().position;

        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.agent(AgentId(0)).pose().position.distance(frozen_at) < 1e-6);
        assert!(sim.agent(AgentId(1)).pose().position.y > free_at.y + 0.1, "free agent climbs");

        sim.agent_mut(AgentId(0)).unfreeze();
        sim.run_ticks(10, &mut NoopObserver).unwrap();
        assert!(sim.agent(AgentId(0)).pose().position.y > frozen_at.y, "unfrozen agent climbs");
    }
}

// ── Event queue ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_tests {
    use hb_core::ColliderId;
    use hb_world::ContactPhase;

    use super::*;
    use crate::{ContactEvent, ContactKind, EventQueue};

    #[test]
    fn events_drain_in_push_order() {
        let mut queue = EventQueue::new();
        queue.extend_from_edges(
            AgentId(0),
            ContactKind::Trigger,
            vec![(ColliderId(2), ContactPhase::Enter), (ColliderId(5), ContactPhase::Stay)],
        );
        queue.push(ContactEvent {
            agent:    AgentId(1),
            collider: ColliderId(0),
            kind:     ContactKind::Collision,
            phase:    ContactPhase::Enter,
        });
        assert_eq!(queue.len(), 3);

        let order: Vec<(AgentId, ColliderId)> =
            std::iter::from_fn(|| queue.pop()).map(|e| (e.agent, e.collider)).collect();
        assert_eq!(order, [
            (AgentId(0), ColliderId(2)),
            (AgentId(0), ColliderId(5)),
            (AgentId(1), ColliderId(0)),
        ]);
        assert!(queue.is_empty());
    }
}
