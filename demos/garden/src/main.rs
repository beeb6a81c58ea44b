//! garden — hummingbird arenas flown headless by a scripted autopilot.
//!
//! Builds a ring of flowering plants, runs the fixed-tick loop and writes
//! `episodes.csv` and `tick_summaries.csv`.  Pass a JSON file as the first
//! argument to override any setting (see `config.rs`); set `RUST_LOG=debug`
//! to see episode boundaries and target switches.  With `arenas > 1` every
//! garden gets its own seed and output subdirectory, and the `parallel`
//! feature runs them on all cores.

mod autopilot;
mod config;
mod scene;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Result, bail};
use hb_agent::{Arena, EpisodeSummary, HummingbirdAgent};
use hb_core::{SimConfig, SimRng, Tick};
use hb_output::{CsvWriter, OutputWriter, SimOutputObserver};
use hb_sim::{Sim, SimBuilder, SimObserver, TickStats, run_arenas};
use tracing::info;
use tracing_subscriber::EnvFilter;

use autopilot::Autopilot;
use config::GardenConfig;
use scene::build_garden;

// ── Observer wrapper that tallies the run ────────────────────────────────────

struct TallyObserver<W: OutputWriter> {
    inner:    SimOutputObserver<W>,
    arena:    usize,
    episodes: usize,
    feeds:    usize,
    reward:   f32,
}

impl<W: OutputWriter> TallyObserver<W> {
    fn new(inner: SimOutputObserver<W>, arena: usize) -> Self {
        Self { inner, arena, episodes: 0, feeds: 0, reward: 0.0 }
    }
}

impl<W: OutputWriter> SimObserver for TallyObserver<W> {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.episodes += 1;
        self.reward += summary.reward;
        info!(
            arena = self.arena,
            agent = %summary.agent,
            episode = summary.episode,
            reward = summary.reward,
            nectar = summary.nectar,
            "episode finished"
        );
        self.inner.on_episode_end(summary);
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        self.feeds += stats.feeds;
        self.inner.on_tick_end(tick, stats);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[HummingbirdAgent], arena: &Arena) {
        self.inner.on_snapshot(tick, agents, arena);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn build_sim(config: &GardenConfig, sim_config: SimConfig) -> Result<Sim<Autopilot>> {
    let arena = Arena::new(build_garden(config.plants), config.colors)?;
    info!(
        seed = sim_config.seed,
        plants = arena.flowers.plants().len(),
        flowers = arena.flowers.len(),
        colliders = arena.world.len(),
        "garden built"
    );
    let sim = SimBuilder::new(sim_config, arena, Autopilot::default())
        .agents(config.agents, config.agent.clone())
        .build()?;
    Ok(sim)
}

fn output_dir(config: &GardenConfig, arena: usize) -> PathBuf {
    let root = Path::new(&config.output_dir);
    if config.arenas == 1 { root.to_path_buf() } else { root.join(format!("arena_{arena}")) }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => GardenConfig::load(Path::new(&path))?,
        None => GardenConfig::default(),
    };
    if config.agents == 0 || config.arenas == 0 {
        bail!("at least one arena with one agent is required");
    }

    // 1. Build one sim per arena.  A single arena keeps the configured seed.
    let mut seeds = SimRng::new(config.sim.seed);
    let mut sims = Vec::with_capacity(config.arenas);
    let mut observers = Vec::with_capacity(config.arenas);
    for i in 0..config.arenas {
        let seed = if config.arenas == 1 { config.sim.seed } else { seeds.next_seed() };
        let sim_config = SimConfig { seed, ..config.sim.clone() };
        sims.push(build_sim(&config, sim_config.clone())?);

        let writer = CsvWriter::new(&output_dir(&config, i))?;
        observers.push(TallyObserver::new(SimOutputObserver::new(writer, &sim_config), i));
    }

    // 2. Run.
    info!(
        arenas = config.arenas,
        agents = config.agents,
        ticks = config.sim.total_ticks,
        max_step = config.sim.max_step,
        "running"
    );
    let t0 = Instant::now();
    run_arenas(&mut sims, &mut observers)?;
    let elapsed = t0.elapsed();

    for obs in &mut observers {
        if let Some(e) = obs.inner.take_error() {
            eprintln!("output error (arena {}): {e}", obs.arena);
        }
    }

    // 3. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  output : {}", config.output_dir);
    println!();

    println!(
        "{:<6} {:<6} {:<10} {:<10} {:<8} {:<9} {:<8}",
        "Arena", "Agent", "Nectar", "Reward", "Target", "Episodes", "Feeds"
    );
    println!("{}", "-".repeat(62));
    for (sim, obs) in sims.iter().zip(&observers) {
        for agent in &sim.agents {
            println!(
                "{:<6} {:<6} {:<10.3} {:<10.3} {:<8} {:<9} {:<8}",
                obs.arena,
                agent.id().0,
                agent.nectar_obtained(),
                agent.episode_reward(),
                agent.target().map_or_else(|| "-".to_owned(), |f| f.0.to_string()),
                obs.episodes,
                obs.feeds,
            );
        }
        if obs.episodes > 0 {
            println!("       mean episode reward {:.3}", obs.reward / obs.episodes as f32);
        }
    }

    Ok(())
}
