//! Run configuration, optionally loaded from a JSON file.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```json
//! { "agents": 4, "sim": { "seed": 7, "total_ticks": 20000 } }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use hb_agent::AgentConfig;
use hb_core::SimConfig;
use hb_flower::FlowerColors;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    pub sim:        SimConfig,
    pub agent:      AgentConfig,
    pub colors:     FlowerColors,
    /// Birds sharing each garden.
    pub agents:     usize,
    /// Independent gardens, each seeded from `sim.seed`.
    pub arenas:     usize,
    /// Plants in the ring (three flowers each).
    pub plants:     usize,
    pub output_dir: String,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            sim:        SimConfig { seed: 42, total_ticks: 15_000, ..SimConfig::default() },
            agent:      AgentConfig::default(),
            colors:     FlowerColors::default(),
            agents:     1,
            arenas:     1,
            plants:     6,
            output_dir: "output/garden".to_owned(),
        }
    }
}

impl GardenConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
