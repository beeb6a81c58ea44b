//! Plain data row types written by output backends.

/// One finished episode of one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeRow {
    pub agent_id:        u32,
    pub episode:         u64,
    /// Tick the episode ended on.
    pub end_tick:        u64,
    pub steps:           u64,
    pub reward:          f32,
    pub trailing_reward: f32,
    pub nectar:          f32,
}

/// Arena-wide state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:                u64,
    pub elapsed_secs:        f64,
    /// Decisions taken on this tick.
    pub decisions:           u64,
    /// Feeding contacts on this tick.
    pub feeds:               u64,
    /// Sum of every agent's nectar for its current episode.
    pub nectar_obtained:     f32,
    /// Flowers that still hold nectar.
    pub flowers_with_nectar: u32,
    pub remaining_nectar:    f32,
}
