//! Single-agent replay: one decision function, no pruning ambiguity, no
//! score ceiling. Runs until the agent dies or the host's tick limit.

use serde::{Deserialize, Serialize};

use flappy_core::config::SimConfig;
use flappy_core::decision::BoxedDecision;
use flappy_core::enums::DeathCause;

use crate::engine::Episode;
use crate::error::EpisodeError;

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub score: u32,
    pub ticks: u64,
    pub cause: DeathCause,
    pub fitness_delta: f64,
}

/// Replay `pilot` on the obstacle field generated by `seed`.
pub fn run_replay(
    config: &SimConfig,
    pilot: BoxedDecision,
    seed: u64,
    max_ticks: Option<u64>,
) -> Result<ReplayResult, EpisodeError> {
    let mut episode = Episode::replay(config, pilot, seed)?;
    let report = episode.run(max_ticks)?;
    let outcome = report.outcomes.first().copied();
    Ok(ReplayResult {
        score: report.score,
        ticks: report.ticks,
        cause: outcome.map_or(DeathCause::TickLimit, |o| o.cause),
        fitness_delta: outcome.map_or(0.0, |o| o.fitness_delta),
    })
}
