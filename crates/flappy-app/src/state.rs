//! State shared between the host and the frame-pump thread.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use flappy_core::enums::{DeathCause, TerminationReason};
use flappy_core::state::EpisodeSnapshot;
use flappy_sim::engine::EpisodeReport;

/// Commands sent from the host to the frame-pump thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameLoopCommand {
    /// Stop ticking until `Resume`.
    Pause,
    Resume,
    /// End the episode at the next tick boundary.
    Shutdown,
}

/// How fast the frame pump ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pace {
    /// As fast as the episode computes.
    #[default]
    Unthrottled,
    /// One tick per `1 / tick_rate` seconds.
    Realtime,
}

/// Latest snapshot, updated by the frame pump after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<EpisodeSnapshot>>>;

/// One line of per-generation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub ticks: u64,
    pub score: u32,
    pub reason: TerminationReason,
    pub best_fitness: Option<f64>,
    pub mean_fitness: f64,
    pub collisions: usize,
    pub floor: usize,
    pub ceiling: usize,
    pub score_ceiling: usize,
    pub tick_limit: usize,
}

impl From<&EpisodeReport> for GenerationSummary {
    fn from(report: &EpisodeReport) -> Self {
        let total: f64 = report.outcomes.iter().map(|o| o.fitness_delta).sum();
        let mean_fitness = match report.outcomes.len() {
            0 => 0.0,
            n => total / n as f64,
        };
        Self {
            generation: report.generation,
            ticks: report.ticks,
            score: report.score,
            reason: report.reason,
            best_fitness: report.best().map(|o| o.fitness_delta),
            mean_fitness,
            collisions: report.count_by_cause(DeathCause::Collision),
            floor: report.count_by_cause(DeathCause::Floor),
            ceiling: report.count_by_cause(DeathCause::Ceiling),
            score_ceiling: report.count_by_cause(DeathCause::ScoreCeiling),
            tick_limit: report.count_by_cause(DeathCause::TickLimit),
        }
    }
}
