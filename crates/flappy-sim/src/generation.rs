//! Generation runner: one evaluation episode per call, fed by an external
//! population provider.

use flappy_core::config::SimConfig;
use flappy_core::decision::BoxedDecision;
use flappy_core::enums::EpisodeMode;

use crate::engine::{Episode, EpisodeReport, EpisodeSetup};
use crate::error::EpisodeError;

/// Supplies decision functions for an episode and receives the results.
///
/// The neuroevolution process sits behind this trait; the simulation never
/// sees genomes, only the decision functions built from them.
pub trait PopulationProvider {
    /// Ordered decision functions, one per agent. Agent `i` in the report
    /// corresponds to element `i`.
    fn decision_functions(&mut self, generation: u32) -> Vec<BoxedDecision>;

    /// Per-agent fitness deltas and causes of death for the episode.
    fn record(&mut self, report: &EpisodeReport);
}

/// Evaluate one generation headless and hand the report to the provider.
pub fn run_generation<P: PopulationProvider + ?Sized>(
    provider: &mut P,
    config: &SimConfig,
    generation: u32,
    seed: u64,
    max_ticks: Option<u64>,
) -> Result<EpisodeReport, EpisodeError> {
    let pilots = provider.decision_functions(generation);
    let setup = EpisodeSetup {
        seed,
        generation,
        mode: EpisodeMode::Evaluation,
    };
    let mut episode = Episode::new(config, setup, pilots)?;
    let report = episode.run(max_ticks)?;
    provider.record(&report);
    Ok(report)
}
