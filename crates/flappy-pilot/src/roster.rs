//! Population provider over a fixed list of network weight sets.
//!
//! Genome `i` drives agent `i` every generation. After each episode the
//! roster keeps the latest fitness and cause of death per genome and tracks
//! the best genome seen so far. Selection and mutation belong to whatever
//! replaces the weights between generations.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use flappy_core::decision::BoxedDecision;
use flappy_core::enums::DeathCause;
use flappy_sim::engine::EpisodeReport;
use flappy_sim::generation::PopulationProvider;

use crate::network::{Activation, FeedForwardPilot, FeedForwardWeights, NetworkError};

/// Latest result for one genome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenomeRecord {
    pub generation: u32,
    pub fitness: f64,
    pub cause: DeathCause,
}

#[derive(Debug, Clone)]
pub struct WeightRoster {
    genomes: Vec<FeedForwardWeights>,
    records: Vec<Option<GenomeRecord>>,
    /// Best genome over all recorded generations, with its fitness.
    best: Option<(usize, f64)>,
}

impl WeightRoster {
    pub fn new(genomes: Vec<FeedForwardWeights>) -> Self {
        Self {
            records: vec![None; genomes.len()],
            genomes,
            best: None,
        }
    }

    /// `count` random networks of the given shape, reproducible from `seed`.
    pub fn random(
        count: usize,
        shape: &[usize],
        hidden: Activation,
        seed: u64,
    ) -> Result<Self, NetworkError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let genomes = (0..count)
            .map(|_| FeedForwardWeights::random(shape, hidden, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(genomes))
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn genomes(&self) -> &[FeedForwardWeights] {
        &self.genomes
    }

    /// Swap in a new weight set for genome `index`, clearing its record.
    pub fn replace(&mut self, index: usize, weights: FeedForwardWeights) {
        if let Some(slot) = self.genomes.get_mut(index) {
            *slot = weights;
            self.records[index] = None;
            if self.best_index() == Some(index) {
                self.best = None;
            }
        }
    }

    pub fn record_for(&self, index: usize) -> Option<&GenomeRecord> {
        self.records.get(index)?.as_ref()
    }

    /// Index of the best genome so far.
    pub fn best_index(&self) -> Option<usize> {
        self.best.map(|(index, _)| index)
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.map(|(_, fitness)| fitness)
    }

    pub fn best(&self) -> Option<&FeedForwardWeights> {
        self.genomes.get(self.best_index()?)
    }
}

impl PopulationProvider for WeightRoster {
    fn decision_functions(&mut self, generation: u32) -> Vec<BoxedDecision> {
        debug!(generation, genomes = self.genomes.len(), "building pilots");
        self.genomes
            .iter()
            .cloned()
            .map(|weights| Box::new(FeedForwardPilot::new(weights)) as BoxedDecision)
            .collect()
    }

    fn record(&mut self, report: &EpisodeReport) {
        for outcome in &report.outcomes {
            let index = outcome.id.0 as usize;
            let Some(slot) = self.records.get_mut(index) else {
                continue;
            };
            *slot = Some(GenomeRecord {
                generation: report.generation,
                fitness: outcome.fitness_delta,
                cause: outcome.cause,
            });
            if self.best.map_or(true, |(_, best)| outcome.fitness_delta > best) {
                self.best = Some((index, outcome.fitness_delta));
            }
        }
    }
}
