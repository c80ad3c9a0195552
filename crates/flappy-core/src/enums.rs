//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Top-level episode state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeState {
    #[default]
    Running,
    Terminated,
}

/// Whether an episode evaluates a population or replays a single agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeMode {
    /// Many agents, pruned as they die, with the score ceiling active.
    #[default]
    Evaluation,
    /// Exactly one agent, running until its own death.
    Replay,
}

/// Why an agent left the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Silhouette overlapped an obstacle.
    Collision,
    /// Sank through the floor line.
    Floor,
    /// Flew above the top of the screen.
    Ceiling,
    /// Removed alive because the score ceiling was reached.
    ScoreCeiling,
    /// Still alive when the host stopped the episode.
    TickLimit,
    /// Still alive when a decision function failed and ended the episode.
    DecisionFailure,
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// No agents remain.
    Extinction,
    /// Score exceeded the configured ceiling.
    ScoreCeiling,
    /// The host's tick limit was hit.
    TickLimit,
    /// A decision function returned an error.
    DecisionFailure,
}
