//! Episode errors. Normal termination is not an error; these are
//! configuration problems found before the first tick or a decision
//! function failing mid-episode.

use thiserror::Error;

use flappy_core::config::ConfigError;
use flappy_core::decision::DecisionError;
use flappy_core::types::AgentId;

#[derive(Debug, Error)]
pub enum EpisodeError {
    #[error("population is empty")]
    EmptyPopulation,
    #[error("{agent} decision function has output arity {arity}, need at least 1")]
    OutputArity { agent: AgentId, arity: usize },
    #[error("replay takes exactly one decision function, got {count}")]
    ReplayArity { count: usize },
    #[error("{agent} decision function failed: {source}")]
    Decision {
        agent: AgentId,
        #[source]
        source: DecisionError,
    },
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
