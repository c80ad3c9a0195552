//! Events emitted by the simulation during a tick, for renderers and logs.

use serde::{Deserialize, Serialize};

use crate::enums::{DeathCause, TerminationReason};
use crate::types::AgentId;

/// Something that happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EpisodeEvent {
    /// An agent's decision function asked for a jump.
    Jumped { agent: AgentId },
    /// The shared obstacle field was passed; score is the new total.
    ObstaclePassed { score: u32 },
    /// A new obstacle entered at the spawn line.
    ObstacleSpawned { x: f64, gap_top: f64 },
    /// An obstacle scrolled fully off-screen.
    ObstacleRetired,
    /// An agent was removed from the population.
    AgentDied { agent: AgentId, cause: DeathCause },
    /// The episode reached its terminal state.
    Terminated { reason: TerminationReason },
}
