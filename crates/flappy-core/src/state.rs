//! Episode snapshot: the read-only per-tick view handed to renderers.

use serde::{Deserialize, Serialize};

use crate::enums::EpisodeState;
use crate::events::EpisodeEvent;
use crate::types::{AgentId, SimTime};

/// Complete visible state after one tick. There is no path from a snapshot
/// back into the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSnapshot {
    pub time: SimTime,
    pub state: EpisodeState,
    /// Informational generation counter supplied by the host.
    pub generation: u32,
    /// Population-level score: obstacles passed this episode.
    pub score: u32,
    pub alive: usize,
    /// Index into `obstacles` that agents are currently sensing.
    pub sensed_obstacle: usize,
    pub agents: Vec<AgentView>,
    pub obstacles: Vec<ObstacleView>,
    /// Events raised during the tick that produced this snapshot.
    pub events: Vec<EpisodeEvent>,
}

/// One live agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    /// Rotation in degrees, positive = nose up.
    pub tilt: f64,
    /// Wing sprite index (0..=2).
    pub wing_frame: u8,
}

/// One live obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: f64,
    pub width: f64,
    pub gap_top: f64,
    pub gap_bottom: f64,
    pub passed: bool,
}
