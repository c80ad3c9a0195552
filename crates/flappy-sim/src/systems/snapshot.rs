//! Snapshot system: builds the renderer view. Read-only.

use flappy_core::enums::EpisodeState;
use flappy_core::events::EpisodeEvent;
use flappy_core::state::EpisodeSnapshot;
use flappy_core::types::SimTime;

use crate::obstacle::ObstacleTrack;
use crate::population::Population;

/// Scalar episode fields carried into a snapshot.
pub struct SnapshotHeader {
    pub time: SimTime,
    pub state: EpisodeState,
    pub generation: u32,
    pub score: u32,
    pub sensed_obstacle: usize,
}

pub fn build_snapshot(
    header: SnapshotHeader,
    population: &Population,
    track: &ObstacleTrack,
    events: Vec<EpisodeEvent>,
) -> EpisodeSnapshot {
    EpisodeSnapshot {
        time: header.time,
        state: header.state,
        generation: header.generation,
        score: header.score,
        alive: population.len(),
        sensed_obstacle: header.sensed_obstacle,
        agents: population.views(),
        obstacles: track.views(),
        events,
    }
}
