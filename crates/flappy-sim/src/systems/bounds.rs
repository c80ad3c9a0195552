//! Bounds system: floor and ceiling deaths.

use flappy_core::config::SimConfig;
use flappy_core::enums::DeathCause;

use crate::population::Population;

/// Per-row death cause for agents that left the playfield vertically.
pub fn run(population: &Population, agent_height: f64, config: &SimConfig) -> Vec<Option<DeathCause>> {
    population
        .bodies()
        .iter()
        .map(|body| {
            if body.y + agent_height - config.floor_clearance >= config.floor_y {
                Some(DeathCause::Floor)
            } else if body.y < config.ceiling_y {
                Some(DeathCause::Ceiling)
            } else {
                None
            }
        })
        .collect()
}
