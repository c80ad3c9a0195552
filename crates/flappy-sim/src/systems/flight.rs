//! Flight system: survival reward, sensing, decisions, and physics.

use flappy_core::config::SimConfig;
use flappy_core::decision::SensorInputs;
use flappy_core::events::EpisodeEvent;

use crate::error::EpisodeError;
use crate::obstacle::ObstacleTrack;
use crate::population::Population;

/// Obstacle index every agent senses this tick, judged from the lead agent.
pub fn sensed_index(population: &Population, track: &ObstacleTrack) -> usize {
    population
        .lead()
        .map_or(0, |lead| track.sensed_index(lead.x))
}

/// Reward, query, and move every surviving agent.
///
/// With no obstacle to sense, agents are rewarded and fall without being
/// queried. A failing decision function aborts the tick with its error.
pub fn run(
    population: &mut Population,
    track: &ObstacleTrack,
    sensed: usize,
    config: &SimConfig,
    events: &mut Vec<EpisodeEvent>,
) -> Result<(), EpisodeError> {
    let gap = track.get(sensed).map(|o| (o.gap_top, o.gap_bottom));

    for agent in population.agents_mut() {
        agent.tally.add(config.survival_reward);

        let Some((gap_top, gap_bottom)) = gap else {
            agent.body.step(config);
            continue;
        };
        let inputs = SensorInputs::sense(agent.body.y, gap_top, gap_bottom);
        let output = agent
            .pilot
            .evaluate(&inputs)
            .map_err(|source| EpisodeError::Decision {
                agent: agent.id,
                source,
            })?;
        let signal = output.first().copied().ok_or(EpisodeError::OutputArity {
            agent: agent.id,
            arity: 0,
        })?;

        if signal > config.jump_threshold {
            agent.body.jump(config);
            events.push(EpisodeEvent::Jumped { agent: agent.id });
        }
        agent.body.step(config);
    }
    Ok(())
}
