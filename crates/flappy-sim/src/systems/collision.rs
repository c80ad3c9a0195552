//! Collision system: agent silhouettes against every live obstacle.

use crate::obstacle::ObstacleTrack;
use crate::population::Population;
use crate::silhouette::Silhouettes;

/// Penalize each agent touching any obstacle and mark its row for removal.
/// An agent touching two obstacles is penalized once.
pub fn run(
    population: &mut Population,
    track: &ObstacleTrack,
    silhouettes: &Silhouettes,
    penalty: f64,
) -> Vec<bool> {
    let mut hits = vec![false; population.len()];
    for (index, agent) in population.agents_mut().enumerate() {
        let position = agent.body.position();
        if track
            .obstacles()
            .iter()
            .any(|o| o.intersects(silhouettes, position))
        {
            agent.tally.add(-penalty);
            hits[index] = true;
        }
    }
    hits
}
