//! Scoring system: obstacle retirement, pass detection, spawning.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use flappy_core::config::SimConfig;
use flappy_core::events::EpisodeEvent;

use crate::obstacle::ObstacleTrack;
use crate::population::Population;

/// Retire off-screen obstacles, then check survivors against the field.
///
/// A pass is a property of the tick, not of each obstacle or agent: however
/// many obstacles become passed at once, the score rises by one, one
/// obstacle spawns, and each survivor gets one bonus. Returns whether a pass
/// happened.
pub fn run(
    population: &mut Population,
    track: &mut ObstacleTrack,
    rng: &mut ChaCha8Rng,
    config: &SimConfig,
    score: &mut u32,
    events: &mut Vec<EpisodeEvent>,
) -> bool {
    let retired = track.retire_off_screen();
    events.extend(std::iter::repeat(EpisodeEvent::ObstacleRetired).take(retired));

    let Some(front_x) = population.frontmost_x() else {
        return false;
    };
    if track.mark_passed(front_x) == 0 {
        return false;
    }

    *score += 1;
    population.reward_all(config.pass_bonus);
    events.push(EpisodeEvent::ObstaclePassed { score: *score });

    let spawned = track.spawn(config.screen_width, config, rng);
    debug!(score = *score, gap_top = spawned.gap_top, "obstacle passed");
    events.push(EpisodeEvent::ObstacleSpawned {
        x: spawned.x,
        gap_top: spawned.gap_top,
    });
    true
}
