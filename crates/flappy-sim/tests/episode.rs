//! End-to-end episode scenarios driven through the public API.

use flappy_sim::core::config::{ConfigError, SimConfig};
use flappy_sim::core::decision::{BoxedDecision, SensorInputs};
use flappy_sim::core::enums::{DeathCause, EpisodeMode, EpisodeState, TerminationReason};
use flappy_sim::core::types::AgentId;
use flappy_sim::engine::EpisodeReport;
use flappy_sim::generation::{run_generation, PopulationProvider};
use flappy_sim::replay::run_replay;
use flappy_sim::{Episode, EpisodeError, EpisodeSetup};

fn idle(count: usize) -> Vec<BoxedDecision> {
    (0..count)
        .map(|_| Box::new(|_: &SensorInputs| 0.0) as BoxedDecision)
        .collect()
}

/// Jump when below the gap centre and far enough under the gap top.
fn centering(clearance: f64) -> BoxedDecision {
    Box::new(move |s: &SensorInputs| {
        if s.to_gap_bottom < s.to_gap_top && s.to_gap_top > clearance {
            1.0
        } else {
            0.0
        }
    })
}

/// Gap pinned at 300..460 with no gravity: idle agents hover in the gap
/// at y = 350 forever and pass every obstacle.
fn hover_config() -> SimConfig {
    SimConfig {
        gravity: 0.0,
        gap_top_min: 300,
        gap_top_max: 301,
        ..Default::default()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_idle_agents_fall_to_the_floor() {
    let config = SimConfig::default();
    let mut episode = Episode::new(&config, EpisodeSetup::default(), idle(3)).unwrap();
    let report = episode.run(None).unwrap();

    assert_eq!(report.reason, TerminationReason::Extinction);
    assert_eq!(report.ticks, 24);
    assert_eq!(report.score, 0);
    assert_eq!(report.count_by_cause(DeathCause::Floor), 3);
    let ids: Vec<AgentId> = report.outcomes.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![AgentId(0), AgentId(1), AgentId(2)]);
    for outcome in &report.outcomes {
        assert_eq!(outcome.died_at_tick, 24);
        assert!(approx(outcome.fitness_delta, 2.4));
    }
    assert_eq!(episode.state(), EpisodeState::Terminated);
}

#[test]
fn test_score_ceiling_ends_episode_with_bonus() {
    let config = hover_config();
    let mut episode = Episode::new(&config, EpisodeSetup::default(), idle(2)).unwrap();

    let final_snapshot = loop {
        let snap = episode.tick().unwrap();
        if snap.score > 150 {
            break snap;
        }
        assert_eq!(snap.alive, 2, "no deaths while hovering");
    };

    // Removed in the same tick the ceiling is crossed.
    assert_eq!(final_snapshot.alive, 0);
    assert_eq!(final_snapshot.state, EpisodeState::Terminated);
    assert_eq!(final_snapshot.score, 151);
    assert_eq!(final_snapshot.time.tick, 11_345);

    let report = episode.report().unwrap();
    assert_eq!(report.reason, TerminationReason::ScoreCeiling);
    assert_eq!(report.count_by_cause(DeathCause::ScoreCeiling), 2);
    for outcome in &report.outcomes {
        // 11345 ticks survived, 151 passes, plus the ceiling bonus.
        assert!(approx(outcome.fitness_delta, 1134.5 + 755.0 + 1000.0));
    }
}

#[test]
fn test_score_ceiling_disabled() {
    let config = SimConfig {
        score_ceiling: None,
        ..hover_config()
    };
    let mut episode = Episode::new(&config, EpisodeSetup::default(), idle(1)).unwrap();
    let report = episode.run(Some(12_000)).unwrap();

    assert_eq!(report.reason, TerminationReason::TickLimit);
    assert_eq!(report.score, 159);
    assert_eq!(report.outcomes[0].cause, DeathCause::TickLimit);
}

#[test]
fn test_first_pass_timing() {
    let config = hover_config();
    let mut episode = Episode::new(&config, EpisodeSetup::default(), idle(1)).unwrap();
    for _ in 0..94 {
        assert_eq!(episode.tick().unwrap().score, 0);
    }
    let snap = episode.tick().unwrap();
    assert_eq!(snap.score, 1);
    assert_eq!(snap.obstacles.len(), 2);
    assert_eq!(snap.obstacles[1].x, config.screen_width);
    assert!(snap.obstacles[0].passed);
}

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig::default();
    let setup = EpisodeSetup {
        seed: 12345,
        ..Default::default()
    };
    let pilots = || -> Vec<BoxedDecision> {
        (0..5).map(|i| centering(80.0 + i as f64 * 4.0)).collect()
    };
    let mut a = Episode::new(&config, setup, pilots()).unwrap();
    let mut b = Episode::new(&config, setup, pilots()).unwrap();

    for _ in 0..600 {
        let json_a = serde_json::to_string(&a.tick().unwrap()).unwrap();
        let json_b = serde_json::to_string(&b.tick().unwrap()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_gap_centering_outlives_idle() {
    let config = SimConfig::default();
    for seed in [1, 2, 3, 4] {
        let setup = EpisodeSetup {
            seed,
            ..Default::default()
        };
        let mut episode = Episode::new(&config, setup, vec![centering(94.0)]).unwrap();
        let report = episode.run(Some(2_000)).unwrap();
        // The first obstacle cannot reach the agent before tick 81.
        assert!(report.ticks >= 80, "seed {seed}: died at {}", report.ticks);
        assert_ne!(report.outcomes[0].cause, DeathCause::Floor);
        assert_ne!(report.outcomes[0].cause, DeathCause::Ceiling);
    }
}

#[test]
fn test_configuration_errors() {
    let config = SimConfig::default();
    assert!(matches!(
        Episode::new(&config, EpisodeSetup::default(), Vec::new()),
        Err(EpisodeError::EmptyPopulation)
    ));

    let replay = EpisodeSetup {
        mode: EpisodeMode::Replay,
        ..Default::default()
    };
    assert!(matches!(
        Episode::new(&config, replay, idle(2)),
        Err(EpisodeError::ReplayArity { count: 2 })
    ));

    let broken = SimConfig {
        tick_rate: 0,
        ..Default::default()
    };
    assert!(matches!(
        Episode::new(&broken, EpisodeSetup::default(), idle(1)),
        Err(EpisodeError::InvalidConfig(_))
    ));
}

#[test]
fn test_agents_behind_the_screen_are_rejected() {
    // Starting behind x = 0 would let the first obstacle retire unpassed.
    let config = SimConfig {
        agent_start_x: -200.0,
        gravity: 0.0,
        score_ceiling: None,
        ..Default::default()
    };
    assert!(matches!(
        Episode::new(&config, EpisodeSetup::default(), idle(1)),
        Err(EpisodeError::InvalidConfig(ConfigError::AgentStartX { .. }))
    ));
}

#[test]
fn test_replay_idle_agent() {
    let config = SimConfig::default();
    let result = run_replay(&config, Box::new(|_: &SensorInputs| 0.0), 7, None).unwrap();
    assert_eq!(result.cause, DeathCause::Floor);
    assert_eq!(result.ticks, 24);
    assert_eq!(result.score, 0);
}

#[test]
fn test_replay_ignores_score_ceiling() {
    let config = hover_config();
    let result = run_replay(&config, Box::new(|_: &SensorInputs| 0.0), 7, Some(12_000)).unwrap();
    assert_eq!(result.cause, DeathCause::TickLimit);
    assert_eq!(result.score, 159);
    assert_eq!(result.ticks, 12_000);
    assert!(approx(result.fitness_delta, 1200.0 + 795.0));
}

#[derive(Default)]
struct Recorder {
    asked: Vec<u32>,
    reports: Vec<EpisodeReport>,
}

impl PopulationProvider for Recorder {
    fn decision_functions(&mut self, generation: u32) -> Vec<BoxedDecision> {
        self.asked.push(generation);
        idle(4)
    }

    fn record(&mut self, report: &EpisodeReport) {
        self.reports.push(report.clone());
    }
}

#[test]
fn test_generation_runner_feeds_provider() {
    let config = SimConfig::default();
    let mut provider = Recorder::default();
    for generation in 0..3 {
        let report = run_generation(&mut provider, &config, generation, 99, None).unwrap();
        assert_eq!(report.generation, generation);
        assert_eq!(report.mode, EpisodeMode::Evaluation);
    }

    assert_eq!(provider.asked, vec![0, 1, 2]);
    assert_eq!(provider.reports.len(), 3);
    for report in &provider.reports {
        assert_eq!(report.outcomes.len(), 4);
        assert!(report.best().is_some());
    }
}
