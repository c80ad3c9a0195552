#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use flappy_core::config::SimConfig;
    use flappy_core::decision::{DecisionFunction, SensorInputs};
    use flappy_core::enums::{DeathCause, EpisodeMode, TerminationReason};
    use flappy_core::types::AgentId;
    use flappy_sim::engine::{AgentOutcome, EpisodeReport};
    use flappy_sim::generation::{run_generation, PopulationProvider};
    use flappy_sim::replay::run_replay;

    use crate::heuristic::{ConstantPilot, GapCenteringPilot};
    use crate::network::{Activation, FeedForwardPilot, FeedForwardWeights, Layer, NetworkError};
    use crate::roster::WeightRoster;

    fn identity_layer(weights: Vec<f64>, biases: Vec<f64>) -> Layer {
        Layer {
            weights,
            biases,
            activation: Activation::Identity,
        }
    }

    fn report(generation: u32, fitness: &[f64]) -> EpisodeReport {
        EpisodeReport {
            generation,
            mode: EpisodeMode::Evaluation,
            score: 0,
            ticks: 10,
            reason: TerminationReason::Extinction,
            outcomes: fitness
                .iter()
                .enumerate()
                .map(|(i, f)| AgentOutcome {
                    id: AgentId(i as u32),
                    fitness_delta: *f,
                    cause: DeathCause::Floor,
                    died_at_tick: 10,
                })
                .collect(),
        }
    }

    // ---- Heuristics ----

    #[test]
    fn test_constant_pilot() {
        let mut pilot = ConstantPilot::FLAP;
        assert_eq!(pilot.output_arity(), 1);
        assert_eq!(pilot.evaluate(&SensorInputs::default()).unwrap(), vec![1.0]);
        let mut idle = ConstantPilot::IDLE;
        assert_eq!(idle.evaluate(&SensorInputs::default()).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_gap_centering_decisions() {
        let pilot = GapCenteringPilot::default();
        let at = |y: f64| pilot.wants_flap(&SensorInputs::sense(y, 300.0, 460.0));

        assert!(!at(200.0), "above the gap");
        assert!(!at(350.0), "upper half");
        assert!(!at(390.0), "lower half, within clearance");
        assert!(at(400.0), "lower half, past clearance");
        assert!(at(500.0), "below the gap");
    }

    #[test]
    fn test_gap_centering_survives_past_first_obstacle_arrival() {
        let config = SimConfig::default();
        for seed in [11, 12, 13] {
            let result =
                run_replay(&config, GapCenteringPilot::default().boxed(), seed, Some(1_500))
                    .unwrap();
            assert!(result.ticks >= 80, "seed {seed}: died at {}", result.ticks);
            assert!(
                !matches!(result.cause, DeathCause::Floor | DeathCause::Ceiling),
                "seed {seed}: left the playfield"
            );
        }
    }

    // ---- Network ----

    #[test]
    fn test_activations() {
        assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert!(Activation::Sigmoid.apply(100.0) > 0.999);
        assert!(Activation::Sigmoid.apply(-100.0) < 0.001);
        assert_eq!(Activation::Tanh.apply(0.0), 0.0);
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::Relu.apply(2.0), 2.0);
        assert_eq!(Activation::Identity.apply(-7.5), -7.5);
    }

    #[test]
    fn test_forward_pass() {
        let network = FeedForwardWeights::new(vec![
            Layer {
                weights: vec![1.0, -1.0, 0.0, 0.0, 0.0, 1.0],
                biases: vec![0.0, 0.0],
                activation: Activation::Relu,
            },
            identity_layer(vec![2.0, 1.0], vec![-5.0]),
        ])
        .unwrap();
        assert_eq!(network.output_arity(), 1);

        let mut pilot = FeedForwardPilot::new(network);
        let out = pilot
            .evaluate(&SensorInputs::sense(350.0, 300.0, 460.0))
            .unwrap();
        // Hidden: relu(350 - 50) = 300, relu(110) = 110.
        assert_eq!(out, vec![705.0]);
    }

    #[test]
    fn test_wide_output_layer() {
        let network = FeedForwardWeights::new(vec![identity_layer(
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0],
        )])
        .unwrap();
        let mut pilot = FeedForwardPilot::new(network);
        assert_eq!(pilot.output_arity(), 2);
        let out = pilot
            .evaluate(&SensorInputs::sense(350.0, 300.0, 460.0))
            .unwrap();
        assert_eq!(out, vec![350.0, 50.0]);
    }

    #[test]
    fn test_network_shape_errors() {
        assert!(matches!(
            FeedForwardWeights::new(Vec::new()),
            Err(NetworkError::NoLayers)
        ));
        assert!(matches!(
            FeedForwardWeights::new(vec![identity_layer(vec![1.0, 1.0], vec![0.0])]),
            Err(NetworkError::Shape {
                layer: 0,
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            FeedForwardWeights::new(vec![identity_layer(Vec::new(), Vec::new())]),
            Err(NetworkError::EmptyLayer { layer: 0 })
        ));
        assert!(matches!(
            FeedForwardWeights::new(vec![identity_layer(vec![f64::NAN, 0.0, 0.0], vec![0.0])]),
            Err(NetworkError::NonFinite { layer: 0 })
        ));

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            FeedForwardWeights::random(&[2, 1], Activation::Tanh, &mut rng),
            Err(NetworkError::InputMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_overflowing_network_is_decision_error() {
        let network =
            FeedForwardWeights::new(vec![identity_layer(vec![f64::MAX, 0.0, 0.0], vec![0.0])])
                .unwrap();
        let mut pilot = FeedForwardPilot::new(network);
        let err = pilot
            .evaluate(&SensorInputs::sense(350.0, 300.0, 460.0))
            .unwrap_err();
        assert!(err.message.contains("not finite"), "got: {err}");
    }

    #[test]
    fn test_weights_json() {
        let json = r#"[
            { "weights": [0.5, -0.25, 1.0], "biases": [0.1] }
        ]"#;
        let network = FeedForwardWeights::from_json_str(json).unwrap();
        assert_eq!(network.layers()[0].activation, Activation::Sigmoid);

        let back: FeedForwardWeights =
            serde_json::from_str(&serde_json::to_string(&network).unwrap()).unwrap();
        assert_eq!(back, network);

        assert!(matches!(
            FeedForwardWeights::from_json_str("[{}]"),
            Err(NetworkError::Parse(_))
        ));
        assert!(matches!(
            FeedForwardWeights::from_json_str(r#"[{ "weights": [1.0], "biases": [0.0] }]"#),
            Err(NetworkError::Shape { .. })
        ));
    }

    #[test]
    fn test_random_networks_reproducible() {
        let build = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            FeedForwardWeights::random(&[3, 4, 2], Activation::Tanh, &mut rng).unwrap()
        };
        let a = build(5);
        assert_eq!(a, build(5));
        assert_ne!(a, build(6));
        assert_eq!(a.layers().len(), 2);
        assert_eq!(a.layers()[0].activation, Activation::Tanh);
        assert_eq!(a.layers()[1].activation, Activation::Sigmoid);
        assert_eq!(a.output_arity(), 2);
        assert!(a.layers()[0].weights.iter().all(|w| (-1.0..1.0).contains(w)));
    }

    // ---- Roster ----

    #[test]
    fn test_roster_tracks_latest_and_best() {
        let mut roster = WeightRoster::random(3, &[3, 1], Activation::Identity, 1).unwrap();
        assert_eq!(roster.best_index(), None);

        roster.record(&report(0, &[1.0, 9.0, 4.0]));
        assert_eq!(roster.best_index(), Some(1));
        assert_eq!(roster.best_fitness(), Some(9.0));

        roster.record(&report(1, &[12.0, 2.0, 3.0]));
        assert_eq!(roster.best_index(), Some(0));
        let latest = roster.record_for(1).unwrap();
        assert_eq!((latest.generation, latest.fitness), (1, 2.0));

        let replacement = roster.genomes()[2].clone();
        roster.replace(0, replacement);
        assert!(roster.record_for(0).is_none());
        assert_eq!(roster.best_index(), None);
    }

    #[test]
    fn test_roster_ignores_unknown_agents() {
        let mut roster = WeightRoster::random(1, &[3, 1], Activation::Identity, 1).unwrap();
        roster.record(&report(0, &[1.0, 50.0]));
        assert_eq!(roster.best_index(), Some(0));
        assert_eq!(roster.best_fitness(), Some(1.0));
    }

    #[test]
    fn test_roster_drives_a_generation() {
        let config = SimConfig::default();
        let mut roster = WeightRoster::random(6, &[3, 4, 1], Activation::Tanh, 21).unwrap();
        assert_eq!(roster.decision_functions(0).len(), 6);

        let report = run_generation(&mut roster, &config, 0, 3, Some(3_000)).unwrap();
        assert_eq!(report.outcomes.len(), 6);
        for index in 0..roster.len() {
            let record = roster.record_for(index).unwrap();
            assert_eq!(record.generation, 0);
        }
        let best = report.best().unwrap();
        assert_eq!(roster.best_fitness(), Some(best.fitness_delta));
        assert!(roster.best().is_some());
    }

    #[test]
    fn test_empty_roster_is_rejected() {
        let config = SimConfig::default();
        let mut roster = WeightRoster::new(Vec::new());
        assert!(roster.is_empty());
        assert!(run_generation(&mut roster, &config, 0, 1, None).is_err());
    }
}
