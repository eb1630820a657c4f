use electoral_sim::{
    build_payoff_matrix, run_scenario, ElectoralModel, NormalSource, PlayerId, RawInputs, Sampler,
    SimulationError,
};

/// A model where only A moves: +0.01 per step, B flat.
fn drifting_model() -> ElectoralModel {
    ElectoralModel::default()
        .with_strategy(PlayerId::A, "BD", 0.01, 0.0)
        .with_strategy(PlayerId::B, "BD", 0.0, 0.0)
        .with_sigma(0.0)
        .with_time_steps(10)
}

#[test]
fn drift_only_walk_reaches_expected_support() {
    for iterations in [1, 10, 1000] {
        let model = drifting_model().with_iterations(iterations);
        let result = run_scenario(&model, "BD", "BD", true, &mut Sampler::seeded(0)).unwrap();

        assert_eq!(result.prob_a, 1.0);
        assert_eq!(result.prob_b, 0.0);
        assert!((result.path_a.last().unwrap() - 0.55).abs() < 1e-12);
        assert!((result.path_b.last().unwrap() - 0.43).abs() < 1e-12);
    }
}

#[test]
fn drift_only_walk_saturates_at_one() {
    let model = drifting_model()
        .with_strategy(PlayerId::A, "BD", 0.2, 0.0)
        .with_iterations(3);
    let result = run_scenario(&model, "BD", "BD", true, &mut Sampler::seeded(0)).unwrap();

    assert_eq!(result.path_a.last(), Some(1.0));
    assert!(result.path_a.values().iter().all(|v| *v <= 1.0));
}

#[test]
fn probabilities_sum_to_one() {
    let model = ElectoralModel::default().with_iterations(777);
    let mut source = Sampler::seeded(21);

    for sa in ["BD", "MC"] {
        for sb in ["BD", "MC"] {
            let result = run_scenario(&model, sa, sb, false, &mut source).unwrap();
            assert_eq!(result.wins_a + result.wins_b, 777);
            assert_eq!(result.prob_a + result.prob_b, 1.0);
        }
    }
}

#[test]
fn reference_model_favours_moderate_campaigns() {
    // Effective drifts: A BD -0.013, A MC +0.0165, B BD -0.0085, B MC +0.0238.
    let model = ElectoralModel::default().with_iterations(2000);
    let matrix = build_payoff_matrix(&model, &mut Sampler::seeded(1)).unwrap();

    assert_eq!(matrix.len(), 4);
    assert!(matrix.prob_a("MC", "BD").unwrap() > 0.9);
    assert!(matrix.prob_b("BD", "MC").unwrap() > 0.9);
    for cell in matrix.cells() {
        assert_eq!(cell.prob_a + cell.prob_b, 1.0);
    }
}

#[test]
fn matrix_covers_every_pair_in_declared_order() {
    let model = ElectoralModel::default()
        .with_strategy(PlayerId::B, "RALLY", 0.001, 0.001)
        .with_strategy(PlayerId::B, "DEBATE", -0.002, 0.004)
        .with_iterations(20);
    let matrix = build_payoff_matrix(&model, &mut Sampler::seeded(3)).unwrap();

    let pairs: Vec<(&str, &str)> = matrix
        .cells()
        .iter()
        .map(|c| (c.strategy_a.as_str(), c.strategy_b.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("BD", "BD"),
            ("BD", "MC"),
            ("BD", "RALLY"),
            ("BD", "DEBATE"),
            ("MC", "BD"),
            ("MC", "MC"),
            ("MC", "RALLY"),
            ("MC", "DEBATE"),
        ]
    );
}

#[test]
fn counting_source_sees_every_draw() {
    struct Counting(usize);

    impl NormalSource for Counting {
        fn sample(&mut self) -> f64 {
            self.0 += 1;
            0.0
        }
    }

    let model = ElectoralModel::default().with_iterations(4).with_time_steps(6);
    let mut source = Counting(0);
    build_payoff_matrix(&model, &mut source).unwrap();

    // 4 cells x 4 trials x 6 steps x 2 players
    assert_eq!(source.0, 4 * 4 * 6 * 2);
}

#[test]
fn invalid_inputs_fail_before_sampling() {
    struct Forbidden;

    impl NormalSource for Forbidden {
        fn sample(&mut self) -> f64 {
            panic!("no draw expected");
        }
    }

    let model = ElectoralModel::default().with_time_steps(0);
    assert!(matches!(
        build_payoff_matrix(&model, &mut Forbidden),
        Err(SimulationError::InvalidParameters { .. })
    ));
    assert!(matches!(
        run_scenario(&ElectoralModel::default(), "XX", "BD", false, &mut Forbidden),
        Err(SimulationError::InvalidStrategy { player: PlayerId::A, .. })
    ));
}

#[test]
fn form_inputs_feed_the_simulation() {
    let raw = RawInputs {
        base_a: Some("60".to_string()),
        base_b: Some("40".to_string()),
        sigma: Some("0".to_string()),
        iterations: Some("25".to_string()),
        time_steps: Some("garbage".to_string()),
    };
    let model = raw.apply(ElectoralModel::default());
    assert_eq!(model.time_steps(), 24);

    // Both play BD: A drifts down 0.013/step, B 0.0085/step; 24 steps from 0.60 vs 0.40.
    let result = run_scenario(&model, "BD", "BD", true, &mut Sampler::seeded(0)).unwrap();
    assert_eq!(result.prob_a, 1.0);
    assert_eq!(result.path_a.len(), 24);
}
