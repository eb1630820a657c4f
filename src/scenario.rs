//! Monte Carlo estimate for one strategy pair.
//!
//! Each trial walks both players' support for `time_steps` steps:
//!
//! ```text
//! V(t+1) = clamp(V(t) + effective_drift + sigma * Z, 0, 1)
//! ```
//!
//! and the trial goes to A only when A ends strictly ahead. Equal finishes
//! go to B, so the two win probabilities always sum to one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::model::{ElectoralModel, PlayerId};
use crate::variate::NormalSource;

/// Support of one player over the steps of a single trial, post-clamp.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<f64>);

impl Trajectory {
    fn with_capacity(steps: usize) -> Self {
        Self(Vec::with_capacity(steps))
    }

    fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Chart labels `t1..tN`.
    pub fn labels(&self) -> Vec<String> {
        (1..=self.0.len()).map(|t| format!("t{t}")).collect()
    }

    pub fn percentages(&self) -> Vec<f64> {
        self.0.iter().map(|v| v * 100.0).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub strategy_a: String,
    pub strategy_b: String,
    pub iterations: usize,
    pub wins_a: usize,
    pub wins_b: usize,
    pub prob_a: f64,
    pub prob_b: f64,
    /// Trial 0 only; empty unless path recording was requested.
    pub path_a: Trajectory,
    pub path_b: Trajectory,
}

impl ScenarioResult {
    pub fn prob(&self, player: PlayerId) -> f64 {
        match player {
            PlayerId::A => self.prob_a,
            PlayerId::B => self.prob_b,
        }
    }
}

/// Runs scenarios against one model. The model is borrowed for the whole
/// call and must not change while a run is in flight.
pub struct ScenarioSimulator<'a> {
    model: &'a ElectoralModel,
}

impl<'a> ScenarioSimulator<'a> {
    pub fn new(model: &'a ElectoralModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ElectoralModel {
        self.model
    }

    pub fn run<S: NormalSource + ?Sized>(
        &self,
        strategy_a: &str,
        strategy_b: &str,
        record_path: bool,
        source: &mut S,
    ) -> Result<ScenarioResult> {
        let model = self.model;
        let drift_a = model.effective_drift(PlayerId::A, strategy_a)?;
        let drift_b = model.effective_drift(PlayerId::B, strategy_b)?;
        model.validate_parameters()?;

        let sigma = model.sigma();
        let iterations = model.iterations();
        let time_steps = model.time_steps();

        debug!(
            strategy_a,
            strategy_b, drift_a, drift_b, sigma, iterations, time_steps, "running scenario"
        );

        let mut wins_a = 0usize;
        let mut wins_b = 0usize;
        let mut path_a = Trajectory::default();
        let mut path_b = Trajectory::default();

        for trial in 0..iterations {
            let recording = record_path && trial == 0;
            if recording {
                path_a = Trajectory::with_capacity(time_steps);
                path_b = Trajectory::with_capacity(time_steps);
            }

            let mut va = model.base_support(PlayerId::A);
            let mut vb = model.base_support(PlayerId::B);

            for _ in 0..time_steps {
                let noise_a = sigma * source.sample();
                let noise_b = sigma * source.sample();

                va = (va + drift_a + noise_a).clamp(0.0, 1.0);
                vb = (vb + drift_b + noise_b).clamp(0.0, 1.0);

                if recording {
                    path_a.push(va);
                    path_b.push(vb);
                }
            }

            if va > vb {
                wins_a += 1;
            } else {
                wins_b += 1;
            }
        }

        let prob_a = wins_a as f64 / iterations as f64;
        let prob_b = wins_b as f64 / iterations as f64;

        debug!(strategy_a, strategy_b, wins_a, wins_b, prob_a, prob_b, "scenario done");

        Ok(ScenarioResult {
            strategy_a: strategy_a.to_string(),
            strategy_b: strategy_b.to_string(),
            iterations,
            wins_a,
            wins_b,
            prob_a,
            prob_b,
            path_a,
            path_b,
        })
    }
}

/// Estimate the win probabilities of `strategy_a` against `strategy_b`.
pub fn run_scenario<S: NormalSource + ?Sized>(
    model: &ElectoralModel,
    strategy_a: &str,
    strategy_b: &str,
    record_path: bool,
    source: &mut S,
) -> Result<ScenarioResult> {
    ScenarioSimulator::new(model).run(strategy_a, strategy_b, record_path, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::variate::Sampler;

    /// Replays a fixed noise sequence, cycling when exhausted.
    struct Scripted {
        values: Vec<f64>,
        next: usize,
    }

    impl Scripted {
        fn new(values: Vec<f64>) -> Self {
            Self { values, next: 0 }
        }
    }

    impl NormalSource for Scripted {
        fn sample(&mut self) -> f64 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    fn two_strategy_model(drift_a: f64, drift_b: f64) -> ElectoralModel {
        ElectoralModel::default()
            .with_strategy(PlayerId::A, "BD", drift_a, 0.0)
            .with_strategy(PlayerId::B, "BD", drift_b, 0.0)
    }

    #[test]
    fn test_deterministic_walk_without_noise() {
        let model = two_strategy_model(0.01, 0.0)
            .with_sigma(0.0)
            .with_time_steps(10)
            .with_iterations(50);
        let mut source = Sampler::seeded(1);

        let result = run_scenario(&model, "BD", "BD", true, &mut source).unwrap();

        assert_eq!(result.prob_a, 1.0);
        assert_eq!(result.prob_b, 0.0);
        assert_eq!(result.path_a.len(), 10);
        assert!((result.path_a.last().unwrap() - 0.55).abs() < 1e-12);
        assert!(result.path_b.values().iter().all(|&v| v == 0.43));
    }

    #[test]
    fn test_tie_goes_to_b() {
        let model = two_strategy_model(0.002, 0.002)
            .with_base_support(PlayerId::A, 0.5)
            .with_base_support(PlayerId::B, 0.5)
            .with_sigma(0.0);

        for iterations in [1, 2, 17, 300] {
            let model = model.clone().with_iterations(iterations);
            let result = run_scenario(&model, "BD", "BD", false, &mut Sampler::seeded(5)).unwrap();
            assert_eq!(result.prob_a, 0.0);
            assert_eq!(result.prob_b, 1.0);
            assert_eq!(result.wins_b, iterations);
        }
    }

    #[test]
    fn test_clamp_holds_under_extreme_drift() {
        let model = two_strategy_model(0.4, -0.4)
            .with_sigma(2.0)
            .with_time_steps(40)
            .with_iterations(1);

        let result = run_scenario(&model, "BD", "BD", true, &mut Sampler::seeded(11)).unwrap();

        for v in result.path_a.values().iter().chain(result.path_b.values()) {
            assert!((0.0..=1.0).contains(v), "{v} escaped [0,1]");
        }
    }

    #[test]
    fn test_huge_coefficients_rejected_or_bounded() {
        let overflowing = two_strategy_model(1e308, 0.0)
            .with_strategy(PlayerId::A, "BD", 1e308, 1e308)
            .with_sigma(1e308);
        let err = run_scenario(&overflowing, "BD", "BD", true, &mut Sampler::seeded(2)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfiguration { .. }));

        // Finite but extreme drift and noise still stay inside [0,1].
        let extreme = two_strategy_model(1e308, -1e308)
            .with_sigma(1e308)
            .with_time_steps(30)
            .with_iterations(1);
        let result = run_scenario(&extreme, "BD", "BD", true, &mut Sampler::seeded(2)).unwrap();
        for v in result.path_a.values().iter().chain(result.path_b.values()) {
            assert!((0.0..=1.0).contains(v), "{v} escaped [0,1]");
        }
    }

    #[test]
    fn test_noise_draw_order() {
        // A draws first, B second, on every step.
        let model = two_strategy_model(0.0, 0.0)
            .with_base_support(PlayerId::A, 0.5)
            .with_base_support(PlayerId::B, 0.5)
            .with_sigma(0.1)
            .with_time_steps(2)
            .with_iterations(1);
        let mut source = Scripted::new(vec![1.0, -1.0, 0.5, 0.0]);

        let result = run_scenario(&model, "BD", "BD", true, &mut source).unwrap();

        assert!((result.path_a.values()[1] - 0.65).abs() < 1e-12);
        assert!((result.path_b.values()[1] - 0.40).abs() < 1e-12);
        assert_eq!(result.prob_a, 1.0);
    }

    #[test]
    fn test_only_first_trial_is_recorded() {
        let model = ElectoralModel::default().with_iterations(3).with_time_steps(5);
        let mut source = Scripted::new(vec![0.0; 6 * 5]);

        let recorded = run_scenario(&model, "MC", "BD", true, &mut source).unwrap();
        assert_eq!(recorded.path_a.len(), 5);
        assert_eq!(recorded.path_b.len(), 5);
        assert_eq!(recorded.path_a.labels().last().map(String::as_str), Some("t5"));

        let silent = run_scenario(&model, "MC", "BD", false, &mut source).unwrap();
        assert!(silent.path_a.is_empty());
        assert!(silent.path_b.is_empty());
    }

    #[test]
    fn test_single_iteration_is_all_or_nothing() {
        let model = ElectoralModel::default().with_iterations(1);

        let first = run_scenario(&model, "BD", "MC", false, &mut Sampler::seeded(99)).unwrap();
        let second = run_scenario(&model, "BD", "MC", false, &mut Sampler::seeded(99)).unwrap();

        assert!(first.prob_a == 0.0 || first.prob_a == 1.0);
        assert_eq!(first.prob_a + first.prob_b, 1.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let model = ElectoralModel::default().with_iterations(0);
        let err = run_scenario(&model, "BD", "BD", false, &mut Sampler::seeded(1)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameters { .. }));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let model = ElectoralModel::default();
        let err = run_scenario(&model, "BD", "ZZ", false, &mut Sampler::seeded(1)).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidStrategy {
                player: PlayerId::B,
                strategy: "ZZ".to_string(),
            }
        );
    }
}
