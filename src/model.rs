//! Electoral model: two players, their strategies and the walk parameters.
//!
//! A model is a plain value. Callers derive an updated copy with the
//! `with_*` methods instead of mutating a shared instance, so a model handed
//! to a simulation never changes under it.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

pub const DEFAULT_SIGMA: f64 = 0.015;
pub const DEFAULT_ITERATIONS: usize = 5000;
pub const DEFAULT_TIME_STEPS: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    A,
    B,
}

impl PlayerId {
    pub fn all() -> [Self; 2] {
        [Self::A, Self::B]
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// One value per player, serialized as `{"A": .., "B": ..}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
}

impl<T> PerPlayer<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }
}

impl<T> Index<PlayerId> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        match player {
            PlayerId::A => &self.a,
            PlayerId::B => &self.b,
        }
    }
}

impl<T> IndexMut<PlayerId> for PerPlayer<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        match player {
            PlayerId::A => &mut self.a,
            PlayerId::B => &mut self.b,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Starting support of every trial, in [0,1].
    pub base_support: f64,
}

/// Per-strategy coefficient table, keyed by strategy label.
pub type CoefficientTable = BTreeMap<String, f64>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub sigma: f64,
    pub iterations: usize,
    pub time_steps: usize,
    pub drift: PerPlayer<CoefficientTable>,
    pub center_sensitivity: PerPlayer<CoefficientTable>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralModel {
    pub metadata: Metadata,
    players: PerPlayer<Player>,
    strategies: PerPlayer<Vec<String>>,
    parameters: Parameters,
}

impl Default for ElectoralModel {
    /// Chile 2025 runoff calibration.
    fn default() -> Self {
        let table = |pairs: [(&str, f64); 2]| -> CoefficientTable {
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };
        let labels = || vec!["BD".to_string(), "MC".to_string()];

        Self {
            metadata: Metadata {
                title: "Electoral game theory model - Chile 14-12-25".to_string(),
                version: "1.0".to_string(),
            },
            players: PerPlayer::new(
                Player {
                    id: PlayerId::A,
                    name: "Kast".to_string(),
                    base_support: 0.45,
                },
                Player {
                    id: PlayerId::B,
                    name: "Jara".to_string(),
                    base_support: 0.43,
                },
            ),
            strategies: PerPlayer::new(labels(), labels()),
            parameters: Parameters {
                sigma: DEFAULT_SIGMA,
                iterations: DEFAULT_ITERATIONS,
                time_steps: DEFAULT_TIME_STEPS,
                drift: PerPlayer::new(
                    table([("BD", 0.004), ("MC", 0.0025)]),
                    table([("BD", 0.0035), ("MC", 0.0038)]),
                ),
                center_sensitivity: PerPlayer::new(
                    table([("BD", -0.017), ("MC", 0.014)]),
                    table([("BD", -0.012), ("MC", 0.02)]),
                ),
            },
        }
    }
}

impl ElectoralModel {
    /// Build a model from explicit parts. Baselines are clamped to [0,1].
    pub fn new(
        metadata: Metadata,
        players: PerPlayer<Player>,
        strategies: PerPlayer<Vec<String>>,
        parameters: Parameters,
    ) -> Self {
        Self {
            metadata,
            players,
            strategies,
            parameters,
        }
        .clamped()
    }

    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    pub fn base_support(&self, player: PlayerId) -> f64 {
        self.players[player].base_support
    }

    pub fn strategies(&self, player: PlayerId) -> &[String] {
        &self.strategies[player]
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn sigma(&self) -> f64 {
        self.parameters.sigma
    }

    pub fn iterations(&self) -> usize {
        self.parameters.iterations
    }

    pub fn time_steps(&self) -> usize {
        self.parameters.time_steps
    }

    pub fn with_base_support(mut self, player: PlayerId, support: f64) -> Self {
        self.players[player].base_support = clamp_unit(support);
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.parameters.sigma = sigma;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.parameters.iterations = iterations;
        self
    }

    pub fn with_time_steps(mut self, time_steps: usize) -> Self {
        self.parameters.time_steps = time_steps;
        self
    }

    /// Declare a strategy for `player`, or replace its coefficients if the
    /// label already exists.
    pub fn with_strategy(
        mut self,
        player: PlayerId,
        label: impl Into<String>,
        drift: f64,
        center_sensitivity: f64,
    ) -> Self {
        let label = label.into();
        if !self.strategies[player].contains(&label) {
            self.strategies[player].push(label.clone());
        }
        self.parameters.drift[player].insert(label.clone(), drift);
        self.parameters.center_sensitivity[player].insert(label, center_sensitivity);
        self
    }

    /// Keep only `labels` (in the given order) for `player`.
    pub fn with_strategy_set(mut self, player: PlayerId, labels: Vec<String>) -> Self {
        self.strategies[player] = labels;
        self
    }

    pub(crate) fn clamped(mut self) -> Self {
        for player in PlayerId::all() {
            let support = self.players[player].base_support;
            self.players[player].base_support = clamp_unit(support);
        }
        self
    }

    /// `drift + center_sensitivity` for one strategy; constant over a scenario.
    pub fn effective_drift(&self, player: PlayerId, strategy: &str) -> Result<f64> {
        if !self.strategies[player].iter().any(|s| s == strategy) {
            return Err(SimulationError::InvalidStrategy {
                player,
                strategy: strategy.to_string(),
            });
        }
        let drift = self.coefficient(&self.parameters.drift, player, strategy, "drift")?;
        let center = self.coefficient(
            &self.parameters.center_sensitivity,
            player,
            strategy,
            "center sensitivity",
        )?;
        let effective = drift + center;
        if !effective.is_finite() {
            return Err(SimulationError::configuration(format!(
                "effective drift for player {player} strategy '{strategy}' overflows ({drift} + {center})"
            )));
        }
        Ok(effective)
    }

    fn coefficient(
        &self,
        table: &PerPlayer<CoefficientTable>,
        player: PlayerId,
        strategy: &str,
        what: &str,
    ) -> Result<f64> {
        match table[player].get(strategy) {
            Some(value) if value.is_finite() => Ok(*value),
            Some(value) => Err(SimulationError::configuration(format!(
                "{what} for player {player} strategy '{strategy}' is not finite ({value})"
            ))),
            None => Err(SimulationError::configuration(format!(
                "{what} missing for player {player} strategy '{strategy}'"
            ))),
        }
    }

    /// Check the run parameters only.
    pub fn validate_parameters(&self) -> Result<()> {
        let p = &self.parameters;
        if p.iterations < 1 {
            return Err(SimulationError::parameters("iterations must be at least 1"));
        }
        if p.time_steps < 1 {
            return Err(SimulationError::parameters("time steps must be at least 1"));
        }
        if !p.sigma.is_finite() || p.sigma < 0.0 {
            return Err(SimulationError::parameters(format!(
                "sigma must be a finite non-negative number, got {}",
                p.sigma
            )));
        }
        for player in PlayerId::all() {
            if !self.players[player].base_support.is_finite() {
                return Err(SimulationError::parameters(format!(
                    "base support of player {player} is not finite"
                )));
            }
        }
        Ok(())
    }

    /// Check strategy sets and coefficient tables plus the run parameters.
    pub fn validate(&self) -> Result<()> {
        for player in PlayerId::all() {
            if self.players[player].id != player {
                return Err(SimulationError::configuration(format!(
                    "player slot {player} holds player {}",
                    self.players[player].id
                )));
            }
            let labels = &self.strategies[player];
            if labels.is_empty() {
                return Err(SimulationError::configuration(format!(
                    "player {player} declares no strategies"
                )));
            }
            let mut seen = HashSet::new();
            for label in labels {
                if !seen.insert(label.as_str()) {
                    return Err(SimulationError::configuration(format!(
                        "player {player} declares strategy '{label}' twice"
                    )));
                }
                self.effective_drift(player, label)?;
            }
        }
        self.validate_parameters()
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}
