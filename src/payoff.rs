//! Payoff matrix over every strategy pair.
//!
//! One full Monte Carlo scenario per cell, with no shared draws between
//! cells. The finished matrix is what equilibrium analysis consumes.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{ElectoralModel, PlayerId};
use crate::scenario::ScenarioSimulator;
use crate::variate::NormalSource;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoffCell {
    pub strategy_a: String,
    pub strategy_b: String,
    pub prob_a: f64,
    pub prob_b: f64,
}

impl PayoffCell {
    pub fn prob(&self, player: PlayerId) -> f64 {
        match player {
            PlayerId::A => self.prob_a,
            PlayerId::B => self.prob_b,
        }
    }
}

impl fmt::Display for PayoffCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A: {:.1}% / B: {:.1}%",
            self.prob_a * 100.0,
            self.prob_b * 100.0
        )
    }
}

/// Win probabilities keyed by (strategy of A, strategy of B).
///
/// Rows follow A's declared strategy order, columns follow B's. Only
/// [`PayoffMatrixBuilder`] constructs one, so every pair has a cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PayoffMatrix {
    strategies_a: Vec<String>,
    strategies_b: Vec<String>,
    cells: Vec<PayoffCell>,
}

impl PayoffMatrix {
    pub fn strategies(&self, player: PlayerId) -> &[String] {
        match player {
            PlayerId::A => &self.strategies_a,
            PlayerId::B => &self.strategies_b,
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[PayoffCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, strategy_a: &str, strategy_b: &str) -> Option<&PayoffCell> {
        let row = self.strategies_a.iter().position(|s| s == strategy_a)?;
        let col = self.strategies_b.iter().position(|s| s == strategy_b)?;
        self.at(row, col)
    }

    pub fn prob_a(&self, strategy_a: &str, strategy_b: &str) -> Option<f64> {
        self.get(strategy_a, strategy_b).map(|c| c.prob_a)
    }

    pub fn prob_b(&self, strategy_a: &str, strategy_b: &str) -> Option<f64> {
        self.get(strategy_a, strategy_b).map(|c| c.prob_b)
    }

    fn at(&self, row: usize, col: usize) -> Option<&PayoffCell> {
        self.cells.get(row * self.strategies_b.len() + col)
    }

    /// Pure-strategy Nash equilibria, taking each player's win probability
    /// as its payoff. Ties count as best responses.
    pub fn pure_equilibria(&self) -> Vec<&PayoffCell> {
        let rows = self.strategies_a.len();
        let cols = self.strategies_b.len();
        let mut equilibria = Vec::new();

        for row in 0..rows {
            for col in 0..cols {
                let Some(cell) = self.at(row, col) else {
                    continue;
                };
                let a_best = (0..rows)
                    .filter_map(|r| self.at(r, col))
                    .all(|other| other.prob_a <= cell.prob_a);
                let b_best = (0..cols)
                    .filter_map(|c| self.at(row, c))
                    .all(|other| other.prob_b <= cell.prob_b);
                if a_best && b_best {
                    equilibria.push(cell);
                }
            }
        }

        equilibria
    }
}

impl fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .strategies_a
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("A \\ B".len());
        let cell_width = self
            .cells
            .iter()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(0);

        write!(f, "| {:label_width$} |", "A \\ B")?;
        for strategy in &self.strategies_b {
            write!(f, " {strategy:cell_width$} |")?;
        }
        writeln!(f)?;

        write!(f, "|{}|", "-".repeat(label_width + 2))?;
        for _ in &self.strategies_b {
            write!(f, "{}|", "-".repeat(cell_width + 2))?;
        }
        writeln!(f)?;

        for (row, strategy) in self.strategies_a.iter().enumerate() {
            write!(f, "| {strategy:label_width$} |")?;
            for col in 0..self.strategies_b.len() {
                let text = self.at(row, col).map(ToString::to_string).unwrap_or_default();
                write!(f, " {text:cell_width$} |")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Drives [`ScenarioSimulator`] over the Cartesian product of both
/// strategy sets.
pub struct PayoffMatrixBuilder<'a> {
    simulator: ScenarioSimulator<'a>,
}

impl<'a> PayoffMatrixBuilder<'a> {
    pub fn new(model: &'a ElectoralModel) -> Self {
        Self {
            simulator: ScenarioSimulator::new(model),
        }
    }

    /// Build every cell, or fail without returning a partial matrix.
    pub fn build<S: NormalSource + ?Sized>(&self, source: &mut S) -> Result<PayoffMatrix> {
        let model = self.simulator.model();
        model.validate()?;

        let strategies_a = model.strategies(PlayerId::A).to_vec();
        let strategies_b = model.strategies(PlayerId::B).to_vec();

        info!(
            rows = strategies_a.len(),
            cols = strategies_b.len(),
            iterations = model.iterations(),
            "building payoff matrix"
        );

        let mut cells = Vec::with_capacity(strategies_a.len() * strategies_b.len());
        for sa in &strategies_a {
            for sb in &strategies_b {
                let result = self.simulator.run(sa, sb, false, source)?;
                debug!(
                    strategy_a = %sa,
                    strategy_b = %sb,
                    prob_a = result.prob_a,
                    prob_b = result.prob_b,
                    "payoff cell"
                );
                cells.push(PayoffCell {
                    strategy_a: result.strategy_a,
                    strategy_b: result.strategy_b,
                    prob_a: result.prob_a,
                    prob_b: result.prob_b,
                });
            }
        }

        info!(cells = cells.len(), "payoff matrix built");

        Ok(PayoffMatrix {
            strategies_a,
            strategies_b,
            cells,
        })
    }
}

pub fn build_payoff_matrix<S: NormalSource + ?Sized>(
    model: &ElectoralModel,
    source: &mut S,
) -> Result<PayoffMatrix> {
    PayoffMatrixBuilder::new(model).build(source)
}
