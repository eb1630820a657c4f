//! Electoral Strategy Simulation Library
//!
//! Monte Carlo estimates of who wins a two-candidate race, for every pair of
//! campaign strategies. Support for each candidate follows a clamped random
//! walk with strategy-dependent drift and Gaussian noise; the resulting win
//! probabilities form a payoff matrix for equilibrium analysis.
//!
//! ## Modules
//!
//! - `variate`: standard normal sampling (Box-Muller, seeded samplers)
//! - `model`: players, strategies, coefficients and run parameters
//! - `scenario`: Monte Carlo estimate for a single strategy pair
//! - `payoff`: payoff matrix over all strategy pairs
//! - `input`: raw input fallbacks and JSON model files
//!
//! ## Usage
//!
//! ```bash
//! # Single scenario with its sample trajectory
//! cargo run --bin scenario --release -- --strategy-a MC --strategy-b BD
//!
//! # Full payoff matrix
//! cargo run --bin payoff_matrix --release -- --iterations 20000 --seed 7
//! ```

pub mod error;
pub mod input;
pub mod model;
pub mod payoff;
pub mod scenario;
pub mod variate;

pub use error::{ConfigError, SimulationError};
pub use input::{load_model, RawInputs};
pub use model::{ElectoralModel, PlayerId};
pub use payoff::{build_payoff_matrix, PayoffCell, PayoffMatrix, PayoffMatrixBuilder};
pub use scenario::{run_scenario, ScenarioResult, ScenarioSimulator, Trajectory};
pub use variate::{BoxMullerNormal, NormalSource, Sampler, SamplerKind};
