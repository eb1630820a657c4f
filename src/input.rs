//! Boundary between raw user input and the model.
//!
//! Form fields arrive as text. Anything missing, non-numeric or non-finite
//! falls back to a fixed default:
//!
//! | Field        | Fallback | Notes                              |
//! |--------------|----------|------------------------------------|
//! | base A / B   | 0        | percent, divided by 100 and clamped |
//! | sigma        | 0.015    |                                    |
//! | iterations   | 5000     |                                    |
//! | time steps   | 24       |                                    |
//!
//! Values must parse whole after trimming whitespace: `"45%"` or `"5000.7"`
//! are not read as a numeric prefix and take the fallback instead.

use std::fs;
use std::path::Path;

use clap::Args;
use tracing::info;

use crate::error::ConfigError;
use crate::model::{
    ElectoralModel, PlayerId, DEFAULT_ITERATIONS, DEFAULT_SIGMA, DEFAULT_TIME_STEPS,
};

/// Textual model inputs, as typed into a form or passed on the command line.
#[derive(Args, Clone, Debug, Default, PartialEq)]
pub struct RawInputs {
    /// Baseline support of player A, in percent
    #[arg(long = "base-a", value_name = "PERCENT")]
    pub base_a: Option<String>,

    /// Baseline support of player B, in percent
    #[arg(long = "base-b", value_name = "PERCENT")]
    pub base_b: Option<String>,

    /// Per-step noise scale
    #[arg(long)]
    pub sigma: Option<String>,

    /// Monte Carlo trials per scenario
    #[arg(long)]
    pub iterations: Option<String>,

    /// Steps per trial
    #[arg(long = "time-steps")]
    pub time_steps: Option<String>,
}

impl RawInputs {
    /// Read every field into `model`, applying the fallback for any field
    /// that is absent or unparseable.
    pub fn apply(&self, model: ElectoralModel) -> ElectoralModel {
        model
            .with_base_support(PlayerId::A, read_percent(self.base_a.as_deref()).unwrap_or(0.0))
            .with_base_support(PlayerId::B, read_percent(self.base_b.as_deref()).unwrap_or(0.0))
            .with_sigma(read_real(self.sigma.as_deref()).unwrap_or(DEFAULT_SIGMA))
            .with_iterations(read_count(self.iterations.as_deref()).unwrap_or(DEFAULT_ITERATIONS))
            .with_time_steps(read_count(self.time_steps.as_deref()).unwrap_or(DEFAULT_TIME_STEPS))
    }

    /// Like [`RawInputs::apply`], but fields that were never supplied keep
    /// the model's current value.
    pub fn overlay(&self, mut model: ElectoralModel) -> ElectoralModel {
        if self.base_a.is_some() {
            let base = read_percent(self.base_a.as_deref()).unwrap_or(0.0);
            model = model.with_base_support(PlayerId::A, base);
        }
        if self.base_b.is_some() {
            let base = read_percent(self.base_b.as_deref()).unwrap_or(0.0);
            model = model.with_base_support(PlayerId::B, base);
        }
        if self.sigma.is_some() {
            model = model.with_sigma(read_real(self.sigma.as_deref()).unwrap_or(DEFAULT_SIGMA));
        }
        if self.iterations.is_some() {
            let iterations = read_count(self.iterations.as_deref()).unwrap_or(DEFAULT_ITERATIONS);
            model = model.with_iterations(iterations);
        }
        if self.time_steps.is_some() {
            let steps = read_count(self.time_steps.as_deref()).unwrap_or(DEFAULT_TIME_STEPS);
            model = model.with_time_steps(steps);
        }
        model
    }
}

fn read_real(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn read_percent(raw: Option<&str>) -> Option<f64> {
    read_real(raw).map(|v| v / 100.0)
}

fn read_count(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse().ok()
}

/// Load a JSON model file. Baselines are clamped and the whole model is
/// validated before it is returned.
pub fn load_model(path: impl AsRef<Path>) -> Result<ElectoralModel, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model: ElectoralModel =
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let model = model.clamped();
    model.validate().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), title = %model.metadata.title, "loaded model");
    Ok(model)
}
