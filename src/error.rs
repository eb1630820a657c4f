//! Error types for the electoral simulation.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::PlayerId;

/// Errors raised by scenario runs and payoff matrix builds.
///
/// None of these are retried: re-running a Monte Carlo estimate on the same
/// invalid input cannot succeed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("strategy '{strategy}' is not declared for player {player}")]
    InvalidStrategy { player: PlayerId, strategy: String },

    #[error("invalid simulation parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("invalid model configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl SimulationError {
    pub(crate) fn parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading a model file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model file {path} is not usable: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: SimulationError,
    },
}

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;
