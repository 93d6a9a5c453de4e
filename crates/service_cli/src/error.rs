//! CLI error types

use pricer_core::types::DateError;
use pricer_models::analytical::AnalyticalError;
use pricer_models::instruments::InstrumentError;
use pricer_pricing::backtest::BacktestError;
use pricer_risk::RiskError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `optlab` commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Analytical(#[from] AnalyticalError),

    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error(transparent)]
    Risk(#[from] RiskError),

    #[error(transparent)]
    Backtest(#[from] BacktestError),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
