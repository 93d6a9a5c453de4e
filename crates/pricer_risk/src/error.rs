//! Error types for chain, volatility and margin analytics.

use pricer_models::analytical::AnalyticalError;
use thiserror::Error;

/// Errors raised by the analytics in this crate.
///
/// Degenerate-but-valid market states (zero call OI, flat IV history,
/// empty moneyness buckets) are not errors; they resolve to documented
/// neutral values instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RiskError {
    /// Chain with no strike rows.
    #[error("Option chain has no strikes")]
    EmptyChain,

    /// Strategy with no legs.
    #[error("Strategy has no legs")]
    EmptyStrategy,

    /// Non-positive or non-finite spot.
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot value
        spot: f64,
    },

    /// Out-of-domain threshold or configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Out-of-domain observation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failure reported by an IV history store.
    #[error("IV history store error: {0}")]
    Store(String),

    /// Pricing failure.
    #[error(transparent)]
    Pricing(#[from] AnalyticalError),
}

pub(crate) fn check_spot(spot: f64) -> Result<(), RiskError> {
    if spot > 0.0 && spot.is_finite() {
        Ok(())
    } else {
        Err(RiskError::InvalidSpot { spot })
    }
}
