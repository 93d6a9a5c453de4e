//! Backtest error types.

use pricer_models::analytical::AnalyticalError;
use thiserror::Error;

/// Errors raised before a backtest starts simulating.
///
/// Degenerate inputs are rejected up front; once a run starts it always
/// produces a complete result.
///
/// # Examples
/// ```
/// use pricer_pricing::backtest::BacktestError;
///
/// let err = BacktestError::InvalidCapital { capital: 0.0 };
/// assert_eq!(format!("{}", err), "Initial capital must be positive: 0");
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BacktestError {
    /// The strategy has no legs.
    #[error("Cannot backtest a strategy with no legs")]
    NoLegs,

    /// Initial capital is non-positive or not finite.
    #[error("Initial capital must be positive: {capital}")]
    InvalidCapital {
        /// The rejected capital
        capital: f64,
    },

    /// Simulation length is zero.
    #[error("Backtest must simulate at least one day, got {days}")]
    InvalidDays {
        /// The rejected day count
        days: usize,
    },

    /// Configuration value outside its domain.
    #[error("Invalid backtest configuration: {0}")]
    InvalidConfig(String),

    /// Model parameters rejected by the pricer.
    #[error(transparent)]
    Pricing(#[from] AnalyticalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", BacktestError::NoLegs),
            "Cannot backtest a strategy with no legs"
        );
        assert_eq!(
            format!("{}", BacktestError::InvalidDays { days: 0 }),
            "Backtest must simulate at least one day, got 0"
        );
    }

    #[test]
    fn test_from_analytical_error() {
        let err: BacktestError = AnalyticalError::InvalidSpot { spot: -1.0 }.into();
        assert!(format!("{}", err).contains("spot"));
    }
}
