//! Error types for analytical pricing operations.
//!
//! This module provides:
//! - `AnalyticalError`: Errors specific to analytical pricing models

use pricer_core::types::PricingError;
use thiserror::Error;

/// Analytical pricing errors.
///
/// Raised by the checked entry points when an input violates the model's
/// domain. Numerical guards (expiry, zero vega) never produce these.
///
/// # Variants
/// - `InvalidVolatility`: Non-positive or non-finite volatility
/// - `InvalidSpot`: Non-positive spot price
/// - `InvalidStrike`: Non-positive strike
/// - `InvalidExpiry`: Negative time to expiry
/// - `InvalidPrice`: Negative or non-finite observed option price
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid volatility (non-positive).
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Invalid spot price (non-positive).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Invalid strike (non-positive).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Negative time to expiry.
    #[error("Invalid time to expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid year fraction
        expiry: f64,
    },

    /// Observed option price is negative or not finite.
    #[error("Invalid option price: {price}")]
    InvalidPrice {
        /// The invalid observed price
        price: f64,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_volatility_display() {
        let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
        assert_eq!(format!("{}", err), "Invalid volatility: σ = -0.2");
    }

    #[test]
    fn test_invalid_spot_display() {
        let err = AnalyticalError::InvalidSpot { spot: -100.0 };
        assert_eq!(format!("{}", err), "Invalid spot price: S = -100");
    }

    #[test]
    fn test_invalid_price_display() {
        let err = AnalyticalError::InvalidPrice { price: -1.5 };
        assert_eq!(format!("{}", err), "Invalid option price: -1.5");
    }

    #[test]
    fn test_to_pricing_error() {
        let err = AnalyticalError::InvalidStrike { strike: 0.0 };
        match PricingError::from(err) {
            PricingError::InvalidInput(msg) => assert!(msg.contains("strike")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
