//! Instrument error types.
//!
//! Raised when a quote, chain or strategy leg fails boundary validation.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Instrument validation errors.
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidStrike { strike: -100.0 };
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Invalid strike price (non-positive).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid premium (negative or not finite).
    #[error("Invalid premium: {premium}")]
    InvalidPremium {
        /// The invalid premium value
        premium: f64,
    },

    /// Leg quantity must be at least one lot.
    #[error("Invalid quantity: {quantity} lots")]
    InvalidQuantity {
        /// The invalid quantity
        quantity: u32,
    },

    /// Invalid underlying spot (non-positive).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot value
        spot: f64,
    },

    /// Two rows or two same-side quotes share a strike.
    #[error("Duplicate strike in chain: {strike}")]
    DuplicateStrike {
        /// The repeated strike
        strike: f64,
    },

    /// Trade action string not recognised.
    #[error("Unknown trade action: {0}")]
    UnknownAction(String),

    /// A quote field is outside its domain.
    #[error("Invalid quote at strike {strike}: {message}")]
    InvalidQuote {
        /// Strike of the offending quote
        strike: f64,
        /// Description of the violation
        message: String,
    },
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_quantity_display() {
        let err = InstrumentError::InvalidQuantity { quantity: 0 };
        assert_eq!(format!("{}", err), "Invalid quantity: 0 lots");
    }

    #[test]
    fn test_invalid_quote_display() {
        let err = InstrumentError::InvalidQuote {
            strike: 22_000.0,
            message: "negative bid".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Invalid quote at strike 22000: negative bid"
        );
    }

    #[test]
    fn test_to_pricing_error() {
        let err = InstrumentError::DuplicateStrike { strike: 100.0 };
        assert!(matches!(PricingError::from(err), PricingError::InvalidInput(_)));
    }
}
