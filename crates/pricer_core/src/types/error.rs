//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from pricing operations
//! - `DateError`: Errors from date construction and parsing

use thiserror::Error;

/// Categorised pricing errors.
///
/// Provides structured error handling for pricing operations with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `InvalidInput`: Invalid market data or parameters
/// - `NumericalInstability`: Computation failed to produce a finite value
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("Negative spot price".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: Negative spot price");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Numerical instability during computation
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Date-related errors.
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::ParseError("2024-13-01".to_string());
/// assert_eq!(format!("{}", err), "Date parse error: 2024-13-01");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    /// Failed to parse a date string.
    #[error("Date parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::NumericalInstability("vega underflow".to_string());
        assert_eq!(format!("{}", err), "Numerical instability: vega underflow");
    }

    #[test]
    fn test_date_error_display() {
        let err = DateError::ParseError("bad".to_string());
        assert!(format!("{}", err).starts_with("Date parse error"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = PricingError::InvalidInput("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
