//! Core option and time types.
//!
//! This module provides:
//! - `option_type`: Call/put side of a vanilla option
//! - `moneyness`: ITM/ATM/OTM classification, the single rule used engine-wide
//! - `time`: Year fractions to expiry with a numerical-stability floor
//! - `error`: Structured error types for pricing and date operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`OptionType`] from `option_type`
//! - [`Moneyness`], [`ATM_BAND`] from `moneyness`
//! - [`time_to_expiry`], [`parse_date`] and the day-count constants from `time`
//! - [`PricingError`], [`DateError`] from `error`

pub mod error;
pub mod moneyness;
pub mod option_type;
pub mod time;

pub use error::{DateError, PricingError};
pub use moneyness::{Moneyness, ATM_BAND};
pub use option_type::OptionType;
pub use time::{
    days_between, parse_date, time_to_expiry, time_to_expiry_from_today, CALENDAR_DAYS_PER_YEAR,
    MIN_TIME_TO_EXPIRY, TRADING_DAYS_PER_YEAR,
};
