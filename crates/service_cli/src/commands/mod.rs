//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Inputs shared by the
//! single-option commands live here.

pub mod backtest;
pub mod chain;
pub mod input;
pub mod iv;
pub mod margin;
pub mod output;
pub mod payoff;
pub mod price;

use chrono::{Local, NaiveDate};
use clap::Args;
use pricer_core::types::{parse_date, time_to_expiry, OptionType, CALENDAR_DAYS_PER_YEAR};

use crate::{CliError, Result};

/// Contract terms for a single European option
#[derive(Debug, Clone, Args)]
pub struct ContractArgs {
    /// Underlying price
    #[arg(long)]
    pub spot: f64,

    /// Strike price
    #[arg(long)]
    pub strike: f64,

    /// Option type (call/ce, put/pe)
    #[arg(short = 't', long = "type", default_value = "call")]
    pub option_type: OptionType,

    /// Calendar days to expiry
    #[arg(long, conflicts_with = "expiry")]
    pub days: Option<f64>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub expiry: Option<String>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<String>,

    /// Risk-free rate, defaults to `market.risk_free_rate`
    #[arg(long)]
    pub rate: Option<f64>,
}

impl ContractArgs {
    /// Year fraction to expiry, from `--days` or `--expiry`.
    pub fn time_to_expiry(&self) -> Result<f64> {
        match (self.days, &self.expiry) {
            (Some(days), _) if days >= 0.0 && days.is_finite() => Ok(days / CALENDAR_DAYS_PER_YEAR),
            (Some(days), _) => Err(CliError::InvalidArgument(format!(
                "--days must be non-negative, got {}",
                days
            ))),
            (None, Some(expiry)) => {
                let expiry = parse_date(expiry)?;
                Ok(time_to_expiry(valuation_date(self.as_of.as_deref())?, expiry))
            }
            (None, None) => Err(CliError::InvalidArgument(
                "either --days or --expiry is required".to_string(),
            )),
        }
    }

    /// Rejects a non-positive strike before it reaches the pricer.
    pub fn checked_strike(&self) -> Result<f64> {
        if self.strike > 0.0 && self.strike.is_finite() {
            Ok(self.strike)
        } else {
            Err(CliError::InvalidArgument(format!(
                "--strike must be positive, got {}",
                self.strike
            )))
        }
    }
}

/// Parses `--as-of`, falling back to the local calendar date.
pub fn valuation_date(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(date) => Ok(parse_date(date)?),
        None => Ok(Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn contract() -> ContractArgs {
        ContractArgs {
            spot: 22_000.0,
            strike: 22_000.0,
            option_type: OptionType::Call,
            days: None,
            expiry: None,
            as_of: None,
            rate: None,
        }
    }

    #[test]
    fn test_time_from_days() {
        let args = ContractArgs {
            days: Some(30.0),
            ..contract()
        };
        assert_relative_eq!(args.time_to_expiry().unwrap(), 30.0 / 365.0);
    }

    #[test]
    fn test_time_from_dates() {
        let args = ContractArgs {
            expiry: Some("2024-06-27".to_string()),
            as_of: Some("2024-05-28".to_string()),
            ..contract()
        };
        assert_relative_eq!(args.time_to_expiry().unwrap(), 30.0 / 365.0);
    }

    #[test]
    fn test_time_requires_an_input() {
        assert!(matches!(
            contract().time_to_expiry(),
            Err(CliError::InvalidArgument(_))
        ));
        let args = ContractArgs {
            days: Some(-1.0),
            ..contract()
        };
        assert!(args.time_to_expiry().is_err());
        let args = ContractArgs {
            expiry: Some("27/06/2024".to_string()),
            ..contract()
        };
        assert!(matches!(args.time_to_expiry(), Err(CliError::Date(_))));
    }

    #[test]
    fn test_checked_strike() {
        assert!(contract().checked_strike().is_ok());
        let args = ContractArgs {
            strike: 0.0,
            ..contract()
        };
        assert!(args.checked_strike().is_err());
    }
}
