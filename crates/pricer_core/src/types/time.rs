//! Year-fraction utilities for option expiries.
//!
//! All functions take an explicit evaluation date so the pricing layers never
//! read the wall clock. [`time_to_expiry_from_today`] is the one convenience
//! wrapper that does, for service-layer callers.

use chrono::{Local, NaiveDate};

use super::error::DateError;

/// Calendar days per year used for expiry year fractions (Act/365).
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// Trading days per year used for simulation time steps and annualisation.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Floor applied to year fractions so the pricer never divides by zero.
pub const MIN_TIME_TO_EXPIRY: f64 = 0.001;

/// Signed number of calendar days from `start` to `end`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_core::types::days_between;
///
/// let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let b = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(days_between(a, b), 30);
/// assert_eq!(days_between(b, a), -30);
/// ```
#[inline]
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Act/365 year fraction from `as_of` to `expiry`, floored at
/// [`MIN_TIME_TO_EXPIRY`].
///
/// Expired contracts (expiry on or before `as_of`) also return the floor.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_core::types::time_to_expiry;
///
/// let as_of = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let expiry = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
/// let t = time_to_expiry(as_of, expiry);
/// assert!((t - 30.0 / 365.0).abs() < 1e-12);
///
/// assert_eq!(time_to_expiry(expiry, as_of), 0.001);
/// ```
pub fn time_to_expiry(as_of: NaiveDate, expiry: NaiveDate) -> f64 {
    let years = days_between(as_of, expiry) as f64 / CALENDAR_DAYS_PER_YEAR;
    years.max(MIN_TIME_TO_EXPIRY)
}

/// [`time_to_expiry`] evaluated against the local calendar date.
pub fn time_to_expiry_from_today(expiry: NaiveDate) -> f64 {
    time_to_expiry(Local::now().date_naive(), expiry)
}

/// Parses an ISO 8601 (`YYYY-MM-DD`) date.
///
/// # Errors
/// `DateError::ParseError` when the string is not a valid calendar date.
///
/// # Examples
/// ```
/// use pricer_core::types::parse_date;
///
/// assert!(parse_date("2024-02-29").is_ok());
/// assert!(parse_date("2023-02-29").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_year() {
        let t = time_to_expiry(date(2023, 1, 1), date(2024, 1, 1));
        assert_relative_eq!(t, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_same_day_hits_floor() {
        let d = date(2024, 6, 27);
        assert_eq!(time_to_expiry(d, d), MIN_TIME_TO_EXPIRY);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date("27/06/2024").is_err());
        assert_eq!(parse_date(" 2024-06-27 ").unwrap(), date(2024, 6, 27));
    }

    proptest! {
        #[test]
        fn prop_time_to_expiry_never_below_floor(offset in -1000i64..1000) {
            let as_of = date(2024, 1, 1);
            let expiry = as_of + chrono::Duration::days(offset);
            prop_assert!(time_to_expiry(as_of, expiry) >= MIN_TIME_TO_EXPIRY);
        }
    }
}
