//! Integration tests for module exports.
//!
//! Verify that all public modules and types are correctly exported and
//! accessible via absolute paths.

use chrono::NaiveDate;

/// Test that the distribution functions are accessible via absolute path.
#[test]
fn test_distributions_module_exports() {
    use pricer_core::math::distributions::norm_cdf;
    use pricer_core::math::distributions::norm_pdf;

    assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
    assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-12);
}

/// Test that the option side and moneyness types are re-exported.
#[test]
fn test_option_types_exports() {
    use pricer_core::types::moneyness::Moneyness as ModuleMoneyness;
    use pricer_core::types::option_type::OptionType as ModuleOptionType;
    use pricer_core::types::{Moneyness, OptionType, ATM_BAND};

    let side: ModuleOptionType = "pe".parse().unwrap();
    assert_eq!(side, OptionType::Put);
    assert_eq!(side.intrinsic(22_000.0, 22_300.0), 300.0);

    let m: ModuleMoneyness = Moneyness::classify(22_000.0, 22_000.0 * (1.0 + ATM_BAND / 2.0), side);
    assert_eq!(m, Moneyness::Atm);
}

/// Test that the time utilities and constants are re-exported.
#[test]
fn test_time_module_exports() {
    use pricer_core::types::time::days_between;
    use pricer_core::types::{
        parse_date, time_to_expiry, CALENDAR_DAYS_PER_YEAR, MIN_TIME_TO_EXPIRY,
        TRADING_DAYS_PER_YEAR,
    };

    let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let expiry = parse_date("2024-07-01").unwrap();

    assert_eq!(days_between(as_of, expiry), 182);
    assert!((time_to_expiry(as_of, expiry) - 182.0 / CALENDAR_DAYS_PER_YEAR).abs() < 1e-12);
    assert_eq!(time_to_expiry(expiry, as_of), MIN_TIME_TO_EXPIRY);
    assert_eq!(TRADING_DAYS_PER_YEAR, 252.0);
}

/// Test that error types are accessible and convert as documented.
#[test]
fn test_error_module_exports() {
    use pricer_core::types::error::{DateError, PricingError};
    use pricer_core::types::parse_date;

    let err = parse_date("2024-13-01").unwrap_err();
    assert!(matches!(err, DateError::ParseError(_)));

    let pricing = PricingError::InvalidInput("spot must be positive".to_string());
    assert!(format!("{}", pricing).contains("spot must be positive"));
}
