//! Backtest configuration.

use chrono::NaiveDate;

use super::error::BacktestError;

/// How each leg's remaining time to expiry is counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExpiryHorizon {
    /// Every leg enters with `entry_days_to_expiry` days left, counting down
    /// one per simulated day regardless of the leg's own expiry date.
    #[default]
    FixedDays,
    /// Each leg counts down from the calendar days between the start date
    /// and its own expiry date.
    LegExpiry,
}

/// Configuration for a path-simulated strategy backtest.
///
/// Defaults reproduce the classic setup: 90 simulated days, 50-unit lots,
/// 30 days to expiry at entry, 15% path volatility with 5% drift, options
/// priced at a 5% rate.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::backtest::{BacktestConfig, ExpiryHorizon};
///
/// let config = BacktestConfig {
///     days: 45,
///     horizon: ExpiryHorizon::LegExpiry,
///     ..BacktestConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.effective_base_iv(), 0.15);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BacktestConfig {
    /// Number of simulated trading days.
    pub days: usize,
    /// Units of underlying per lot.
    pub lot_size: u32,
    /// Days to expiry at entry under [`ExpiryHorizon::FixedDays`].
    pub entry_days_to_expiry: u32,
    /// Expiry counting mode.
    pub horizon: ExpiryHorizon,
    /// Risk-free rate used to re-price legs.
    pub risk_free_rate: f64,
    /// Annualised drift of the simulated underlying.
    pub drift: f64,
    /// Annualised volatility of the simulated underlying.
    pub volatility: f64,
    /// Base implied volatility for pricing; defaults to `volatility`.
    pub base_iv: Option<f64>,
    /// Maximum fractional daily IV deviation from the base.
    pub iv_jitter: f64,
    /// Maximum fractional high/low extension around the open/close envelope.
    pub range_jitter: f64,
    /// Days between settlement checkpoints.
    pub checkpoint_interval: usize,
    /// Starting underlying level; defaults to the first leg's strike.
    pub spot: Option<f64>,
    /// Date of the entry bar; defaults to the local calendar date.
    pub start_date: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            days: 90,
            lot_size: 50,
            entry_days_to_expiry: 30,
            horizon: ExpiryHorizon::FixedDays,
            risk_free_rate: 0.05,
            drift: 0.05,
            volatility: 0.15,
            base_iv: None,
            iv_jitter: 0.10,
            range_jitter: 0.01,
            checkpoint_interval: 5,
            spot: None,
            start_date: None,
        }
    }
}

impl BacktestConfig {
    /// Implied volatility level options are priced around.
    #[inline]
    pub fn effective_base_iv(&self) -> f64 {
        self.base_iv.unwrap_or(self.volatility)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// - `BacktestError::InvalidDays` if `days == 0`
    /// - `BacktestError::InvalidConfig` for any other out-of-domain value
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.days == 0 {
            return Err(BacktestError::InvalidDays { days: self.days });
        }
        if self.lot_size == 0 {
            return Err(BacktestError::InvalidConfig(
                "lot_size must be positive".to_string(),
            ));
        }
        if self.checkpoint_interval == 0 {
            return Err(BacktestError::InvalidConfig(
                "checkpoint_interval must be positive".to_string(),
            ));
        }
        if !(self.volatility >= 0.0 && self.volatility.is_finite()) {
            return Err(BacktestError::InvalidConfig(format!(
                "volatility must be non-negative, got {}",
                self.volatility
            )));
        }
        let base_iv = self.effective_base_iv();
        if !(base_iv > 0.0 && base_iv.is_finite()) {
            return Err(BacktestError::InvalidConfig(format!(
                "base implied volatility must be positive, got {}",
                base_iv
            )));
        }
        if !(0.0..1.0).contains(&self.iv_jitter) || !(0.0..1.0).contains(&self.range_jitter) {
            return Err(BacktestError::InvalidConfig(
                "jitter fractions must lie in [0, 1)".to_string(),
            ));
        }
        if !self.drift.is_finite() || !self.risk_free_rate.is_finite() {
            return Err(BacktestError::InvalidConfig(
                "drift and rate must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
