//! Daily price-path generation.
//!
//! Geometric Brownian Motion in log space, one step per trading day:
//!
//! ```text
//! S(t+dt) = S(t) × exp((μ - 0.5σ²)dt + σ√dt × Z)
//! ```
//!
//! Each simulated day is expanded into a synthetic OHLC bar: the open is the
//! prior close, high and low are jittered outward from the open/close
//! envelope, and a daily implied volatility is drawn around a base level.
//!
//! # Random Draw Order
//!
//! Per day: two uniforms for the Box-Muller normal, then one uniform each for
//! the high, the low and the implied volatility. Bar 0 is the entry bar and
//! consumes no randomness.

use chrono::{Duration, NaiveDate};
use pricer_core::types::TRADING_DAYS_PER_YEAR;

use crate::rng::PricerRng;

/// Parameters for Geometric Brownian Motion daily steps.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::GbmParams;
///
/// let params = GbmParams::daily(22_000.0, 0.05, 0.15);
/// assert!((params.dt - 1.0 / 252.0).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GbmParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Drift (μ), annualised.
    pub drift: f64,
    /// Volatility (σ), annualised.
    pub volatility: f64,
    /// Time step in years.
    pub dt: f64,
}

impl GbmParams {
    /// Creates GBM parameters with a one-trading-day step (1/252).
    #[inline]
    pub fn daily(spot: f64, drift: f64, volatility: f64) -> Self {
        Self {
            spot,
            drift,
            volatility,
            dt: 1.0 / TRADING_DAYS_PER_YEAR,
        }
    }

    /// Advances `price` by one step using the standard normal draw `z`.
    #[inline]
    pub fn step(&self, price: f64, z: f64) -> f64 {
        let drift = (self.drift - 0.5 * self.volatility * self.volatility) * self.dt;
        let diffusion = self.volatility * self.dt.sqrt() * z;
        price * (drift + diffusion).exp()
    }
}

/// Relative jitter applied when synthesising a bar.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarJitter {
    /// Maximum fractional extension of high/low beyond the open/close envelope.
    pub range: f64,
    /// Maximum fractional deviation of daily IV from the base level.
    pub iv: f64,
}

impl Default for BarJitter {
    fn default() -> Self {
        Self {
            range: 0.01,
            iv: 0.10,
        }
    }
}

/// One simulated trading day.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyBar {
    /// Calendar date of the bar.
    pub date: NaiveDate,
    /// Prior close.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// GBM close.
    pub close: f64,
    /// Implied volatility used to price options on this day.
    pub iv: f64,
}

/// Generates `days + 1` daily bars starting at `params.spot`.
///
/// Bar 0 is the entry bar dated `start_date`, flat at the start price with
/// `base_iv`. Bars are one calendar day apart.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use pricer_pricing::mc::{generate_daily_bars, BarJitter, GbmParams};
/// use pricer_pricing::rng::PricerRng;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut rng = PricerRng::from_seed(42);
/// let bars = generate_daily_bars(
///     &GbmParams::daily(100.0, 0.05, 0.2),
///     start,
///     10,
///     0.2,
///     &BarJitter::default(),
///     &mut rng,
/// );
/// assert_eq!(bars.len(), 11);
/// assert_eq!(bars[0].close, 100.0);
/// assert!(bars.iter().all(|b| b.low <= b.open.min(b.close) && b.high >= b.open.max(b.close)));
/// ```
pub fn generate_daily_bars(
    params: &GbmParams,
    start_date: NaiveDate,
    days: usize,
    base_iv: f64,
    jitter: &BarJitter,
    rng: &mut PricerRng,
) -> Vec<DailyBar> {
    let mut bars = Vec::with_capacity(days + 1);
    bars.push(DailyBar {
        date: start_date,
        open: params.spot,
        high: params.spot,
        low: params.spot,
        close: params.spot,
        iv: base_iv,
    });

    let mut close = params.spot;
    for day in 1..=days {
        let open = close;
        close = params.step(open, rng.gen_normal());

        let high = open.max(close) * (1.0 + rng.gen_uniform() * jitter.range);
        let low = open.min(close) * (1.0 - rng.gen_uniform() * jitter.range);
        let iv = base_iv * (1.0 + (rng.gen_uniform() - 0.5) * 2.0 * jitter.iv);

        bars.push(DailyBar {
            date: start_date + Duration::days(day as i64),
            open,
            high,
            low,
            close,
            iv,
        });
    }

    bars
}
