//! Day-by-day strategy re-pricing along a simulated path.
//!
//! Each leg is valued with Black-Scholes on every bar using the bar's close
//! and implied volatility, with remaining time counted in trading days
//! (`remaining / 252`). On its expiry day a leg settles at intrinsic value
//! and stays frozen afterwards, so for every day `t`:
//!
//! ```text
//! equity[t] = capital + lot × Σ sign × qty × (V_t - V_0)
//! ```
//!
//! Every `checkpoint_interval` days, and on the final day, the day's P&L is
//! sampled into a [`TradeRecord`]; win rate and average profit/loss are
//! computed over those samples.

use chrono::{Local, NaiveDate};
use pricer_core::types::TRADING_DAYS_PER_YEAR;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::StrategyLeg;
use rayon::prelude::*;
use tracing::{debug, info};

use super::config::{BacktestConfig, ExpiryHorizon};
use super::error::BacktestError;
use super::metrics::{compute_metrics, BacktestMetrics, TradeRecord};
use crate::mc::{generate_daily_bars, BarJitter, DailyBar, GbmParams};
use crate::rng::PricerRng;

/// Immutable outcome of one simulation run.
///
/// `dates`, `equity_curve`, `underlying_path` and `daily_iv` all have
/// `days + 1` entries; index 0 is the entry bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestResult {
    /// Bar dates.
    pub dates: Vec<NaiveDate>,
    /// Account equity after each bar.
    pub equity_curve: Vec<f64>,
    /// Simulated underlying closes.
    pub underlying_path: Vec<f64>,
    /// Implied volatility each bar was priced with.
    pub daily_iv: Vec<f64>,
    /// Summary statistics.
    pub metrics: BacktestMetrics,
    /// Daily P&L sampled at each checkpoint.
    pub trades: Vec<TradeRecord>,
    /// Seed that reproduces this run.
    pub seed: u64,
}

/// Runs a backtest with the given configuration and random source.
///
/// # Errors
/// - `BacktestError::NoLegs` for an empty strategy
/// - `BacktestError::InvalidCapital` if capital <= 0 or not finite
/// - `BacktestError::InvalidDays` / `InvalidConfig` from [`BacktestConfig::validate`]
/// - `BacktestError::Pricing` if the starting spot is not positive
pub fn run_backtest(
    legs: &[StrategyLeg],
    initial_capital: f64,
    config: &BacktestConfig,
    rng: &mut PricerRng,
) -> Result<BacktestResult, BacktestError> {
    validate_inputs(legs, initial_capital, config)?;

    let spot = config.spot.unwrap_or_else(|| legs[0].strike());
    let start_date = config
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let rate = config.risk_free_rate;
    let lot = config.lot_size as f64;
    let days = config.days;

    // Validates the starting spot before any randomness is consumed.
    BlackScholes::new(spot, rate, config.effective_base_iv())?;

    info!(
        legs = legs.len(),
        days,
        spot,
        seed = rng.seed(),
        "starting backtest"
    );

    let bars = generate_daily_bars(
        &GbmParams::daily(spot, config.drift, config.volatility),
        start_date,
        days,
        config.effective_base_iv(),
        &BarJitter {
            range: config.range_jitter,
            iv: config.iv_jitter,
        },
        rng,
    );

    let expiry_days: Vec<usize> = legs
        .iter()
        .map(|leg| expiry_day_index(leg, config, start_date))
        .collect();

    let mut values = price_legs(legs, &expiry_days, &bars[0], 0, rate, None)?;

    let mut equity_curve = Vec::with_capacity(days + 1);
    let mut trades = Vec::new();
    let mut equity = initial_capital;
    equity_curve.push(equity);

    for (t, bar) in bars.iter().enumerate().skip(1) {
        let today = price_legs(legs, &expiry_days, bar, t, rate, Some(values.as_slice()))?;

        let pnl: f64 = legs
            .iter()
            .zip(today.iter().zip(&values))
            .map(|(leg, (now, prev))| leg.signed_quantity() * (now - prev))
            .sum::<f64>()
            * lot;

        equity += pnl;
        equity_curve.push(equity);
        values = today;

        if t % config.checkpoint_interval == 0 || t == days {
            debug!(day = t, date = %bar.date, pnl, "checkpoint sampled");
            trades.push(TradeRecord::new(bar.date, pnl));
        }
    }

    let metrics = compute_metrics(&equity_curve, &trades, days);
    info!(
        total_return = metrics.total_return,
        max_drawdown = metrics.max_drawdown,
        trades = metrics.total_trades,
        "backtest complete"
    );

    Ok(BacktestResult {
        dates: bars.iter().map(|b| b.date).collect(),
        equity_curve,
        underlying_path: bars.iter().map(|b| b.close).collect(),
        daily_iv: bars.iter().map(|b| b.iv).collect(),
        metrics,
        trades,
        seed: rng.seed(),
    })
}

/// Runs a backtest with default configuration over `days` days.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_core::types::OptionType;
/// use pricer_models::instruments::{StrategyLeg, TradeAction};
/// use pricer_pricing::backtest::run_backtest_simulation;
///
/// let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
/// let legs = vec![StrategyLeg::new(OptionType::Call, TradeAction::Sell, 22_000.0, 250.0, 1, expiry).unwrap()];
///
/// let a = run_backtest_simulation(&legs, 200_000.0, 30, 7).unwrap();
/// let b = run_backtest_simulation(&legs, 200_000.0, 30, 7).unwrap();
/// assert_eq!(a.equity_curve, b.equity_curve);
///
/// assert!(run_backtest_simulation(&[], 200_000.0, 30, 7).is_err());
/// ```
pub fn run_backtest_simulation(
    legs: &[StrategyLeg],
    initial_capital: f64,
    days: usize,
    seed: u64,
) -> Result<BacktestResult, BacktestError> {
    let config = BacktestConfig {
        days,
        ..BacktestConfig::default()
    };
    run_backtest(legs, initial_capital, &config, &mut PricerRng::from_seed(seed))
}

/// Runs one independent backtest per seed in parallel.
///
/// Results are returned in seed order and match sequential runs exactly.
pub fn run_backtest_batch(
    legs: &[StrategyLeg],
    initial_capital: f64,
    config: &BacktestConfig,
    seeds: &[u64],
) -> Result<Vec<BacktestResult>, BacktestError> {
    validate_inputs(legs, initial_capital, config)?;

    seeds
        .par_iter()
        .map(|&seed| run_backtest(legs, initial_capital, config, &mut PricerRng::from_seed(seed)))
        .collect()
}

fn validate_inputs(
    legs: &[StrategyLeg],
    initial_capital: f64,
    config: &BacktestConfig,
) -> Result<(), BacktestError> {
    if legs.is_empty() {
        return Err(BacktestError::NoLegs);
    }
    if !(initial_capital > 0.0 && initial_capital.is_finite()) {
        return Err(BacktestError::InvalidCapital {
            capital: initial_capital,
        });
    }
    config.validate()
}

/// Bar index on which the leg expires.
fn expiry_day_index(leg: &StrategyLeg, config: &BacktestConfig, start_date: NaiveDate) -> usize {
    match config.horizon {
        ExpiryHorizon::FixedDays => config.entry_days_to_expiry as usize,
        ExpiryHorizon::LegExpiry => (leg.expiry() - start_date).num_days().max(0) as usize,
    }
}

/// Values every leg on bar `t`.
///
/// A leg past its expiry bar keeps the value it settled at in `previous`.
fn price_legs(
    legs: &[StrategyLeg],
    expiry_days: &[usize],
    bar: &DailyBar,
    t: usize,
    rate: f64,
    previous: Option<&[f64]>,
) -> Result<Vec<f64>, BacktestError> {
    let model = BlackScholes::new(bar.close, rate, bar.iv)?;

    Ok(legs
        .iter()
        .zip(expiry_days)
        .enumerate()
        .map(|(i, (leg, &expiry_day))| match previous {
            Some(prev) if t > expiry_day => prev[i],
            _ => {
                let remaining = expiry_day.saturating_sub(t) as f64;
                model.price(leg.strike(), remaining / TRADING_DAYS_PER_YEAR, leg.option_type())
            }
        })
        .collect())
}
