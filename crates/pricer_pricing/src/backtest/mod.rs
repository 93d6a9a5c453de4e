//! Strategy backtesting over simulated daily paths.
//!
//! A run generates `days + 1` daily bars with [`crate::mc::generate_daily_bars`],
//! re-prices every [`StrategyLeg`](pricer_models::instruments::StrategyLeg)
//! on each bar and accumulates the lot-scaled value changes into an equity
//! curve. Every `checkpoint_interval` days (and on the final day) that
//! day's P&L is sampled as a [`TradeRecord`].
//!
//! - [`BacktestConfig`]: path, pricing and checkpoint parameters
//! - [`run_backtest`]: single run with an explicit random source
//! - [`run_backtest_simulation`]: default configuration from a seed
//! - [`run_backtest_batch`]: parallel runs over many seeds
//! - [`compute_metrics`]: return, CAGR, Sharpe, drawdown and trade statistics

mod config;
mod engine;
mod error;
mod metrics;

pub use config::{BacktestConfig, ExpiryHorizon};
pub use engine::{run_backtest, run_backtest_batch, run_backtest_simulation, BacktestResult};
pub use error::BacktestError;
pub use metrics::{
    compute_metrics, daily_returns, max_drawdown, sharpe_ratio, BacktestMetrics, TradeOutcome,
    TradeRecord,
};
