//! Performance metrics for a simulated equity curve.
//!
//! Conventions:
//! - Percentages are expressed as numbers in [0, 100] (`12.5` means 12.5%).
//! - `max_drawdown` is a positive magnitude: the largest peak-to-trough fall
//!   seen while walking the curve once.
//! - Sharpe uses the daily simple returns of the curve with a zero risk-free
//!   rate and population standard deviation, annualised by √252. The entry
//!   bar has no prior equity, so an `n`-bar curve yields `n - 1` returns with
//!   no leading zero.
//! - A trade record is the P&L of its checkpoint day alone.

use chrono::NaiveDate;
use pricer_core::types::{CALENDAR_DAYS_PER_YEAR, TRADING_DAYS_PER_YEAR};

/// Sign of a sampled checkpoint day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TradeOutcome {
    /// Strictly positive P&L.
    Win,
    /// Zero or negative P&L.
    Loss,
}

/// Daily P&L sampled at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeRecord {
    /// Checkpoint date.
    pub date: NaiveDate,
    /// P&L of the checkpoint day (`equity[t] - equity[t-1]`).
    pub pnl: f64,
    /// Win when `pnl > 0`.
    pub outcome: TradeOutcome,
}

impl TradeRecord {
    /// Records a checkpoint, classifying its outcome.
    pub fn new(date: NaiveDate, pnl: f64) -> Self {
        let outcome = if pnl > 0.0 {
            TradeOutcome::Win
        } else {
            TradeOutcome::Loss
        };
        Self { date, pnl, outcome }
    }
}

/// Summary statistics of a backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestMetrics {
    /// Total return, percent of initial capital.
    pub total_return: f64,
    /// Linear annualisation of the total return (`total_return × 365 / days`).
    pub cagr: f64,
    /// Annualised Sharpe ratio of daily returns.
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline, percent.
    pub max_drawdown: f64,
    /// Winning checkpoints, percent of all checkpoints.
    pub win_rate: f64,
    /// Number of checkpoints.
    pub total_trades: usize,
    /// Mean P&L of winning checkpoints (0 when none).
    pub avg_profit: f64,
    /// Mean P&L of losing checkpoints, non-positive (0 when none).
    pub avg_loss: f64,
}

/// Daily simple returns `e[t]/e[t-1] - 1` for `t = 1..n`.
///
/// A day following a zero equity value contributes a zero return.
pub fn daily_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
        .collect()
}

/// Annualised Sharpe ratio; 0 when the return series is empty or flat.
///
/// # Examples
/// ```
/// use pricer_pricing::backtest::sharpe_ratio;
///
/// assert_eq!(sharpe_ratio(&[0.01, 0.01, 0.01]), 0.0);
/// assert!(sharpe_ratio(&[0.01, 0.02, 0.00]) > 0.0);
/// ```
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough decline of the curve, in percent.
///
/// # Examples
/// ```
/// use pricer_pricing::backtest::max_drawdown;
///
/// assert_eq!(max_drawdown(&[100.0, 120.0, 90.0, 130.0, 65.0]), 50.0);
/// assert_eq!(max_drawdown(&[100.0, 110.0, 120.0]), 0.0);
/// ```
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for &equity in equity_curve {
        peak = peak.max(equity);
        if peak > 0.0 {
            worst = worst.max((peak - equity) / peak);
        }
    }

    worst * 100.0
}

/// Computes all metrics for a run of `days` simulated days.
pub fn compute_metrics(equity_curve: &[f64], trades: &[TradeRecord], days: usize) -> BacktestMetrics {
    let (initial, last) = match (equity_curve.first(), equity_curve.last()) {
        (Some(&initial), Some(&last)) => (initial, last),
        _ => return BacktestMetrics::default(),
    };

    let total_return = if initial != 0.0 {
        (last - initial) / initial * 100.0
    } else {
        0.0
    };
    let cagr = if days > 0 {
        total_return * CALENDAR_DAYS_PER_YEAR / days as f64
    } else {
        0.0
    };

    let (wins, losses): (Vec<&TradeRecord>, Vec<&TradeRecord>) = trades
        .iter()
        .partition(|t| t.outcome == TradeOutcome::Win);
    let mean_pnl = |side: &[&TradeRecord]| {
        if side.is_empty() {
            0.0
        } else {
            side.iter().map(|t| t.pnl).sum::<f64>() / side.len() as f64
        }
    };

    let win_rate = if trades.is_empty() {
        0.0
    } else {
        wins.len() as f64 / trades.len() as f64 * 100.0
    };

    BacktestMetrics {
        total_return,
        cagr,
        sharpe_ratio: sharpe_ratio(&daily_returns(equity_curve)),
        max_drawdown: max_drawdown(equity_curve),
        win_rate,
        total_trades: trades.len(),
        avg_profit: mean_pnl(&wins),
        avg_loss: mean_pnl(&losses),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_daily_returns() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.10, epsilon = 1e-12);
        assert_eq!(daily_returns(&[0.0, 10.0]), vec![0.0]);
    }

    #[test]
    fn test_sharpe_known_value() {
        // mean 0.01, population std 0.01
        let s = sharpe_ratio(&[0.0, 0.02]);
        assert_relative_eq!(s, 252.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_drawdown_never_negative() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[100.0]), 0.0);
    }

    #[test]
    fn test_compute_metrics() {
        let equity = [1_000.0, 1_100.0, 1_050.0, 1_200.0];
        let trades = [
            TradeRecord::new(day(1), 100.0),
            TradeRecord::new(day(2), -50.0),
            TradeRecord::new(day(3), 150.0),
            TradeRecord::new(day(4), 0.0),
        ];
        let m = compute_metrics(&equity, &trades, 3);

        assert_relative_eq!(m.total_return, 20.0, epsilon = 1e-9);
        assert_relative_eq!(m.cagr, 20.0 * 365.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(m.max_drawdown, 50.0 / 1_100.0 * 100.0, epsilon = 1e-9);
        assert_eq!(m.total_trades, 4);
        assert_relative_eq!(m.win_rate, 50.0);
        assert_relative_eq!(m.avg_profit, 125.0);
        assert_relative_eq!(m.avg_loss, -25.0);
    }

    #[test]
    fn test_no_trades() {
        let m = compute_metrics(&[500.0, 500.0], &[], 1);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.avg_profit, 0.0);
        assert_eq!(m.avg_loss, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_zero_pnl_is_loss() {
        assert_eq!(TradeRecord::new(day(1), 0.0).outcome, TradeOutcome::Loss);
    }
}
