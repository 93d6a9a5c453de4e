//! Expiry payoff profile of a strategy over a grid of settlement prices.

use pricer_models::instruments::StrategyLeg;

use crate::error::{check_spot, RiskError};

/// Settlement price grid around spot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PayoffGrid {
    /// Half-width of the grid as a fraction of spot.
    pub range_pct: f64,
    /// Grid steps on each side of spot.
    pub steps: usize,
}

impl Default for PayoffGrid {
    fn default() -> Self {
        Self {
            range_pct: 0.20,
            steps: 50,
        }
    }
}

/// Strategy P&L at one settlement price.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayoffPoint {
    /// Underlying settlement price.
    pub underlying: f64,
    /// Strategy P&L, lot-scaled.
    pub pnl: f64,
}

/// Expiry P&L curve with its extremes and breakevens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayoffProfile {
    /// `2 × steps + 1` points from `spot × (1 − range)` to `spot × (1 + range)`.
    pub points: Vec<PayoffPoint>,
    /// Largest P&L on the grid.
    pub max_profit: f64,
    /// Smallest P&L on the grid.
    pub max_loss: f64,
    /// Settlement prices where P&L crosses zero, interpolated between grid points.
    pub breakevens: Vec<f64>,
}

/// Evaluates the strategy's expiry P&L across the grid.
///
/// # Errors
/// - `RiskError::EmptyStrategy` if `legs` is empty
/// - `RiskError::InvalidSpot` if spot <= 0
/// - `RiskError::InvalidConfig` for a grid with no steps or a range outside (0, 1)
pub fn payoff_profile(
    legs: &[StrategyLeg],
    spot: f64,
    lot_size: u32,
    grid: &PayoffGrid,
) -> Result<PayoffProfile, RiskError> {
    if legs.is_empty() {
        return Err(RiskError::EmptyStrategy);
    }
    check_spot(spot)?;
    if grid.steps == 0 || !(grid.range_pct > 0.0 && grid.range_pct < 1.0) {
        return Err(RiskError::InvalidConfig(format!(
            "payoff grid needs steps > 0 and range in (0, 1), got {} / {}",
            grid.steps, grid.range_pct
        )));
    }

    let lot = lot_size as f64;
    let half_width = spot * grid.range_pct;
    let step = half_width / grid.steps as f64;
    let lower = spot - half_width;

    let points: Vec<PayoffPoint> = (0..=2 * grid.steps)
        .map(|i| {
            let underlying = lower + step * i as f64;
            let pnl = lot * legs.iter().map(|leg| leg.expiry_pnl(underlying)).sum::<f64>();
            PayoffPoint { underlying, pnl }
        })
        .collect();

    let max_profit = points.iter().map(|p| p.pnl).fold(f64::NEG_INFINITY, f64::max);
    let max_loss = points.iter().map(|p| p.pnl).fold(f64::INFINITY, f64::min);

    let breakevens = points
        .windows(2)
        .filter(|w| (w[0].pnl < 0.0) != (w[1].pnl < 0.0))
        .map(|w| {
            let (a, b) = (w[0], w[1]);
            a.underlying + (0.0 - a.pnl) * (b.underlying - a.underlying) / (b.pnl - a.pnl)
        })
        .collect();

    Ok(PayoffProfile {
        points,
        max_profit,
        max_loss,
        breakevens,
    })
}
