//! Position-level Greeks for a multi-leg strategy.

use chrono::NaiveDate;
use pricer_core::types::time_to_expiry;
use pricer_models::analytical::{BlackScholes, Greeks};
use pricer_models::instruments::StrategyLeg;

use crate::error::RiskError;

/// Market inputs shared by every leg.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketSnapshot {
    /// Underlying price.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Flat volatility applied to every leg.
    pub volatility: f64,
    /// Valuation date.
    pub as_of: NaiveDate,
}

/// Sums Black-Scholes Greeks over `legs`.
///
/// Each leg contributes its per-unit Greeks (theta per day, vega per vol
/// point) times `±quantity × lot_size`, negative for short legs. Time to
/// expiry is Act/365 from `market.as_of`, floored at 0.001 years.
///
/// # Errors
/// - `RiskError::EmptyStrategy` if `legs` is empty
/// - `RiskError::Pricing` for a non-positive spot or volatility
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_core::types::OptionType;
/// use pricer_models::instruments::{StrategyLeg, TradeAction};
/// use pricer_risk::greeks::{position_greeks, MarketSnapshot};
///
/// let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
/// let legs = vec![
///     StrategyLeg::new(OptionType::Call, TradeAction::Buy, 22_000.0, 300.0, 1, expiry).unwrap(),
///     StrategyLeg::new(OptionType::Put, TradeAction::Buy, 22_000.0, 280.0, 1, expiry).unwrap(),
/// ];
/// let market = MarketSnapshot {
///     spot: 22_000.0,
///     rate: 0.07,
///     volatility: 0.15,
///     as_of: NaiveDate::from_ymd_opt(2024, 5, 28).unwrap(),
/// };
///
/// let g = position_greeks(&legs, &market, 50).unwrap();
/// assert!(g.gamma > 0.0 && g.vega > 0.0 && g.theta < 0.0);
/// ```
pub fn position_greeks(
    legs: &[StrategyLeg],
    market: &MarketSnapshot,
    lot_size: u32,
) -> Result<Greeks, RiskError> {
    if legs.is_empty() {
        return Err(RiskError::EmptyStrategy);
    }
    let model = BlackScholes::new(market.spot, market.rate, market.volatility)?;
    let lot = lot_size as f64;

    Ok(legs
        .iter()
        .map(|leg| {
            let t = time_to_expiry(market.as_of, leg.expiry());
            model.greeks(leg.strike(), t, leg.option_type()) * (leg.signed_quantity() * lot)
        })
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::OptionType;
    use pricer_models::instruments::TradeAction;

    fn market() -> MarketSnapshot {
        MarketSnapshot {
            spot: 22_000.0,
            rate: 0.07,
            volatility: 0.2,
            as_of: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn leg(option_type: OptionType, action: TradeAction, strike: f64, qty: u32) -> StrategyLeg {
        let expiry = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        StrategyLeg::new(option_type, action, strike, 100.0, qty, expiry).unwrap()
    }

    #[test]
    fn test_single_leg_matches_model() {
        let legs = vec![leg(OptionType::Call, TradeAction::Buy, 22_000.0, 2)];
        let g = position_greeks(&legs, &market(), 50).unwrap();

        let t = 30.0 / 365.0;
        let unit = BlackScholes::new(22_000.0, 0.07, 0.2)
            .unwrap()
            .greeks(22_000.0, t, OptionType::Call);
        assert_relative_eq!(g.delta, unit.delta * 100.0, epsilon = 1e-9);
        assert_relative_eq!(g.gamma, unit.gamma * 100.0, epsilon = 1e-12);
        assert_relative_eq!(g.vega, unit.vega * 100.0, epsilon = 1e-9);
        assert_relative_eq!(g.theta, unit.theta * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_offsetting_legs_cancel() {
        let legs = vec![
            leg(OptionType::Put, TradeAction::Buy, 21_800.0, 1),
            leg(OptionType::Put, TradeAction::Sell, 21_800.0, 1),
        ];
        let g = position_greeks(&legs, &market(), 50).unwrap();
        assert_relative_eq!(g.delta, 0.0, epsilon = 1e-12);
        assert_relative_eq!(g.gamma, 0.0, epsilon = 1e-12);
        assert_relative_eq!(g.vega, 0.0, epsilon = 1e-12);
        assert_relative_eq!(g.theta, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_straddle_signs() {
        let legs = vec![
            leg(OptionType::Call, TradeAction::Sell, 22_000.0, 1),
            leg(OptionType::Put, TradeAction::Sell, 22_000.0, 1),
        ];
        let g = position_greeks(&legs, &market(), 50).unwrap();
        assert!(g.gamma < 0.0);
        assert!(g.vega < 0.0);
        assert!(g.theta > 0.0);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            position_greeks(&[], &market(), 50),
            Err(RiskError::EmptyStrategy)
        );
        let bad = MarketSnapshot {
            volatility: 0.0,
            ..market()
        };
        let legs = vec![leg(OptionType::Call, TradeAction::Buy, 22_000.0, 1)];
        assert!(matches!(
            position_greeks(&legs, &bad, 50),
            Err(RiskError::Pricing(_))
        ));
    }
}
