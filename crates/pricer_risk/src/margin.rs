//! Approximate exchange-style margin for multi-leg option strategies.
//!
//! The estimate follows SPAN-like proportions but is not an exchange-exact
//! replication:
//!
//! 1. Net premium: debit for buys, credit for sells, `premium × qty × lot`.
//! 2. Every short leg accrues `span_rate` and `exposure_rate` of its
//!    contract value `spot × qty × lot`.
//! 3. On each side (calls, puts) holding both shorts and longs, the hedged
//!    quantity `min(Σ short qty, Σ long qty)` earns a credit of
//!    `hedge_credit_rate` of its combined short margin, removed from SPAN and
//!    exposure in proportion to their rates.
//! 4. With no short legs the requirement is the premium due and SPAN and
//!    exposure are zero.
//!
//! Leg premiums are used as supplied; nothing is re-priced here.

use pricer_core::types::OptionType;
use pricer_models::instruments::{StrategyLeg, TradeAction};
use tracing::debug;

use crate::error::{check_spot, RiskError};

/// Margin rates and contract size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarginConfig {
    /// Units of underlying per lot.
    pub lot_size: u32,
    /// SPAN margin as a fraction of contract value.
    pub span_rate: f64,
    /// Exposure margin as a fraction of contract value.
    pub exposure_rate: f64,
    /// Fraction of hedged short margin credited back.
    pub hedge_credit_rate: f64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            lot_size: 50,
            span_rate: 0.12,
            exposure_rate: 0.03,
            hedge_credit_rate: 0.70,
        }
    }
}

impl MarginConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// `RiskError::InvalidConfig` for a zero lot size, negative or non-finite
    /// rates, or a hedge credit outside [0, 1].
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.lot_size == 0 {
            return Err(RiskError::InvalidConfig("lot_size must be positive".to_string()));
        }
        for (name, rate) in [("span_rate", self.span_rate), ("exposure_rate", self.exposure_rate)] {
            if !(rate >= 0.0 && rate.is_finite()) {
                return Err(RiskError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, rate
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.hedge_credit_rate) {
            return Err(RiskError::InvalidConfig(format!(
                "hedge_credit_rate must lie in [0, 1], got {}",
                self.hedge_credit_rate
            )));
        }
        Ok(())
    }
}

/// Margin estimate for one strategy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarginResult {
    /// Capital required up front.
    pub total_margin: f64,
    /// SPAN component after hedge credits.
    pub span_margin: f64,
    /// Exposure component after hedge credits.
    pub exposure_margin: f64,
    /// Net premium: positive for a debit, negative for a credit.
    pub net_premium: f64,
    /// Total hedge credit applied.
    pub hedge_benefit: f64,
    /// One line per contributing term, in computation order.
    pub breakdown: Vec<String>,
}

/// Margin estimator bound to a [`MarginConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MarginCalculator {
    config: MarginConfig,
}

impl MarginCalculator {
    /// Creates a calculator.
    pub fn new(config: MarginConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &MarginConfig {
        &self.config
    }

    /// Estimates margin for `legs` at the current `spot`.
    ///
    /// # Errors
    /// - `RiskError::EmptyStrategy` if `legs` is empty
    /// - `RiskError::InvalidSpot` if spot <= 0
    /// - `RiskError::InvalidConfig` from [`MarginConfig::validate`]
    pub fn calculate(&self, legs: &[StrategyLeg], spot: f64) -> Result<MarginResult, RiskError> {
        if legs.is_empty() {
            return Err(RiskError::EmptyStrategy);
        }
        check_spot(spot)?;
        self.config.validate()?;

        let lot = self.config.lot_size as f64;
        let net_premium: f64 = legs
            .iter()
            .map(|leg| leg.action().sign() * leg.premium() * leg.quantity() as f64 * lot)
            .sum();

        let mut span = 0.0;
        let mut exposure = 0.0;
        let mut breakdown = Vec::new();

        let shorts = [OptionType::Call, OptionType::Put]
            .into_iter()
            .flat_map(|side| legs.iter().filter(move |l| l.is_short() && l.option_type() == side));
        let mut has_shorts = false;
        for leg in shorts {
            has_shorts = true;
            let contract_value = spot * leg.quantity() as f64 * lot;
            let leg_span = contract_value * self.config.span_rate;
            let leg_exposure = contract_value * self.config.exposure_rate;
            span += leg_span;
            exposure += leg_exposure;
            breakdown.push(format!(
                "Short {} {}: ~₹{:.2} margin",
                leg.option_type(),
                leg.strike(),
                leg_span + leg_exposure
            ));
        }

        let combined_rate = self.config.span_rate + self.config.exposure_rate;
        let span_share = if combined_rate > 0.0 {
            self.config.span_rate / combined_rate
        } else {
            0.0
        };

        let mut hedge_benefit = 0.0;
        for (side, label) in [(OptionType::Call, "Call Spread"), (OptionType::Put, "Put Spread")] {
            let hedged = hedged_quantity(legs, side);
            if hedged == 0 {
                continue;
            }
            let credit = spot * hedged as f64 * lot * combined_rate * self.config.hedge_credit_rate;
            hedge_benefit += credit;
            span -= credit * span_share;
            exposure -= credit * (1.0 - span_share);
            debug!(side = %side, hedged, credit, "applied hedge credit");
            breakdown.push(format!("Hedge Benefit ({}): -₹{:.2}", label, credit));
        }

        let (total_margin, span_margin, exposure_margin) = if has_shorts {
            let span = span.max(0.0);
            let exposure = exposure.max(0.0);
            (span + exposure, span, exposure)
        } else {
            let due = net_premium.max(0.0);
            breakdown.push(format!("Net Premium to Pay: ₹{:.2}", due));
            (due, 0.0, 0.0)
        };

        Ok(MarginResult {
            total_margin,
            span_margin,
            exposure_margin,
            net_premium,
            hedge_benefit,
            breakdown,
        })
    }
}

/// Estimates margin with the default NIFTY-style configuration.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_core::types::OptionType;
/// use pricer_models::instruments::{StrategyLeg, TradeAction};
/// use pricer_risk::margin::calculate_margin;
///
/// let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
/// let legs = vec![StrategyLeg::new(OptionType::Put, TradeAction::Sell, 21_800.0, 90.0, 1, expiry).unwrap()];
///
/// let margin = calculate_margin(&legs, 22_000.0).unwrap();
/// // 12% + 3% of 22,000 × 50.
/// assert!((margin.total_margin - 165_000.0).abs() < 1e-6);
/// assert_eq!(margin.net_premium, -4_500.0);
/// ```
pub fn calculate_margin(legs: &[StrategyLeg], spot: f64) -> Result<MarginResult, RiskError> {
    MarginCalculator::default().calculate(legs, spot)
}

fn hedged_quantity(legs: &[StrategyLeg], side: OptionType) -> u32 {
    let total = |action: TradeAction| -> u32 {
        legs.iter()
            .filter(|l| l.option_type() == side && l.action() == action)
            .map(StrategyLeg::quantity)
            .sum()
    };
    total(TradeAction::Sell).min(total(TradeAction::Buy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    const SPOT: f64 = 22_000.0;

    fn leg(option_type: OptionType, action: TradeAction, strike: f64, premium: f64, qty: u32) -> StrategyLeg {
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
        StrategyLeg::new(option_type, action, strike, premium, qty, expiry).unwrap()
    }

    // ========================================
    // Naked and hedged shorts
    // ========================================

    #[test]
    fn test_naked_short_call() {
        let legs = vec![leg(OptionType::Call, TradeAction::Sell, 22_000.0, 100.0, 1)];
        let m = calculate_margin(&legs, SPOT).unwrap();

        assert_relative_eq!(m.span_margin, 132_000.0, epsilon = 1e-6);
        assert_relative_eq!(m.exposure_margin, 33_000.0, epsilon = 1e-6);
        assert_relative_eq!(m.total_margin, 165_000.0, epsilon = 1e-6);
        assert_eq!(m.net_premium, -5_000.0);
        assert_eq!(m.hedge_benefit, 0.0);
        assert_eq!(m.breakdown, vec!["Short CALL 22000: ~₹165000.00 margin".to_string()]);
    }

    #[test]
    fn test_bull_call_spread_credit() {
        let legs = vec![
            leg(OptionType::Call, TradeAction::Buy, 22_000.0, 150.0, 1),
            leg(OptionType::Call, TradeAction::Sell, 22_200.0, 80.0, 1),
        ];
        let m = calculate_margin(&legs, SPOT).unwrap();

        assert_relative_eq!(m.hedge_benefit, 115_500.0, epsilon = 1e-6);
        assert_relative_eq!(m.span_margin, 39_600.0, epsilon = 1e-6);
        assert_relative_eq!(m.exposure_margin, 9_900.0, epsilon = 1e-6);
        assert_relative_eq!(m.total_margin, 49_500.0, epsilon = 1e-6);
        assert_relative_eq!(m.net_premium, 3_500.0);
        assert_eq!(m.breakdown.len(), 2);
        assert!(m.breakdown[0].starts_with("Short CALL 22200"));
        assert!(m.breakdown[1].starts_with("Hedge Benefit (Call Spread): -₹"));
    }

    #[test]
    fn test_iron_condor_hedges_both_sides() {
        let legs = vec![
            leg(OptionType::Put, TradeAction::Buy, 21_500.0, 40.0, 1),
            leg(OptionType::Put, TradeAction::Sell, 21_800.0, 90.0, 1),
            leg(OptionType::Call, TradeAction::Sell, 22_200.0, 95.0, 1),
            leg(OptionType::Call, TradeAction::Buy, 22_500.0, 45.0, 1),
        ];
        let m = calculate_margin(&legs, SPOT).unwrap();

        assert_relative_eq!(m.hedge_benefit, 231_000.0, epsilon = 1e-6);
        assert_relative_eq!(m.total_margin, 99_000.0, epsilon = 1e-6);
        assert_relative_eq!(m.net_premium, -5_000.0);
        // Short calls are listed before short puts, then credits call side first.
        assert!(m.breakdown[0].starts_with("Short CALL"));
        assert!(m.breakdown[1].starts_with("Short PUT"));
        assert!(m.breakdown[2].contains("Call Spread"));
        assert!(m.breakdown[3].contains("Put Spread"));
    }

    #[test]
    fn test_hedge_limited_to_matched_quantity() {
        let legs = vec![
            leg(OptionType::Put, TradeAction::Sell, 21_800.0, 90.0, 2),
            leg(OptionType::Put, TradeAction::Buy, 21_500.0, 40.0, 1),
        ];
        let m = calculate_margin(&legs, SPOT).unwrap();
        // Naked 2 × 165,000 less one hedged unit's 70%.
        assert_relative_eq!(m.total_margin, 330_000.0 - 115_500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_long_calls_do_not_hedge_short_puts() {
        let legs = vec![
            leg(OptionType::Put, TradeAction::Sell, 21_800.0, 90.0, 1),
            leg(OptionType::Call, TradeAction::Buy, 22_200.0, 95.0, 1),
        ];
        let m = calculate_margin(&legs, SPOT).unwrap();
        assert_eq!(m.hedge_benefit, 0.0);
        assert_relative_eq!(m.total_margin, 165_000.0, epsilon = 1e-6);
    }

    // ========================================
    // Long-only strategies
    // ========================================

    #[test]
    fn test_long_straddle_pays_premium() {
        let legs = vec![
            leg(OptionType::Call, TradeAction::Buy, 22_000.0, 300.0, 1),
            leg(OptionType::Put, TradeAction::Buy, 22_000.0, 280.0, 1),
        ];
        let m = calculate_margin(&legs, SPOT).unwrap();

        assert_eq!(m.span_margin, 0.0);
        assert_eq!(m.exposure_margin, 0.0);
        assert_eq!(m.total_margin, m.net_premium);
        assert_eq!(m.total_margin, 29_000.0);
        assert_eq!(m.breakdown, vec!["Net Premium to Pay: ₹29000.00".to_string()]);
    }

    // ========================================
    // Validation
    // ========================================

    #[test]
    fn test_errors() {
        assert_eq!(calculate_margin(&[], SPOT), Err(RiskError::EmptyStrategy));

        let legs = vec![leg(OptionType::Call, TradeAction::Sell, 22_000.0, 100.0, 1)];
        assert_eq!(
            calculate_margin(&legs, 0.0),
            Err(RiskError::InvalidSpot { spot: 0.0 })
        );

        let calculator = MarginCalculator::new(MarginConfig {
            hedge_credit_rate: 1.5,
            ..MarginConfig::default()
        });
        assert!(matches!(
            calculator.calculate(&legs, SPOT),
            Err(RiskError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_custom_lot_size() {
        let calculator = MarginCalculator::new(MarginConfig {
            lot_size: 15,
            ..MarginConfig::default()
        });
        let legs = vec![leg(OptionType::Call, TradeAction::Sell, 48_000.0, 200.0, 1)];
        let m = calculator.calculate(&legs, 48_000.0).unwrap();
        assert_relative_eq!(m.total_margin, 48_000.0 * 15.0 * 0.15, epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn prop_margin_components_non_negative(
            specs in prop::collection::vec(
                (any::<bool>(), any::<bool>(), 20_000.0f64..24_000.0, 1.0f64..500.0, 1u32..5),
                1..6,
            ),
            spot in 20_000.0f64..24_000.0,
        ) {
            let legs: Vec<StrategyLeg> = specs
                .iter()
                .map(|&(is_call, is_buy, strike, premium, qty)| {
                    let option_type = if is_call { OptionType::Call } else { OptionType::Put };
                    let action = if is_buy { TradeAction::Buy } else { TradeAction::Sell };
                    leg(option_type, action, strike, premium, qty)
                })
                .collect();

            let m = calculate_margin(&legs, spot).unwrap();
            prop_assert!(m.total_margin >= 0.0);
            prop_assert!(m.span_margin >= 0.0);
            prop_assert!(m.exposure_margin >= 0.0);
            prop_assert!(m.hedge_benefit >= 0.0);
        }
    }
}
