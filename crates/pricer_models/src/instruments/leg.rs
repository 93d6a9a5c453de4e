//! Strategy legs.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use pricer_core::types::OptionType;

use super::error::InstrumentError;

/// Direction of a strategy leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TradeAction {
    /// Long the option (premium paid).
    #[cfg_attr(feature = "serde", serde(alias = "BUY"))]
    Buy,
    /// Short the option (premium received).
    #[cfg_attr(feature = "serde", serde(alias = "SELL"))]
    Sell,
}

impl TradeAction {
    /// +1 for buys, -1 for sells.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            TradeAction::Buy => 1.0,
            TradeAction::Sell => -1.0,
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" | "b" | "long" => Ok(TradeAction::Buy),
            "sell" | "s" | "short" => Ok(TradeAction::Sell),
            _ => Err(InstrumentError::UnknownAction(s.to_string())),
        }
    }
}

/// One leg of an option strategy.
///
/// Quantity is in lots; premium is per unit of underlying, as quoted.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_core::types::OptionType;
/// use pricer_models::instruments::{StrategyLeg, TradeAction};
///
/// let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
/// let leg = StrategyLeg::new(OptionType::Put, TradeAction::Buy, 21_800.0, 95.5, 2, expiry).unwrap();
/// assert_eq!(leg.signed_quantity(), 2.0);
///
/// assert!(StrategyLeg::new(OptionType::Put, TradeAction::Buy, 21_800.0, -1.0, 2, expiry).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StrategyLeg {
    option_type: OptionType,
    action: TradeAction,
    strike: f64,
    premium: f64,
    quantity: u32,
    expiry: NaiveDate,
}

impl StrategyLeg {
    /// Creates a validated leg.
    ///
    /// # Errors
    /// - `InstrumentError::InvalidStrike` if strike <= 0
    /// - `InstrumentError::InvalidPremium` if premium < 0 or not finite
    /// - `InstrumentError::InvalidQuantity` if quantity == 0
    pub fn new(
        option_type: OptionType,
        action: TradeAction,
        strike: f64,
        premium: f64,
        quantity: u32,
        expiry: NaiveDate,
    ) -> Result<Self, InstrumentError> {
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        if !(premium >= 0.0 && premium.is_finite()) {
            return Err(InstrumentError::InvalidPremium { premium });
        }
        if quantity == 0 {
            return Err(InstrumentError::InvalidQuantity { quantity });
        }

        Ok(Self {
            option_type,
            action,
            strike,
            premium,
            quantity,
            expiry,
        })
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Buy or sell.
    #[inline]
    pub fn action(&self) -> TradeAction {
        self.action
    }

    /// Strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Entry premium per unit.
    #[inline]
    pub fn premium(&self) -> f64 {
        self.premium
    }

    /// Quantity in lots.
    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Expiry date.
    #[inline]
    pub fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    /// Returns true for short legs.
    #[inline]
    pub fn is_short(&self) -> bool {
        self.action == TradeAction::Sell
    }

    /// Quantity signed by direction (+ for buys, - for sells).
    #[inline]
    pub fn signed_quantity(&self) -> f64 {
        self.action.sign() * self.quantity as f64
    }

    /// Profit per lot unit at expiry for an underlying settling at `underlying`.
    ///
    /// `(intrinsic - premium) × quantity`, negated for short legs.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use pricer_core::types::OptionType;
    /// use pricer_models::instruments::{StrategyLeg, TradeAction};
    ///
    /// let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
    /// let short_call = StrategyLeg::new(OptionType::Call, TradeAction::Sell, 100.0, 5.0, 1, expiry).unwrap();
    /// assert_eq!(short_call.expiry_pnl(90.0), 5.0);
    /// assert_eq!(short_call.expiry_pnl(110.0), -5.0);
    /// ```
    #[inline]
    pub fn expiry_pnl(&self, underlying: f64) -> f64 {
        let intrinsic = self.option_type.intrinsic(underlying, self.strike);
        self.signed_quantity() * (intrinsic - self.premium)
    }
}
