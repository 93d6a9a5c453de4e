//! Moneyness classification.
//!
//! Every subsystem that labels a strike as ITM/ATM/OTM (chain views, IV
//! analytics, scanners) goes through [`Moneyness::classify`] so the band
//! threshold lives in exactly one place.

use std::fmt;

use super::option_type::OptionType;

/// Half-width of the at-the-money band as a fraction of spot (0.5%).
pub const ATM_BAND: f64 = 0.005;

/// Position of a strike relative to the underlying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Moneyness {
    /// In the money
    Itm,
    /// At the money
    Atm,
    /// Out of the money
    Otm,
}

impl Moneyness {
    /// Classifies a strike against spot.
    ///
    /// A strike is ATM when `|spot - strike| < 0.5% · spot`. Outside the band
    /// a call is ITM when spot is above the strike, and a put is ITM when spot
    /// is below it.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::{Moneyness, OptionType};
    ///
    /// assert_eq!(Moneyness::classify(22_000.0, 22_050.0, OptionType::Call), Moneyness::Atm);
    /// assert_eq!(Moneyness::classify(22_000.0, 21_000.0, OptionType::Call), Moneyness::Itm);
    /// assert_eq!(Moneyness::classify(22_000.0, 21_000.0, OptionType::Put), Moneyness::Otm);
    /// ```
    pub fn classify(spot: f64, strike: f64, option_type: OptionType) -> Self {
        if (spot - strike).abs() < ATM_BAND * spot {
            return Moneyness::Atm;
        }

        let call_itm = strike < spot;
        match (option_type, call_itm) {
            (OptionType::Call, true) | (OptionType::Put, false) => Moneyness::Itm,
            _ => Moneyness::Otm,
        }
    }
}

impl fmt::Display for Moneyness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moneyness::Itm => write!(f, "ITM"),
            Moneyness::Atm => write!(f, "ATM"),
            Moneyness::Otm => write!(f, "OTM"),
        }
    }
}
