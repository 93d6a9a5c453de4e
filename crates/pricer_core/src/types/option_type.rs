//! Call/put side of a vanilla option.

use std::fmt;
use std::str::FromStr;

use super::error::PricingError;

/// Side of a vanilla European option.
///
/// Parses from the common exchange spellings (`call`/`ce`, `put`/`pe`),
/// case-insensitively.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
///
/// let side: OptionType = "CE".parse().unwrap();
/// assert_eq!(side, OptionType::Call);
/// assert_eq!(side.to_string(), "CALL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy at the strike.
    #[cfg_attr(feature = "serde", serde(alias = "CALL", alias = "CE", alias = "ce"))]
    Call,
    /// Right to sell at the strike.
    #[cfg_attr(feature = "serde", serde(alias = "PUT", alias = "PE", alias = "pe"))]
    Put,
}

impl OptionType {
    /// Returns true for calls.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Intrinsic value at the given underlying level.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::OptionType;
    ///
    /// assert_eq!(OptionType::Call.intrinsic(105.0, 100.0), 5.0);
    /// assert_eq!(OptionType::Put.intrinsic(105.0, 100.0), 0.0);
    /// ```
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "CALL"),
            OptionType::Put => write!(f, "PUT"),
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" | "ce" | "c" => Ok(OptionType::Call),
            "put" | "pe" | "p" => Ok(OptionType::Put),
            _ => Err(PricingError::InvalidInput(format!(
                "Unknown option type: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!("PE".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("Put".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
    }

    #[test]
    fn test_display_roundtrip() {
        for side in [OptionType::Call, OptionType::Put] {
            assert_eq!(side.to_string().parse::<OptionType>().unwrap(), side);
        }
    }
}
