//! Put-call ratio.

use std::fmt;

use pricer_models::instruments::StrikeRow;

use crate::error::RiskError;

/// Contrarian sentiment read from the put-call ratio.
///
/// A high PCR means heavy put positioning, read as a possible bottom
/// (bullish); a low PCR is read as complacency (bearish).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PcrSignal {
    /// PCR above the bullish threshold.
    Bullish,
    /// PCR below the bearish threshold.
    Bearish,
    /// Anything in between.
    Neutral,
}

impl fmt::Display for PcrSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcrSignal::Bullish => write!(f, "bullish"),
            PcrSignal::Bearish => write!(f, "bearish"),
            PcrSignal::Neutral => write!(f, "neutral"),
        }
    }
}

/// Signal thresholds applied to the OI-based ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PcrThresholds {
    /// Ratio strictly above which the signal is bullish.
    pub bullish_above: f64,
    /// Ratio strictly below which the signal is bearish.
    pub bearish_below: f64,
}

impl Default for PcrThresholds {
    fn default() -> Self {
        Self {
            bullish_above: 1.2,
            bearish_below: 0.8,
        }
    }
}

impl PcrThresholds {
    /// Checks that `bearish_below <= bullish_above` and both are finite.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.bullish_above.is_finite()
            && self.bearish_below.is_finite()
            && self.bearish_below <= self.bullish_above
        {
            Ok(())
        } else {
            Err(RiskError::InvalidConfig(format!(
                "PCR thresholds must satisfy bearish_below <= bullish_above, got {} / {}",
                self.bearish_below, self.bullish_above
            )))
        }
    }
}

/// Put-call ratios and their reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcrResult {
    /// Σ put OI / Σ call OI, 0 when there is no call OI.
    pub pcr_by_oi: f64,
    /// Σ put volume / Σ call volume, 0 when there is no call volume.
    pub pcr_by_volume: f64,
    /// Signal derived from `pcr_by_oi`.
    pub signal: PcrSignal,
    /// Human-readable reading of the signal.
    pub interpretation: String,
}

/// Computes the put-call ratio with default thresholds (1.2 / 0.8).
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::instruments::{OptionQuote, StrikeRow};
/// use pricer_risk::chain::{calculate_pcr, PcrSignal};
///
/// let rows = vec![StrikeRow::new(
///     100.0,
///     Some(OptionQuote::new(100.0, OptionType::Call).with_open_interest(1_000)),
///     Some(OptionQuote::new(100.0, OptionType::Put).with_open_interest(1_500)),
/// )];
/// let pcr = calculate_pcr(&rows);
/// assert_eq!(pcr.pcr_by_oi, 1.5);
/// assert_eq!(pcr.signal, PcrSignal::Bullish);
/// ```
pub fn calculate_pcr(rows: &[StrikeRow]) -> PcrResult {
    calculate_pcr_with(rows, &PcrThresholds::default())
}

/// Computes the put-call ratio with explicit thresholds.
pub fn calculate_pcr_with(rows: &[StrikeRow], thresholds: &PcrThresholds) -> PcrResult {
    let (call_oi, put_oi, call_volume, put_volume) =
        rows.iter().fold((0u64, 0u64, 0u64, 0u64), |(co, po, cv, pv), row| {
            (
                co + row.call_oi(),
                po + row.put_oi(),
                cv + row.call_volume(),
                pv + row.put_volume(),
            )
        });

    let pcr_by_oi = ratio(put_oi, call_oi);
    let pcr_by_volume = ratio(put_volume, call_volume);

    let (signal, interpretation) = if pcr_by_oi > thresholds.bullish_above {
        (
            PcrSignal::Bullish,
            "High PCR - Possibly oversold, bullish contrarian signal",
        )
    } else if pcr_by_oi < thresholds.bearish_below {
        (
            PcrSignal::Bearish,
            "Low PCR - Possibly overbought, bearish contrarian signal",
        )
    } else {
        (PcrSignal::Neutral, "Neutral PCR - Balanced sentiment")
    };

    PcrResult {
        pcr_by_oi,
        pcr_by_volume,
        signal,
        interpretation: interpretation.to_string(),
    }
}

#[inline]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::OptionType;
    use pricer_models::instruments::OptionQuote;

    fn row(strike: f64, call: (u64, u64), put: (u64, u64)) -> StrikeRow {
        StrikeRow::new(
            strike,
            Some(
                OptionQuote::new(strike, OptionType::Call)
                    .with_open_interest(call.0)
                    .with_volume(call.1),
            ),
            Some(
                OptionQuote::new(strike, OptionType::Put)
                    .with_open_interest(put.0)
                    .with_volume(put.1),
            ),
        )
    }

    #[test]
    fn test_ratios() {
        let rows = vec![row(100.0, (400, 100), (300, 50)), row(110.0, (600, 100), (200, 150))];
        let pcr = calculate_pcr(&rows);
        assert_relative_eq!(pcr.pcr_by_oi, 0.5);
        assert_relative_eq!(pcr.pcr_by_volume, 1.0);
        assert_eq!(pcr.signal, PcrSignal::Bearish);
        assert_eq!(
            pcr.interpretation,
            "Low PCR - Possibly overbought, bearish contrarian signal"
        );
    }

    #[test]
    fn test_zero_call_oi_reports_zero() {
        let rows = vec![row(100.0, (0, 0), (500, 20))];
        let pcr = calculate_pcr(&rows);
        assert_eq!(pcr.pcr_by_oi, 0.0);
        assert_eq!(pcr.pcr_by_volume, 0.0);
    }

    #[test]
    fn test_empty_rows() {
        let pcr = calculate_pcr(&[]);
        assert_eq!(pcr.pcr_by_oi, 0.0);
        assert_eq!(pcr.signal, PcrSignal::Bearish);
    }

    #[test]
    fn test_threshold_boundaries_are_neutral() {
        let at_high = calculate_pcr(&[row(100.0, (1_000, 0), (1_200, 0))]);
        assert_eq!(at_high.signal, PcrSignal::Neutral);

        let at_low = calculate_pcr(&[row(100.0, (1_000, 0), (800, 0))]);
        assert_eq!(at_low.signal, PcrSignal::Neutral);
        assert_eq!(at_low.interpretation, "Neutral PCR - Balanced sentiment");
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = PcrThresholds {
            bullish_above: 1.0,
            bearish_below: 0.5,
        };
        assert!(thresholds.validate().is_ok());
        let pcr = calculate_pcr_with(&[row(100.0, (1_000, 0), (1_100, 0))], &thresholds);
        assert_eq!(pcr.signal, PcrSignal::Bullish);

        let inverted = PcrThresholds {
            bullish_above: 0.5,
            bearish_below: 1.0,
        };
        assert!(inverted.validate().is_err());
    }
}
