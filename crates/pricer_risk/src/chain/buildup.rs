//! Open-interest buildup and unwinding between two chain snapshots.

use pricer_models::instruments::{OptionChain, StrikeRow};

use crate::error::RiskError;

/// Heuristic thresholds for buildup detection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildupThresholds {
    /// OI increase, as a fraction of previous OI, that counts as buildup.
    pub oi_increase_pct: f64,
    /// Minimum volume / current OI for a buildup to count.
    pub volume_oi_ratio: f64,
    /// OI decrease, as a fraction of previous OI, that counts as unwinding.
    pub unwinding_pct: f64,
}

impl Default for BuildupThresholds {
    fn default() -> Self {
        Self {
            oi_increase_pct: 0.10,
            volume_oi_ratio: 0.10,
            unwinding_pct: 0.05,
        }
    }
}

impl BuildupThresholds {
    /// Checks every threshold is finite and non-negative.
    pub fn validate(&self) -> Result<(), RiskError> {
        let values = [self.oi_increase_pct, self.volume_oi_ratio, self.unwinding_pct];
        if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
            Ok(())
        } else {
            Err(RiskError::InvalidConfig(
                "buildup thresholds must be finite and non-negative".to_string(),
            ))
        }
    }
}

/// What happened to one side's open interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SideActivity {
    /// No significant change.
    #[default]
    None,
    /// Significant OI added on meaningful volume.
    LongBuildup,
    /// Significant OI removed.
    Unwinding,
}

/// Buildup reading for one strike.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildupSignal {
    /// Strike of the row.
    pub strike: f64,
    /// Call side activity.
    pub call: SideActivity,
    /// Put side activity.
    pub put: SideActivity,
    /// Human-readable signals, call side first.
    pub signals: Vec<String>,
}

impl BuildupSignal {
    fn quiet(strike: f64) -> Self {
        Self {
            strike,
            call: SideActivity::None,
            put: SideActivity::None,
            signals: Vec::new(),
        }
    }

    /// Whether either side shows activity.
    pub fn is_active(&self) -> bool {
        self.call != SideActivity::None || self.put != SideActivity::None
    }
}

/// Detects buildup with default thresholds (10% / 0.1 / 5%).
///
/// Without a previous snapshot nothing is flagged.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::instruments::{OptionQuote, StrikeRow};
/// use pricer_risk::chain::{detect_buildup, SideActivity};
///
/// let call = |oi: u64, vol: u64| Some(OptionQuote::new(100.0, OptionType::Call).with_open_interest(oi).with_volume(vol));
/// let previous = StrikeRow::new(100.0, call(1_000, 0), None);
/// let current = StrikeRow::new(100.0, call(1_200, 500), None);
///
/// let signal = detect_buildup(&current, Some(&previous));
/// assert_eq!(signal.call, SideActivity::LongBuildup);
/// assert_eq!(signal.signals, vec!["Long Call Buildup - Bullish".to_string()]);
/// ```
pub fn detect_buildup(current: &StrikeRow, previous: Option<&StrikeRow>) -> BuildupSignal {
    detect_buildup_with(current, previous, &BuildupThresholds::default())
}

/// Detects buildup with explicit thresholds.
pub fn detect_buildup_with(
    current: &StrikeRow,
    previous: Option<&StrikeRow>,
    thresholds: &BuildupThresholds,
) -> BuildupSignal {
    let Some(previous) = previous else {
        return BuildupSignal::quiet(current.strike);
    };

    let call = classify_side(
        current.call_oi(),
        current.call_volume(),
        previous.call_oi(),
        thresholds,
    );
    let put = classify_side(
        current.put_oi(),
        current.put_volume(),
        previous.put_oi(),
        thresholds,
    );

    let mut signals = Vec::new();
    if call == SideActivity::LongBuildup {
        signals.push("Long Call Buildup - Bullish".to_string());
    }
    if put == SideActivity::LongBuildup {
        signals.push("Long Put Buildup - Bearish".to_string());
    }
    if call == SideActivity::Unwinding {
        signals.push("Call Unwinding".to_string());
    }
    if put == SideActivity::Unwinding {
        signals.push("Put Unwinding".to_string());
    }

    BuildupSignal {
        strike: current.strike,
        call,
        put,
        signals,
    }
}

/// Compares two snapshots row by row (matched on strike) and returns the
/// active strikes in ladder order.
pub fn detect_chain_buildup(
    current: &OptionChain,
    previous: &OptionChain,
    thresholds: &BuildupThresholds,
) -> Vec<BuildupSignal> {
    current
        .rows()
        .iter()
        .map(|row| detect_buildup_with(row, previous.row(row.strike), thresholds))
        .filter(BuildupSignal::is_active)
        .collect()
}

fn classify_side(
    oi: u64,
    volume: u64,
    previous_oi: u64,
    thresholds: &BuildupThresholds,
) -> SideActivity {
    let change = oi as f64 - previous_oi as f64;
    let previous_oi = previous_oi as f64;
    let volume_ratio = if oi > 0 {
        volume as f64 / oi as f64
    } else {
        0.0
    };

    if change > 0.0
        && volume_ratio > thresholds.volume_oi_ratio
        && change > previous_oi * thresholds.oi_increase_pct
    {
        SideActivity::LongBuildup
    } else if change < -previous_oi * thresholds.unwinding_pct {
        SideActivity::Unwinding
    } else {
        SideActivity::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
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
    fn test_no_previous_snapshot() {
        let signal = detect_buildup(&row(100.0, (5_000, 5_000), (5_000, 5_000)), None);
        assert!(!signal.is_active());
        assert!(signal.signals.is_empty());
    }

    #[test]
    fn test_put_buildup_and_call_unwinding() {
        let previous = row(100.0, (1_000, 0), (1_000, 0));
        let current = row(100.0, (900, 10), (1_500, 400));

        let signal = detect_buildup(&current, Some(&previous));
        assert_eq!(signal.call, SideActivity::Unwinding);
        assert_eq!(signal.put, SideActivity::LongBuildup);
        assert_eq!(
            signal.signals,
            vec!["Long Put Buildup - Bearish".to_string(), "Call Unwinding".to_string()]
        );
    }

    #[test]
    fn test_buildup_needs_volume() {
        let previous = row(100.0, (1_000, 0), (1_000, 0));
        // 50% more OI, but volume / OI = 0.05.
        let current = row(100.0, (1_500, 75), (1_000, 0));
        let signal = detect_buildup(&current, Some(&previous));
        assert_eq!(signal.call, SideActivity::None);
    }

    #[test]
    fn test_small_changes_are_quiet() {
        let previous = row(100.0, (1_000, 0), (1_000, 0));
        // +10% exactly and -5% exactly do not trigger.
        let current = row(100.0, (1_100, 500), (950, 0));
        let signal = detect_buildup(&current, Some(&previous));
        assert!(!signal.is_active());
    }

    #[test]
    fn test_chain_buildup_matches_by_strike() {
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
        let previous = OptionChain::new(
            "NIFTY",
            expiry,
            100.0,
            vec![row(100.0, (1_000, 0), (1_000, 0)), row(110.0, (1_000, 0), (1_000, 0))],
        )
        .unwrap();
        let current = OptionChain::new(
            "NIFTY",
            expiry,
            100.0,
            vec![
                row(100.0, (1_000, 0), (1_000, 0)),
                row(110.0, (2_000, 800), (1_000, 0)),
                row(120.0, (9_000, 9_000), (0, 0)),
            ],
        )
        .unwrap();

        let signals = detect_chain_buildup(&current, &previous, &BuildupThresholds::default());
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].strike, 110.0);
        assert_eq!(signals[0].call, SideActivity::LongBuildup);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(BuildupThresholds::default().validate().is_ok());
        let bad = BuildupThresholds {
            unwinding_pct: -0.1,
            ..BuildupThresholds::default()
        };
        assert!(bad.validate().is_err());
    }
}
