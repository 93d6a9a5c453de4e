//! Unusual open-interest activity scanner.
//!
//! Each quote's session OI change is read by side: OI added on calls is
//! call writing (short buildup, resistance), OI added on puts is put writing
//! (long buildup, support), and the reverse for OI removed.

use std::fmt;

use pricer_core::types::OptionType;
use pricer_models::instruments::{OptionChain, OptionQuote};
use rayon::prelude::*;

use crate::error::RiskError;

/// Classification of a significant OI change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityType {
    /// Puts written.
    LongBuildup,
    /// Calls written.
    ShortBuildup,
    /// Call writers exiting.
    ShortCovering,
    /// Put writers exiting.
    LongUnwinding,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityType::LongBuildup => "Long Buildup",
            ActivityType::ShortBuildup => "Short Buildup",
            ActivityType::ShortCovering => "Short Covering",
            ActivityType::LongUnwinding => "Long Unwinding",
        };
        write!(f, "{}", label)
    }
}

/// Strength of an activity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalStrength {
    /// Passed the minimum filters only.
    Low,
    /// OI change above the medium threshold.
    Medium,
    /// Large OI change on heavy volume.
    High,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalStrength::Low => "Low",
            SignalStrength::Medium => "Medium",
            SignalStrength::High => "High",
        };
        write!(f, "{}", label)
    }
}

/// Scanner filters and strength cut-offs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActivityThresholds {
    /// Quotes trading fewer contracts are ignored.
    pub min_volume: u64,
    /// Quotes whose |OI change| is smaller are ignored.
    pub min_oi_change: u64,
    /// |OI change %| above which a signal is at least Medium.
    pub medium_change_pct: f64,
    /// |OI change %| above which (with volume over twice the minimum) a signal is High.
    pub high_change_pct: f64,
    /// Only strikes within this fraction of spot are scanned.
    pub strike_range_pct: f64,
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            min_volume: 50_000,
            min_oi_change: 10_000,
            medium_change_pct: 10.0,
            high_change_pct: 20.0,
            strike_range_pct: 0.05,
        }
    }
}

impl ActivityThresholds {
    /// Checks the percentage cut-offs are ordered and the range is positive.
    pub fn validate(&self) -> Result<(), RiskError> {
        if !(self.medium_change_pct >= 0.0 && self.medium_change_pct <= self.high_change_pct) {
            return Err(RiskError::InvalidConfig(format!(
                "activity cut-offs must satisfy 0 <= medium <= high, got {} / {}",
                self.medium_change_pct, self.high_change_pct
            )));
        }
        if !(self.strike_range_pct > 0.0 && self.strike_range_pct.is_finite()) {
            return Err(RiskError::InvalidConfig(format!(
                "strike_range_pct must be positive, got {}",
                self.strike_range_pct
            )));
        }
        Ok(())
    }
}

/// One unusual-activity hit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivitySignal {
    /// Strike of the quote.
    pub strike: f64,
    /// Side of the quote.
    pub option_type: OptionType,
    /// Last traded price.
    pub last_price: f64,
    /// Current open interest.
    pub open_interest: u64,
    /// OI change relative to the previous session's OI, in percent.
    pub oi_change_pct: f64,
    /// Session volume.
    pub volume: u64,
    /// Activity classification.
    pub activity: ActivityType,
    /// Signal strength.
    pub strength: SignalStrength,
}

impl ActivitySignal {
    /// Ranking score: volume × |OI change %|.
    pub fn score(&self) -> f64 {
        self.volume as f64 * self.oi_change_pct.abs()
    }
}

/// Activity hit tagged with the chain's symbol.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolActivity {
    /// Underlying symbol of the chain.
    pub symbol: String,
    /// The hit.
    pub signal: ActivitySignal,
}

/// Scanner bound to a set of thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityScanner {
    thresholds: ActivityThresholds,
}

impl ActivityScanner {
    /// Creates a scanner.
    pub fn new(thresholds: ActivityThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> &ActivityThresholds {
        &self.thresholds
    }

    /// Classifies one quote, or `None` if it fails the volume or OI filters.
    pub fn classify(&self, quote: &OptionQuote) -> Option<ActivitySignal> {
        let t = &self.thresholds;
        if quote.volume < t.min_volume || quote.open_interest_change.unsigned_abs() < t.min_oi_change {
            return None;
        }

        let change = quote.open_interest_change;
        let previous_oi = quote.open_interest as i64 - change;
        // All of today's OI is new when there was none before.
        let oi_change_pct = if previous_oi > 0 {
            change as f64 / previous_oi as f64 * 100.0
        } else {
            100.0
        };

        let activity = match (change > 0, quote.option_type) {
            (true, OptionType::Call) => ActivityType::ShortBuildup,
            (true, OptionType::Put) => ActivityType::LongBuildup,
            (false, OptionType::Call) => ActivityType::ShortCovering,
            (false, OptionType::Put) => ActivityType::LongUnwinding,
        };

        let magnitude = oi_change_pct.abs();
        let strength = if magnitude > t.high_change_pct && quote.volume > t.min_volume * 2 {
            SignalStrength::High
        } else if magnitude > t.medium_change_pct {
            SignalStrength::Medium
        } else {
            SignalStrength::Low
        };

        Some(ActivitySignal {
            strike: quote.strike,
            option_type: quote.option_type,
            last_price: quote.last_price,
            open_interest: quote.open_interest,
            oi_change_pct,
            volume: quote.volume,
            activity,
            strength,
        })
    }

    /// Scans both sides of every strike near spot, strongest score first.
    pub fn scan(&self, chain: &OptionChain) -> Vec<ActivitySignal> {
        let spot = chain.spot();
        let mut hits: Vec<ActivitySignal> = chain
            .rows()
            .iter()
            .filter(|row| (row.strike - spot).abs() / spot <= self.thresholds.strike_range_pct)
            .flat_map(|row| [row.call.as_ref(), row.put.as_ref()])
            .flatten()
            .filter_map(|quote| self.classify(quote))
            .collect();

        hits.sort_by(|a, b| b.score().total_cmp(&a.score()));
        hits
    }

    /// Scans several chains in parallel and merges the hits, strongest first.
    pub fn scan_many(&self, chains: &[OptionChain]) -> Vec<SymbolActivity> {
        let mut hits: Vec<SymbolActivity> = chains
            .par_iter()
            .flat_map_iter(|chain| {
                self.scan(chain).into_iter().map(move |signal| SymbolActivity {
                    symbol: chain.symbol().to_string(),
                    signal,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.signal.score().total_cmp(&a.signal.score()));
        hits
    }
}

/// Classifies one quote with default thresholds.
pub fn classify_activity(quote: &OptionQuote) -> Option<ActivitySignal> {
    ActivityScanner::default().classify(quote)
}

/// Scans a chain with default thresholds.
pub fn scan_chain(chain: &OptionChain) -> Vec<ActivitySignal> {
    ActivityScanner::default().scan(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use pricer_models::instruments::StrikeRow;

    fn quote(strike: f64, option_type: OptionType, oi: u64, change: i64, volume: u64) -> OptionQuote {
        OptionQuote::new(strike, option_type)
            .with_open_interest(oi)
            .with_open_interest_change(change)
            .with_volume(volume)
    }

    #[test]
    fn test_filters() {
        assert!(classify_activity(&quote(22_000.0, OptionType::Call, 200_000, 50_000, 49_999)).is_none());
        assert!(classify_activity(&quote(22_000.0, OptionType::Call, 200_000, 9_999, 90_000)).is_none());
        assert!(classify_activity(&quote(22_000.0, OptionType::Call, 200_000, -9_999, 90_000)).is_none());
    }

    #[test]
    fn test_activity_by_side() {
        let cases = [
            (OptionType::Call, 20_000, ActivityType::ShortBuildup),
            (OptionType::Put, 20_000, ActivityType::LongBuildup),
            (OptionType::Call, -20_000, ActivityType::ShortCovering),
            (OptionType::Put, -20_000, ActivityType::LongUnwinding),
        ];
        for (side, change, expected) in cases {
            let signal = classify_activity(&quote(22_000.0, side, 200_000, change, 60_000)).unwrap();
            assert_eq!(signal.activity, expected);
        }
    }

    #[test]
    fn test_change_pct_against_previous_oi() {
        // Previous OI 100k, +25k.
        let signal = classify_activity(&quote(22_000.0, OptionType::Put, 125_000, 25_000, 60_000)).unwrap();
        assert_relative_eq!(signal.oi_change_pct, 25.0);
        assert_eq!(signal.strength, SignalStrength::Medium);

        let heavy = classify_activity(&quote(22_000.0, OptionType::Put, 125_000, 25_000, 100_001)).unwrap();
        assert_eq!(heavy.strength, SignalStrength::High);

        // Previous OI 200k, -15k: 7.5%.
        let small = classify_activity(&quote(22_000.0, OptionType::Call, 185_000, -15_000, 200_000)).unwrap();
        assert_relative_eq!(small.oi_change_pct, -7.5);
        assert_eq!(small.strength, SignalStrength::Low);
    }

    #[test]
    fn test_fresh_open_interest() {
        let signal = classify_activity(&quote(22_000.0, OptionType::Call, 30_000, 30_000, 60_000)).unwrap();
        assert_eq!(signal.oi_change_pct, 100.0);
    }

    #[test]
    fn test_scan_orders_by_score_and_filters_range() {
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
        let rows = vec![
            StrikeRow::new(
                21_900.0,
                Some(quote(21_900.0, OptionType::Call, 110_000, 10_000, 60_000)),
                Some(quote(21_900.0, OptionType::Put, 150_000, 50_000, 80_000)),
            ),
            StrikeRow::new(
                22_000.0,
                Some(quote(22_000.0, OptionType::Call, 120_000, 20_000, 70_000)),
                None,
            ),
            // More than 5% from spot.
            StrikeRow::new(
                24_000.0,
                Some(quote(24_000.0, OptionType::Call, 400_000, 200_000, 900_000)),
                None,
            ),
        ];
        let chain = OptionChain::new("NIFTY", expiry, 22_000.0, rows).unwrap();

        let hits = scan_chain(&chain);
        assert_eq!(hits.len(), 3);
        // Scores: put 21900 = 80k × 50, call 22000 = 70k × 20, call 21900 = 60k × 10.
        assert_eq!(hits[0].strike, 21_900.0);
        assert_eq!(hits[0].option_type, OptionType::Put);
        assert_eq!(hits[1].strike, 22_000.0);
        assert_eq!(hits[2].option_type, OptionType::Call);
        assert!(hits.windows(2).all(|w| w[0].score() >= w[1].score()));
    }

    #[test]
    fn test_scan_many_merges_symbols() {
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
        let chain = |symbol: &str, spot: f64, volume: u64| {
            let rows = vec![StrikeRow::new(
                spot,
                Some(quote(spot, OptionType::Call, 150_000, 50_000, volume)),
                None,
            )];
            OptionChain::new(symbol, expiry, spot, rows).unwrap()
        };
        let chains = vec![chain("NIFTY", 22_000.0, 60_000), chain("BANKNIFTY", 48_000.0, 90_000)];

        let hits = ActivityScanner::default().scan_many(&chains);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].symbol, "BANKNIFTY");
        assert_eq!(hits[1].symbol, "NIFTY");
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ActivityThresholds::default().validate().is_ok());
        let bad = ActivityThresholds {
            medium_change_pct: 30.0,
            ..ActivityThresholds::default()
        };
        assert!(bad.validate().is_err());
    }
}
