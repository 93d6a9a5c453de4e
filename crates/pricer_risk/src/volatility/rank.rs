//! IV rank and IV percentile.
//!
//! ```text
//! IV rank       = 100 × (current − low) / (high − low)     clamped to [0, 100]
//! IV percentile = 100 × #{h : h < current} / n
//! ```
//!
//! A flat history (`high == low`) carries no signal and ranks at 50.

use super::history::IvHistoryPoint;
use crate::error::RiskError;

/// Rank cut-offs for the interpretation text.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IvRankThresholds {
    /// Rank at or above which IV is very high.
    pub very_high: f64,
    /// Rank at or above which IV is elevated.
    pub elevated: f64,
    /// Rank at or above which IV is moderate.
    pub moderate: f64,
}

impl Default for IvRankThresholds {
    fn default() -> Self {
        Self {
            very_high: 75.0,
            elevated: 50.0,
            moderate: 25.0,
        }
    }
}

impl IvRankThresholds {
    /// Checks `0 <= moderate <= elevated <= very_high <= 100`.
    pub fn validate(&self) -> Result<(), RiskError> {
        let ordered = 0.0 <= self.moderate
            && self.moderate <= self.elevated
            && self.elevated <= self.very_high
            && self.very_high <= 100.0;
        if ordered {
            Ok(())
        } else {
            Err(RiskError::InvalidConfig(format!(
                "IV rank thresholds must be ordered within [0, 100], got {} / {} / {}",
                self.moderate, self.elevated, self.very_high
            )))
        }
    }

    fn interpret(&self, rank: f64) -> &'static str {
        if rank >= self.very_high {
            "Very High - Consider selling premium"
        } else if rank >= self.elevated {
            "Elevated - Favorable for premium selling"
        } else if rank >= self.moderate {
            "Moderate - Neutral conditions"
        } else {
            "Low - Consider buying options"
        }
    }
}

/// Where the current IV sits in its trailing history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvRankResult {
    /// Current implied volatility.
    pub current: f64,
    /// Rank in [0, 100].
    pub iv_rank: f64,
    /// Percentile in [0, 100].
    pub iv_percentile: f64,
    /// Highest IV in the window.
    pub high_52w: f64,
    /// Lowest IV in the window.
    pub low_52w: f64,
    /// Mean IV over the window.
    pub mean_52w: f64,
    /// Reading of the rank.
    pub interpretation: String,
}

/// IV rank with default thresholds (75 / 50 / 25).
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_risk::volatility::{calculate_iv_rank, IvHistoryPoint};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let history = vec![
///     IvHistoryPoint::new(day(1), 0.10),
///     IvHistoryPoint::new(day(2), 0.20),
///     IvHistoryPoint::new(day(3), 0.30),
/// ];
///
/// let result = calculate_iv_rank(&history, 0.25);
/// assert!((result.iv_rank - 75.0).abs() < 1e-9);
/// assert!((result.iv_percentile - 200.0 / 3.0).abs() < 1e-9);
/// assert_eq!(result.interpretation, "Very High - Consider selling premium");
/// ```
pub fn calculate_iv_rank(history: &[IvHistoryPoint], current_iv: f64) -> IvRankResult {
    calculate_iv_rank_with(history, current_iv, &IvRankThresholds::default())
}

/// IV rank with explicit thresholds.
pub fn calculate_iv_rank_with(
    history: &[IvHistoryPoint],
    current_iv: f64,
    thresholds: &IvRankThresholds,
) -> IvRankResult {
    if history.is_empty() {
        return IvRankResult {
            current: current_iv,
            iv_rank: 50.0,
            iv_percentile: 50.0,
            high_52w: current_iv,
            low_52w: current_iv,
            mean_52w: current_iv,
            interpretation: "Insufficient historical data".to_string(),
        };
    }

    let n = history.len() as f64;
    let high = history.iter().map(|p| p.iv).fold(f64::NEG_INFINITY, f64::max);
    let low = history.iter().map(|p| p.iv).fold(f64::INFINITY, f64::min);
    let mean = history.iter().map(|p| p.iv).sum::<f64>() / n;

    let range = high - low;
    let iv_rank = if range > 0.0 {
        (100.0 * (current_iv - low) / range).clamp(0.0, 100.0)
    } else {
        50.0
    };

    let below = history.iter().filter(|p| p.iv < current_iv).count() as f64;
    let iv_percentile = 100.0 * below / n;

    IvRankResult {
        current: current_iv,
        iv_rank,
        iv_percentile,
        high_52w: high,
        low_52w: low,
        mean_52w: mean,
        interpretation: thresholds.interpret(iv_rank).to_string(),
    }
}
