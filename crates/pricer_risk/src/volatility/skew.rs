//! Per-strike IV table, skew and moneyness buckets.

use std::fmt;

use pricer_core::types::{Moneyness, OptionType};
use pricer_models::instruments::{OptionChain, DEFAULT_FALLBACK_IV};

use crate::error::RiskError;

/// Call and put implied volatility at one strike.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeIvRecord {
    /// Strike price.
    pub strike: f64,
    /// Call IV (fallback 0.30 when the feed has none).
    pub call_iv: f64,
    /// Put IV (fallback 0.30 when the feed has none).
    pub put_iv: f64,
    /// `put_iv - call_iv`.
    pub iv_skew: f64,
    /// Call-side moneyness of the strike.
    pub moneyness: Moneyness,
}

impl StrikeIvRecord {
    /// Creates a record, deriving the skew.
    pub fn new(strike: f64, call_iv: f64, put_iv: f64, moneyness: Moneyness) -> Self {
        Self {
            strike,
            call_iv,
            put_iv,
            iv_skew: put_iv - call_iv,
            moneyness,
        }
    }
}

/// Builds the strike IV table for a chain.
///
/// Moneyness is the call-side classification, so every subsystem buckets
/// strikes identically.
pub fn build_strike_iv_table(chain: &OptionChain) -> Vec<StrikeIvRecord> {
    let spot = chain.spot();
    chain
        .rows()
        .iter()
        .map(|row| {
            StrikeIvRecord::new(
                row.strike,
                row.call_iv_or(DEFAULT_FALLBACK_IV),
                row.put_iv_or(DEFAULT_FALLBACK_IV),
                Moneyness::classify(spot, row.strike, OptionType::Call),
            )
        })
        .collect()
}

/// Mean straddle IV across ATM strikes, or 0.30 if none are ATM.
pub fn atm_implied_vol(table: &[StrikeIvRecord]) -> f64 {
    let atm: Vec<f64> = table
        .iter()
        .filter(|r| r.moneyness == Moneyness::Atm)
        .map(|r| 0.5 * (r.call_iv + r.put_iv))
        .collect();

    if atm.is_empty() {
        DEFAULT_FALLBACK_IV
    } else {
        atm.iter().sum::<f64>() / atm.len() as f64
    }
}

/// Direction of the average skew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkewBias {
    /// Puts richer than calls.
    PutSkew,
    /// Calls richer than puts.
    CallSkew,
    /// No significant skew.
    Balanced,
}

impl fmt::Display for SkewBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkewBias::PutSkew => write!(f, "put skew"),
            SkewBias::CallSkew => write!(f, "call skew"),
            SkewBias::Balanced => write!(f, "balanced"),
        }
    }
}

/// Average-skew cut-offs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkewThresholds {
    /// Average skew strictly above which puts are considered rich.
    pub put_skew: f64,
    /// Average skew strictly below which calls are considered rich.
    pub call_skew: f64,
}

impl Default for SkewThresholds {
    fn default() -> Self {
        Self {
            put_skew: 0.05,
            call_skew: -0.05,
        }
    }
}

impl SkewThresholds {
    /// Checks `call_skew <= put_skew`.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.call_skew.is_finite() && self.put_skew.is_finite() && self.call_skew <= self.put_skew {
            Ok(())
        } else {
            Err(RiskError::InvalidConfig(format!(
                "skew thresholds must satisfy call_skew <= put_skew, got {} / {}",
                self.call_skew, self.put_skew
            )))
        }
    }
}

/// Put-minus-call skew across the table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvSkewResult {
    /// Mean skew.
    pub avg_skew: f64,
    /// Largest skew.
    pub max_skew: f64,
    /// Smallest skew.
    pub min_skew: f64,
    /// Reading of the mean skew.
    pub interpretation: String,
    /// Direction of the mean skew.
    pub bias: SkewBias,
}

/// Skew with default thresholds (±0.05).
///
/// # Examples
/// ```
/// use pricer_core::types::Moneyness;
/// use pricer_risk::volatility::{calculate_iv_skew, SkewBias, StrikeIvRecord};
///
/// let table = vec![
///     StrikeIvRecord::new(21_800.0, 0.14, 0.22, Moneyness::Itm),
///     StrikeIvRecord::new(22_000.0, 0.15, 0.21, Moneyness::Atm),
/// ];
/// let skew = calculate_iv_skew(&table);
/// assert_eq!(skew.bias, SkewBias::PutSkew);
/// assert!((skew.avg_skew - 0.07).abs() < 1e-12);
/// ```
pub fn calculate_iv_skew(table: &[StrikeIvRecord]) -> IvSkewResult {
    calculate_iv_skew_with(table, &SkewThresholds::default())
}

/// Skew with explicit thresholds.
pub fn calculate_iv_skew_with(table: &[StrikeIvRecord], thresholds: &SkewThresholds) -> IvSkewResult {
    if table.is_empty() {
        return IvSkewResult {
            avg_skew: 0.0,
            max_skew: 0.0,
            min_skew: 0.0,
            interpretation: "No data available".to_string(),
            bias: SkewBias::Balanced,
        };
    }

    let avg_skew = table.iter().map(|r| r.iv_skew).sum::<f64>() / table.len() as f64;
    let max_skew = table.iter().map(|r| r.iv_skew).fold(f64::NEG_INFINITY, f64::max);
    let min_skew = table.iter().map(|r| r.iv_skew).fold(f64::INFINITY, f64::min);

    let (bias, interpretation) = if avg_skew > thresholds.put_skew {
        (
            SkewBias::PutSkew,
            "Put skew present - Market shows fear/hedging demand",
        )
    } else if avg_skew < thresholds.call_skew {
        (SkewBias::CallSkew, "Call skew present - Bullish sentiment")
    } else {
        (SkewBias::Balanced, "Balanced - No significant skew")
    };

    IvSkewResult {
        avg_skew,
        max_skew,
        min_skew,
        interpretation: interpretation.to_string(),
        bias,
    }
}

/// Mean call and put IV within one moneyness bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoneynessBucket {
    /// Mean call IV, 0 for an empty bucket.
    pub avg_call_iv: f64,
    /// Mean put IV, 0 for an empty bucket.
    pub avg_put_iv: f64,
    /// Strikes in the bucket.
    pub count: usize,
}

/// IV by moneyness bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoneynessIvBreakdown {
    /// In-the-money strikes.
    pub itm: MoneynessBucket,
    /// At-the-money strikes.
    pub atm: MoneynessBucket,
    /// Out-of-the-money strikes.
    pub otm: MoneynessBucket,
}

/// Partitions the table by moneyness and averages each side's IV.
pub fn analyze_iv_by_moneyness(table: &[StrikeIvRecord]) -> MoneynessIvBreakdown {
    let bucket = |moneyness: Moneyness| {
        let (sum_call, sum_put, count) = table
            .iter()
            .filter(|r| r.moneyness == moneyness)
            .fold((0.0, 0.0, 0usize), |(c, p, n), r| (c + r.call_iv, p + r.put_iv, n + 1));

        if count == 0 {
            MoneynessBucket::default()
        } else {
            MoneynessBucket {
                avg_call_iv: sum_call / count as f64,
                avg_put_iv: sum_put / count as f64,
                count,
            }
        }
    };

    MoneynessIvBreakdown {
        itm: bucket(Moneyness::Itm),
        atm: bucket(Moneyness::Atm),
        otm: bucket(Moneyness::Otm),
    }
}
