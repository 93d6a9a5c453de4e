//! Max pain: the expiry price at which option writers pay out the least.

use pricer_models::instruments::StrikeRow;

use crate::error::RiskError;

/// Total writer payout if the underlying expires at `strike`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikePain {
    /// Candidate expiry price.
    pub strike: f64,
    /// Sum of call and put intrinsic value times open interest.
    pub pain: f64,
}

/// Max pain over a strike ladder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxPainResult {
    /// Strike with the lowest total pain.
    pub max_pain_strike: f64,
    /// Pain at `max_pain_strike`.
    pub total_pain: f64,
    /// Pain at every candidate strike, in ladder order.
    pub pain_by_strike: Vec<StrikePain>,
}

/// Computes max pain by trying every listed strike as the expiry price.
///
/// For candidate `K`, each strike `S` contributes `(K - S) × callOI(S)` when
/// `K > S` and `(S - K) × putOI(S)` when `K < S`. The scan is a full
/// O(n²) double loop; ties keep the first strike encountered.
///
/// # Errors
/// `RiskError::EmptyChain` if `rows` is empty.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{OptionQuote, StrikeRow};
/// use pricer_core::types::OptionType;
/// use pricer_risk::chain::calculate_max_pain;
///
/// let row = |k: f64, call_oi: u64, put_oi: u64| StrikeRow::new(
///     k,
///     Some(OptionQuote::new(k, OptionType::Call).with_open_interest(call_oi)),
///     Some(OptionQuote::new(k, OptionType::Put).with_open_interest(put_oi)),
/// );
/// let rows = vec![row(100.0, 0, 500), row(110.0, 300, 300), row(120.0, 500, 0)];
///
/// let result = calculate_max_pain(&rows).unwrap();
/// assert_eq!(result.max_pain_strike, 110.0);
/// assert_eq!(result.pain_by_strike.len(), 3);
/// ```
pub fn calculate_max_pain(rows: &[StrikeRow]) -> Result<MaxPainResult, RiskError> {
    if rows.is_empty() {
        return Err(RiskError::EmptyChain);
    }

    let mut pain_by_strike = Vec::with_capacity(rows.len());
    let mut best = StrikePain {
        strike: rows[0].strike,
        pain: f64::INFINITY,
    };

    for candidate in rows {
        let expiry_price = candidate.strike;
        let mut pain = 0.0;

        for row in rows {
            if expiry_price > row.strike {
                pain += (expiry_price - row.strike) * row.call_oi() as f64;
            }
            if expiry_price < row.strike {
                pain += (row.strike - expiry_price) * row.put_oi() as f64;
            }
        }

        let point = StrikePain {
            strike: expiry_price,
            pain,
        };
        if pain < best.pain {
            best = point;
        }
        pain_by_strike.push(point);
    }

    Ok(MaxPainResult {
        max_pain_strike: best.strike,
        total_pain: best.pain,
        pain_by_strike,
    })
}
