//! Support and resistance from open interest concentration.

use pricer_models::instruments::StrikeRow;

/// Number of strikes reported on each side.
pub const LEVEL_COUNT: usize = 3;

/// OI-implied price levels, heaviest first.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportResistance {
    /// Strikes with the largest put OI.
    pub support: Vec<f64>,
    /// Strikes with the largest call OI.
    pub resistance: Vec<f64>,
}

/// Top [`LEVEL_COUNT`] strikes by put OI (support) and call OI (resistance).
///
/// Equal OI keeps ladder order.
pub fn support_resistance(rows: &[StrikeRow]) -> SupportResistance {
    SupportResistance {
        support: top_strikes(rows, StrikeRow::put_oi),
        resistance: top_strikes(rows, StrikeRow::call_oi),
    }
}

fn top_strikes(rows: &[StrikeRow], oi: fn(&StrikeRow) -> u64) -> Vec<f64> {
    let mut ranked: Vec<&StrikeRow> = rows.iter().collect();
    ranked.sort_by(|a, b| oi(b).cmp(&oi(a)));
    ranked.into_iter().take(LEVEL_COUNT).map(|r| r.strike).collect()
}
