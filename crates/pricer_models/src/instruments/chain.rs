//! Strike ladder for one symbol and expiry.

use chrono::NaiveDate;
use pricer_core::types::OptionType;

use super::error::InstrumentError;
use super::quote::OptionQuote;

/// Call and put quotes sharing one strike.
///
/// Either side may be missing; the accessors report zero open interest and
/// volume for an absent side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeRow {
    /// Strike price.
    pub strike: f64,
    /// Call side.
    #[cfg_attr(feature = "serde", serde(default))]
    pub call: Option<OptionQuote>,
    /// Put side.
    #[cfg_attr(feature = "serde", serde(default))]
    pub put: Option<OptionQuote>,
}

impl StrikeRow {
    /// Creates a row from optional call and put quotes.
    pub fn new(strike: f64, call: Option<OptionQuote>, put: Option<OptionQuote>) -> Self {
        Self { strike, call, put }
    }

    /// Call open interest (0 when absent).
    #[inline]
    pub fn call_oi(&self) -> u64 {
        self.call.as_ref().map_or(0, |q| q.open_interest)
    }

    /// Put open interest (0 when absent).
    #[inline]
    pub fn put_oi(&self) -> u64 {
        self.put.as_ref().map_or(0, |q| q.open_interest)
    }

    /// Call volume (0 when absent).
    #[inline]
    pub fn call_volume(&self) -> u64 {
        self.call.as_ref().map_or(0, |q| q.volume)
    }

    /// Put volume (0 when absent).
    #[inline]
    pub fn put_volume(&self) -> u64 {
        self.put.as_ref().map_or(0, |q| q.volume)
    }

    /// Call implied volatility, or `fallback`.
    #[inline]
    pub fn call_iv_or(&self, fallback: f64) -> f64 {
        self.call.as_ref().map_or(fallback, |q| q.iv_or(fallback))
    }

    /// Put implied volatility, or `fallback`.
    #[inline]
    pub fn put_iv_or(&self, fallback: f64) -> f64 {
        self.put.as_ref().map_or(fallback, |q| q.iv_or(fallback))
    }

    /// Quote for the requested side.
    pub fn side(&self, option_type: OptionType) -> Option<&OptionQuote> {
        match option_type {
            OptionType::Call => self.call.as_ref(),
            OptionType::Put => self.put.as_ref(),
        }
    }

    fn validate(&self) -> Result<(), InstrumentError> {
        if !(self.strike > 0.0 && self.strike.is_finite()) {
            return Err(InstrumentError::InvalidStrike {
                strike: self.strike,
            });
        }

        for (expected, quote) in [(OptionType::Call, &self.call), (OptionType::Put, &self.put)] {
            let Some(quote) = quote else { continue };
            quote.validate()?;
            if quote.option_type != expected || quote.strike != self.strike {
                return Err(InstrumentError::InvalidQuote {
                    strike: self.strike,
                    message: format!(
                        "{} quote at strike {} filed under {} side",
                        quote.option_type, quote.strike, expected
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Option chain snapshot: a strike-sorted ladder for one symbol and expiry.
///
/// Construction validates every row and quote, rejects duplicate strikes and
/// sorts rows ascending by strike.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptionChain {
    symbol: String,
    expiry: NaiveDate,
    spot: f64,
    rows: Vec<StrikeRow>,
}

impl OptionChain {
    /// Creates a chain from prepared strike rows.
    ///
    /// # Errors
    /// - `InstrumentError::InvalidSpot` if spot <= 0
    /// - `InstrumentError::DuplicateStrike` if two rows share a strike
    /// - any row or quote validation error
    pub fn new(
        symbol: impl Into<String>,
        expiry: NaiveDate,
        spot: f64,
        mut rows: Vec<StrikeRow>,
    ) -> Result<Self, InstrumentError> {
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(InstrumentError::InvalidSpot { spot });
        }

        for row in &rows {
            row.validate()?;
        }

        rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        if let Some(pair) = rows.windows(2).find(|w| w[0].strike == w[1].strike) {
            return Err(InstrumentError::DuplicateStrike {
                strike: pair[0].strike,
            });
        }

        Ok(Self {
            symbol: symbol.into(),
            expiry,
            spot,
            rows,
        })
    }

    /// Creates a chain from a flat list of quotes, grouping them by strike.
    ///
    /// # Errors
    /// As [`OptionChain::new`]; a second quote for the same strike and side
    /// is reported as `DuplicateStrike`.
    pub fn from_quotes(
        symbol: impl Into<String>,
        expiry: NaiveDate,
        spot: f64,
        quotes: Vec<OptionQuote>,
    ) -> Result<Self, InstrumentError> {
        let mut rows: Vec<StrikeRow> = Vec::new();

        for quote in quotes {
            let idx = match rows.iter().position(|r| r.strike == quote.strike) {
                Some(idx) => idx,
                None => {
                    rows.push(StrikeRow::new(quote.strike, None, None));
                    rows.len() - 1
                }
            };

            let slot = match quote.option_type {
                OptionType::Call => &mut rows[idx].call,
                OptionType::Put => &mut rows[idx].put,
            };
            if slot.is_some() {
                return Err(InstrumentError::DuplicateStrike {
                    strike: quote.strike,
                });
            }
            *slot = Some(quote);
        }

        Self::new(symbol, expiry, spot, rows)
    }

    /// Underlying symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Expiry date shared by every row.
    pub fn expiry(&self) -> NaiveDate {
        self.expiry
    }

    /// Underlying spot at snapshot time.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Rows sorted ascending by strike.
    pub fn rows(&self) -> &[StrikeRow] {
        &self.rows
    }

    /// Row at exactly `strike`, if listed.
    pub fn row(&self, strike: f64) -> Option<&StrikeRow> {
        self.rows
            .binary_search_by(|r| r.strike.total_cmp(&strike))
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Listed strike closest to spot (lower strike on ties).
    pub fn atm_strike(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|r| r.strike)
            .min_by(|a, b| (a - self.spot).abs().total_cmp(&(b - self.spot).abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 27).unwrap()
    }

    fn quote(strike: f64, side: OptionType, oi: u64) -> OptionQuote {
        OptionQuote::new(strike, side).with_open_interest(oi)
    }

    #[test]
    fn test_from_quotes_groups_and_sorts() {
        let chain = OptionChain::from_quotes(
            "NIFTY",
            expiry(),
            22_000.0,
            vec![
                quote(22_100.0, OptionType::Call, 10),
                quote(21_900.0, OptionType::Put, 20),
                quote(22_100.0, OptionType::Put, 30),
            ],
        )
        .unwrap();

        let strikes: Vec<f64> = chain.rows().iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![21_900.0, 22_100.0]);
        assert_eq!(chain.row(22_100.0).unwrap().call_oi(), 10);
        assert_eq!(chain.row(22_100.0).unwrap().put_oi(), 30);
        assert_eq!(chain.row(21_900.0).unwrap().call_oi(), 0);
        assert!(chain.row(22_000.0).is_none());
    }

    #[test]
    fn test_duplicate_side_rejected() {
        let result = OptionChain::from_quotes(
            "NIFTY",
            expiry(),
            22_000.0,
            vec![
                quote(22_000.0, OptionType::Call, 1),
                quote(22_000.0, OptionType::Call, 2),
            ],
        );
        assert_eq!(
            result.unwrap_err(),
            InstrumentError::DuplicateStrike { strike: 22_000.0 }
        );
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        let rows = vec![
            StrikeRow::new(100.0, None, None),
            StrikeRow::new(100.0, None, None),
        ];
        assert!(OptionChain::new("X", expiry(), 100.0, rows).is_err());
    }

    #[test]
    fn test_mismatched_side_rejected() {
        let rows = vec![StrikeRow::new(
            100.0,
            Some(quote(100.0, OptionType::Put, 1)),
            None,
        )];
        assert!(matches!(
            OptionChain::new("X", expiry(), 100.0, rows),
            Err(InstrumentError::InvalidQuote { .. })
        ));
    }

    #[test]
    fn test_invalid_spot_rejected() {
        assert!(matches!(
            OptionChain::new("X", expiry(), 0.0, Vec::new()),
            Err(InstrumentError::InvalidSpot { .. })
        ));
    }

    #[test]
    fn test_atm_strike() {
        let rows = [21_900.0, 22_000.0, 22_100.0]
            .iter()
            .map(|&k| StrikeRow::new(k, None, None))
            .collect();
        let chain = OptionChain::new("NIFTY", expiry(), 22_040.0, rows).unwrap();
        assert_eq!(chain.atm_strike(), Some(22_000.0));
    }

    #[test]
    fn test_missing_side_defaults() {
        let row = StrikeRow::new(100.0, None, Some(quote(100.0, OptionType::Put, 5)));
        assert_eq!(row.call_volume(), 0);
        assert_eq!(row.call_iv_or(0.3), 0.3);
        assert!(row.side(OptionType::Put).is_some());
    }
}
