//! Single-side option quote from a chain snapshot.

use pricer_core::types::OptionType;

use super::error::InstrumentError;

/// Volatility substituted when a quote carries no usable implied volatility.
pub const DEFAULT_FALLBACK_IV: f64 = 0.30;

/// One side (call or put) of one strike in an option chain snapshot.
///
/// Quotes are produced by the external market-data collaborator and consumed
/// read-only. `implied_vol` is optional because feeds routinely omit it, or
/// report zero, for illiquid strikes.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::instruments::OptionQuote;
///
/// let q = OptionQuote::new(22_000.0, OptionType::Call)
///     .with_open_interest(150_000)
///     .with_volume(80_000)
///     .with_implied_vol(0.14);
/// assert!(q.validate().is_ok());
/// assert_eq!(q.iv_or(0.30), 0.14);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionQuote {
    /// Strike price.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// Last traded price.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_price: f64,
    /// Best bid.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bid: f64,
    /// Best ask.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ask: f64,
    /// Contracts traded in the session.
    #[cfg_attr(feature = "serde", serde(default))]
    pub volume: u64,
    /// Outstanding contracts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub open_interest: u64,
    /// Change in open interest since the previous session.
    #[cfg_attr(feature = "serde", serde(default))]
    pub open_interest_change: i64,
    /// Implied volatility as a decimal, when the feed supplies one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub implied_vol: Option<f64>,
}

impl OptionQuote {
    /// Creates an empty quote (zero prices, volume and open interest).
    pub fn new(strike: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            option_type,
            last_price: 0.0,
            bid: 0.0,
            ask: 0.0,
            volume: 0,
            open_interest: 0,
            open_interest_change: 0,
            implied_vol: None,
        }
    }

    /// Sets the last traded price.
    pub fn with_last_price(mut self, last_price: f64) -> Self {
        self.last_price = last_price;
        self
    }

    /// Sets the bid/ask pair.
    pub fn with_bid_ask(mut self, bid: f64, ask: f64) -> Self {
        self.bid = bid;
        self.ask = ask;
        self
    }

    /// Sets session volume.
    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = volume;
        self
    }

    /// Sets open interest.
    pub fn with_open_interest(mut self, open_interest: u64) -> Self {
        self.open_interest = open_interest;
        self
    }

    /// Sets the open interest change.
    pub fn with_open_interest_change(mut self, change: i64) -> Self {
        self.open_interest_change = change;
        self
    }

    /// Sets implied volatility.
    pub fn with_implied_vol(mut self, iv: f64) -> Self {
        self.implied_vol = Some(iv);
        self
    }

    /// Implied volatility, or `fallback` when missing or non-positive.
    #[inline]
    pub fn iv_or(&self, fallback: f64) -> f64 {
        match self.implied_vol {
            Some(iv) if iv > 0.0 && iv.is_finite() => iv,
            _ => fallback,
        }
    }

    /// Checks the quote's fields against their domains.
    ///
    /// # Errors
    /// - `InstrumentError::InvalidStrike` for a non-positive strike
    /// - `InstrumentError::InvalidQuote` for negative or non-finite prices,
    ///   or a negative implied volatility
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if !(self.strike > 0.0 && self.strike.is_finite()) {
            return Err(InstrumentError::InvalidStrike {
                strike: self.strike,
            });
        }

        for (name, value) in [
            ("last_price", self.last_price),
            ("bid", self.bid),
            ("ask", self.ask),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(InstrumentError::InvalidQuote {
                    strike: self.strike,
                    message: format!("{} = {}", name, value),
                });
            }
        }

        if let Some(iv) = self.implied_vol {
            if !(iv >= 0.0 && iv.is_finite()) {
                return Err(InstrumentError::InvalidQuote {
                    strike: self.strike,
                    message: format!("implied_vol = {}", iv),
                });
            }
        }

        Ok(())
    }
}
