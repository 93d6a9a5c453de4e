//! Option instrument value objects.
//!
//! Market snapshots and user strategies enter the engine through these
//! types. Each is validated when constructed, so the analytics layers can
//! assume positive strikes, non-negative premiums and unique strike ladders.
//!
//! - [`OptionQuote`]: one side (call or put) of one strike in a chain snapshot
//! - [`StrikeRow`]: call and put quotes sharing a strike
//! - [`OptionChain`]: strike-sorted ladder for one symbol and expiry
//! - [`StrategyLeg`], [`TradeAction`]: user-constructed strategy legs
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use pricer_core::types::OptionType;
//! use pricer_models::instruments::{OptionChain, OptionQuote, StrategyLeg, TradeAction};
//!
//! let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
//! let chain = OptionChain::from_quotes(
//!     "NIFTY",
//!     expiry,
//!     22_000.0,
//!     vec![
//!         OptionQuote::new(22_000.0, OptionType::Call).with_open_interest(1_200),
//!         OptionQuote::new(22_000.0, OptionType::Put).with_open_interest(1_500),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(chain.rows().len(), 1);
//!
//! let leg = StrategyLeg::new(OptionType::Call, TradeAction::Sell, 22_000.0, 120.0, 1, expiry);
//! assert!(leg.is_ok());
//! ```

mod chain;
mod error;
mod leg;
mod quote;

pub use chain::{OptionChain, StrikeRow};
pub use error::InstrumentError;
pub use leg::{StrategyLeg, TradeAction};
pub use quote::{OptionQuote, DEFAULT_FALLBACK_IV};
