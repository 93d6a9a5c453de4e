//! # pricer_risk: Chain, Volatility and Strategy Analytics (Layer 4)
//!
//! ## Layer 4 Role
//!
//! pricer_risk turns option chain snapshots and strategy legs into the
//! analytics a trader reads before and after entering a position:
//!
//! - [`chain`]: max pain, put-call ratio, OI buildup, support/resistance and
//!   the unusual-activity scanner
//! - [`volatility`]: IV rank and percentile, strike skew, moneyness buckets,
//!   and the rolling per-(symbol, expiry) IV history
//! - [`margin`]: SPAN-style margin estimate with spread hedge credits
//! - [`greeks`]: position Greeks for multi-leg strategies
//! - [`payoff`]: expiry payoff profile, extremes and breakevens
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! │  chain/  volatility/  margin  greeks    │
//! │  payoff                                 │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │  pricer_pricing (L3)  seeded RNG        │
//! │  pricer_models  (L2)  Black-Scholes,    │
//! │                       chains, legs      │
//! │  pricer_core    (L1)  moneyness, time   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pricer_core::types::OptionType;
//! use pricer_models::instruments::{OptionChain, OptionQuote, StrikeRow};
//! use pricer_risk::chain::{calculate_max_pain, calculate_pcr};
//! use pricer_risk::volatility::{build_strike_iv_table, calculate_iv_skew};
//!
//! let quote = |k: f64, t: OptionType, oi: u64, iv: f64| {
//!     OptionQuote::new(k, t).with_open_interest(oi).with_implied_vol(iv)
//! };
//! let rows = vec![
//!     StrikeRow::new(21_900.0, Some(quote(21_900.0, OptionType::Call, 40_000, 0.15)), Some(quote(21_900.0, OptionType::Put, 90_000, 0.19))),
//!     StrikeRow::new(22_000.0, Some(quote(22_000.0, OptionType::Call, 80_000, 0.14)), Some(quote(22_000.0, OptionType::Put, 85_000, 0.17))),
//!     StrikeRow::new(22_100.0, Some(quote(22_100.0, OptionType::Call, 120_000, 0.13)), Some(quote(22_100.0, OptionType::Put, 30_000, 0.16))),
//! ];
//! let chain = OptionChain::new("NIFTY", NaiveDate::from_ymd_opt(2024, 6, 27).unwrap(), 22_010.0, rows).unwrap();
//!
//! let max_pain = calculate_max_pain(chain.rows()).unwrap();
//! assert_eq!(max_pain.max_pain_strike, 22_000.0);
//!
//! let pcr = calculate_pcr(chain.rows());
//! assert!((pcr.pcr_by_oi - 205.0 / 240.0).abs() < 1e-12);
//!
//! let skew = calculate_iv_skew(&build_strike_iv_table(&chain));
//! assert!(skew.avg_skew > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for thresholds, configs and results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod chain;
pub mod error;
pub mod greeks;
pub mod margin;
pub mod payoff;
pub mod volatility;

pub use error::RiskError;
