//! # pricer_pricing: Path Simulation and Backtesting (Layer 3)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing drives the Layer 2 Black-Scholes pricer along simulated
//! market paths:
//! - Seeded random number generation with Box-Muller normals (`rng`)
//! - Geometric Brownian Motion daily bars with synthetic OHLC and IV (`mc`)
//! - Day-by-day strategy re-pricing, equity curve and performance metrics (`backtest`)
//!
//! Every simulation takes an explicit [`rng::PricerRng`], so the same seed
//! always reproduces the same path, equity curve and metrics.
//!
//! ## Usage Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pricer_core::types::OptionType;
//! use pricer_models::instruments::{StrategyLeg, TradeAction};
//! use pricer_pricing::backtest::run_backtest_simulation;
//!
//! let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
//! let legs = vec![
//!     StrategyLeg::new(OptionType::Call, TradeAction::Buy, 22_000.0, 300.0, 1, expiry).unwrap(),
//!     StrategyLeg::new(OptionType::Put, TradeAction::Buy, 22_000.0, 280.0, 1, expiry).unwrap(),
//! ];
//!
//! let result = run_backtest_simulation(&legs, 500_000.0, 60, 42).unwrap();
//! assert_eq!(result.equity_curve.len(), 61);
//! assert_eq!(result.equity_curve[0], 500_000.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for configuration, bars and results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod backtest;
pub mod mc;
pub mod rng;
