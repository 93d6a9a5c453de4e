//! Market path simulation.
//!
//! - [`paths`]: Geometric Brownian Motion daily bars with synthetic OHLC and
//!   implied volatility

pub mod paths;

pub use paths::{generate_daily_bars, BarJitter, DailyBar, GbmParams};
