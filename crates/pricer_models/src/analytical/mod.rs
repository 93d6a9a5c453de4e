//! Analytical pricing for vanilla European options.
//!
//! This module provides:
//! - [`BlackScholes`]: validated model with price and Greeks methods
//! - Free functions [`price`], [`delta`], [`gamma`], [`theta`], [`vega`], [`greeks`]
//!   forming the unchecked functional API
//! - [`Greeks`]: immutable sensitivity snapshot
//! - [`ImpliedVolSolver`]: Newton-Raphson implied volatility
//! - [`AnalyticalError`]: input validation failures
//!
//! ## Conventions
//!
//! - Theta is quoted per calendar day (annual theta / 365).
//! - Vega is quoted per volatility point (raw vega / 100).
//! - At or past expiry, prices collapse to intrinsic value and Greeks follow
//!   the intrinsic-delta convention documented on [`BlackScholes::delta`].

pub mod black_scholes;
pub mod error;
pub mod implied_vol;

pub use black_scholes::{delta, gamma, greeks, price, theta, vega, BlackScholes, Greeks};
pub use error::AnalyticalError;
pub use implied_vol::{implied_volatility, ImpliedVol, ImpliedVolConfig, ImpliedVolSolver};
