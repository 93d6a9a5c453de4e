//! # pricer_models: Pricing Models and Option Instruments
//!
//! ## Layer 2 (Models) Role
//!
//! pricer_models sits on top of pricer_core and provides:
//! - Closed-form Black-Scholes pricing and Greeks (`analytical::black_scholes`)
//! - A Newton-Raphson implied volatility solver (`analytical::implied_vol`)
//! - Validated value objects for chain snapshots and strategy legs (`instruments`)
//!
//! Boundary validation happens when instruments are constructed; the numerical
//! functions in [`analytical`] assume well-formed input, except for the
//! checked entry points ([`analytical::BlackScholes::new`] and
//! [`analytical::ImpliedVolSolver::solve`]), which return errors.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::OptionType;
//! use pricer_models::analytical::{implied_volatility, price};
//!
//! let premium = price(22_000.0, 22_000.0, 30.0 / 365.0, 0.07, 0.20, OptionType::Call);
//! let iv = implied_volatility(premium, 22_000.0, 22_000.0, 30.0 / 365.0, 0.07, OptionType::Call)
//!     .unwrap();
//! assert!((iv - 0.20).abs() < 1e-3);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for instruments, Greeks and solver config

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
