//! # pricer_core: Numerical Foundation for the optlab Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the engine, providing:
//! - Standard normal CDF/PDF approximations (`math::distributions`)
//! - Option side and moneyness classification (`types::option_type`, `types::moneyness`)
//! - Year-fraction utilities for expiry handling (`types::time`)
//! - Error types: `PricingError`, `DateError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::distributions::norm_cdf;
//! use pricer_core::types::{Moneyness, OptionType};
//!
//! assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
//!
//! let m = Moneyness::classify(22_000.0, 21_500.0, OptionType::Call);
//! assert_eq!(m, Moneyness::Itm);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `OptionType` and `Moneyness`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
