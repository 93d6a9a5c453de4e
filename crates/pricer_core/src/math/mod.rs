//! Mathematical primitives shared by every pricing layer.
//!
//! - [`distributions`]: closed-form standard normal CDF and PDF

pub mod distributions;
