//! # Random Number Generation
//!
//! Seeded pseudo-random numbers for path simulation.
//!
//! - **Reproducibility**: every generator is created from a `u64` seed and
//!   reports it back, so any simulated path can be replayed
//! - **Explicit normals**: standard normal variates come from the Box-Muller
//!   transform over two open-interval uniforms
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let u = rng.gen_uniform();
//! let z = rng.gen_normal();
//! assert!((0.0..1.0).contains(&u));
//! assert!(z.is_finite());
//! ```

pub mod prng;

pub use prng::PricerRng;
