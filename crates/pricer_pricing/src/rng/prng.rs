//! Pseudo-random number generator wrapper for path simulation.
//!
//! This module provides [`PricerRng`], a seeded PRNG wrapper that offers
//! reproducible uniform and normal draws.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulation random number generator.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::PricerRng;
///
/// let mut rng = PricerRng::from_seed(42);
///
/// // Single value generation
/// let u: f64 = rng.gen_uniform();
/// let n: f64 = rng.gen_normal();
/// assert!((0.0..1.0).contains(&u));
/// assert!(n.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct PricerRng {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// The seed used for initialisation (stored for reproducibility tracking).
    seed: u64,
}

impl PricerRng {
    /// Creates a new RNG instance initialised with the given seed.
    ///
    /// The same seed always produces the same sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::rng::PricerRng;
    ///
    /// let mut rng1 = PricerRng::from_seed(12345);
    /// let mut rng2 = PricerRng::from_seed(12345);
    /// assert_eq!(rng1.gen_uniform(), rng2.gen_uniform());
    /// ```
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates an RNG from an OS-entropy seed.
    ///
    /// The drawn seed is retained, so [`PricerRng::seed`] still allows the
    /// run to be replayed.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random::<u64>())
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a uniform value in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Generates a uniform value in (0, 1].
    ///
    /// Safe to pass to `ln`.
    #[inline]
    pub fn gen_open_uniform(&mut self) -> f64 {
        1.0 - self.inner.gen::<f64>()
    }

    /// Generates a standard normal variate (mean=0, std=1).
    ///
    /// Uses the Box-Muller transform `√(-2 ln u) · cos(2πv)` with `u, v`
    /// drawn from (0, 1]. The paired sine variate is discarded, so each call
    /// consumes exactly two uniforms.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::rng::PricerRng;
    ///
    /// let mut rng = PricerRng::from_seed(7);
    /// let n = 20_000;
    /// let mean = (0..n).map(|_| rng.gen_normal()).sum::<f64>() / n as f64;
    /// assert!(mean.abs() < 0.05);
    /// ```
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        let u = self.gen_open_uniform();
        let v = self.gen_open_uniform();
        (-2.0 * u.ln()).sqrt() * (TAU * v).cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================
    // Seeding
    // ==========================================================

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PricerRng::from_seed(99);
        let mut b = PricerRng::from_seed(99);
        for _ in 0..100 {
            assert_eq!(a.gen_normal(), b.gen_normal());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = PricerRng::from_seed(1);
        let mut b = PricerRng::from_seed(2);
        assert_ne!(a.gen_uniform(), b.gen_uniform());
    }

    #[test]
    fn test_entropy_seed_is_replayable() {
        let mut rng = PricerRng::from_entropy();
        let mut replay = PricerRng::from_seed(rng.seed());
        assert_eq!(rng.gen_uniform(), replay.gen_uniform());
    }

    // ==========================================================
    // Distributions
    // ==========================================================

    #[test]
    fn test_open_uniform_range() {
        let mut rng = PricerRng::from_seed(3);
        for _ in 0..10_000 {
            let u = rng.gen_open_uniform();
            assert!(u > 0.0 && u <= 1.0);
        }
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = PricerRng::from_seed(2024);
        let buffer: Vec<f64> = (0..50_000).map(|_| rng.gen_normal()).collect();

        let n = buffer.len() as f64;
        let mean = buffer.iter().sum::<f64>() / n;
        let var = buffer.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        assert!(mean.abs() < 0.03, "mean = {}", mean);
        assert!((var - 1.0).abs() < 0.05, "var = {}", var);
        assert!(buffer.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_normal_consumes_two_uniforms() {
        let mut a = PricerRng::from_seed(5);
        let mut b = PricerRng::from_seed(5);
        let _ = a.gen_normal();
        let _ = b.gen_uniform();
        let _ = b.gen_uniform();
        assert_eq!(a.gen_uniform(), b.gen_uniform());
    }
}
