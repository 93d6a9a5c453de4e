//! Standard normal distribution functions.
//!
//! This module provides:
//! - `norm_cdf`: Cumulative distribution function (CDF)
//! - `norm_pdf`: Probability density function (PDF)
//!
//! The CDF uses the Zelen & Severo polynomial (Abramowitz and Stegun 26.2.17),
//! which keeps the absolute error below 7.5e-8 over the whole real line. That
//! is tight enough for the Newton-Raphson implied volatility solver, whose
//! price tolerance is several orders of magnitude looser.
//!
//! NaN input propagates to NaN output; callers must not rely on any other
//! behaviour for non-finite arguments.

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Abramowitz and Stegun 26.2.17 scale constant.
const P: f64 = 0.231_641_9;

/// Abramowitz and Stegun 26.2.17 polynomial coefficients b1..b5.
const B: [f64; 5] = [
    0.319_381_530,
    -0.356_563_782,
    1.781_477_937,
    -1.821_255_978,
    1.330_274_429,
];

/// Standard normal probability density function.
///
/// # Mathematical Definition
/// φ(x) = exp(-x²/2) / sqrt(2π)
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0) - 0.398_942_280_4).abs() < 1e-10);
/// assert_eq!(norm_pdf(1.5), norm_pdf(-1.5));
/// ```
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) where X ~ N(0, 1).
///
/// # Mathematical Definition
/// For x ≥ 0: Φ(x) ≈ 1 - φ(x)·(b₁t + b₂t² + b₃t³ + b₄t⁴ + b₅t⁵), t = 1/(1 + p·x).
/// Negative arguments use the symmetry Φ(-x) = 1 - Φ(x).
///
/// # Accuracy
/// Absolute error below 7.5e-8 for all finite x.
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!((norm_cdf(1.96) - 0.975).abs() < 1e-4);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + P * x.abs());
    let poly = t * (B[0] + t * (B[1] + t * (B[2] + t * (B[3] + t * B[4]))));
    let tail = norm_pdf(x) * poly;

    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    // ==========================================================
    // PDF Tests
    // ==========================================================

    #[test]
    fn test_pdf_peak_at_zero() {
        assert_abs_diff_eq!(norm_pdf(0.0), FRAC_1_SQRT_2PI, epsilon = 1e-15);
    }

    #[test]
    fn test_pdf_known_value() {
        // φ(1) = 0.24197072451914337
        assert_abs_diff_eq!(norm_pdf(1.0), 0.241_970_724_519_143_37, epsilon = 1e-14);
    }

    #[test]
    fn test_pdf_far_tail_is_tiny() {
        assert!(norm_pdf(40.0) >= 0.0);
        assert!(norm_pdf(40.0) < 1e-300);
    }

    // ==========================================================
    // CDF Tests
    // ==========================================================

    #[test]
    fn test_cdf_at_zero() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-7);
    }

    #[test]
    fn test_cdf_reference_values() {
        let cases = [
            (-3.0, 0.001_349_898_031_630_094_6),
            (-1.0, 0.158_655_253_931_457_05),
            (0.5, 0.691_462_461_274_013_1),
            (1.0, 0.841_344_746_068_542_9),
            (1.96, 0.975_002_104_851_780_1),
            (2.5, 0.993_790_334_674_223_7),
        ];
        for (x, expected) in cases {
            assert_abs_diff_eq!(norm_cdf(x), expected, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_cdf_tails() {
        assert!(norm_cdf(-10.0) < 1e-20);
        assert_abs_diff_eq!(norm_cdf(10.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_cdf_nan_propagates() {
        assert!(norm_cdf(f64::NAN).is_nan());
    }

    // ==========================================================
    // Property Tests
    // ==========================================================

    proptest! {
        #[test]
        fn prop_cdf_symmetry(x in -8.0..8.0_f64) {
            prop_assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-7);
        }

        #[test]
        fn prop_cdf_monotone(x in -6.0..6.0_f64, dx in 1e-3..1.0_f64) {
            prop_assert!(norm_cdf(x + dx) >= norm_cdf(x));
        }

        #[test]
        fn prop_cdf_in_unit_interval(x in -30.0..30.0_f64) {
            let p = norm_cdf(x);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
