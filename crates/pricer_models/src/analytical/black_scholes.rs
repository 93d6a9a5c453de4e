//! Black-Scholes pricing model for European options.
//!
//! This module provides the Black-Scholes-Merton model for pricing European
//! call and put options with analytical Greeks, under a continuously
//! compounded risk-free rate and flat volatility.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! ## Quoting Conventions
//!
//! | Greek | Unit |
//! |-------|------|
//! | Delta | ∂V/∂S |
//! | Gamma | ∂²V/∂S² |
//! | Theta | price change per calendar day (annual / 365) |
//! | Vega  | price change per 1 volatility point (raw / 100) |

use std::ops::{Add, Mul};

use pricer_core::math::distributions::{norm_cdf, norm_pdf};
use pricer_core::types::{OptionType, CALENDAR_DAYS_PER_YEAR};

use super::error::AnalyticalError;

/// Year fractions at or below this are treated as expired.
const EXPIRY_EPSILON: f64 = 1e-10;

/// Divisor converting raw vega into vega per volatility point.
const VEGA_POINT: f64 = 100.0;

/// Sensitivity snapshot produced by a single pricing call.
///
/// Delta lies in [-1, 1]; gamma and vega are non-negative for a single long
/// option. Snapshots are aggregated across legs with `+` and scaled with `*`.
///
/// # Examples
/// ```
/// use pricer_models::analytical::Greeks;
///
/// let leg = Greeks { delta: 0.5, gamma: 0.001, theta: -10.0, vega: 25.0 };
/// let book = leg * 2.0 + leg * -1.0;
/// assert_eq!(book, leg);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// Price decay per calendar day
    pub theta: f64,
    /// Price change per volatility point
    pub vega: f64,
}

impl Add for Greeks {
    type Output = Greeks;

    fn add(self, rhs: Greeks) -> Greeks {
        Greeks {
            delta: self.delta + rhs.delta,
            gamma: self.gamma + rhs.gamma,
            theta: self.theta + rhs.theta,
            vega: self.vega + rhs.vega,
        }
    }
}

impl Mul<f64> for Greeks {
    type Output = Greeks;

    fn mul(self, scale: f64) -> Greeks {
        Greeks {
            delta: self.delta * scale,
            gamma: self.gamma * scale,
            theta: self.theta * scale,
            vega: self.vega * scale,
        }
    }
}

impl std::iter::Sum for Greeks {
    fn sum<I: Iterator<Item = Greeks>>(iter: I) -> Greeks {
        iter.fold(Greeks::default(), Add::add)
    }
}

/// Black-Scholes model for European option pricing.
///
/// Holds the market state (spot, rate, volatility); strike, expiry and side
/// are per-call arguments so one model prices a whole strike ladder.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call_price = bs.price(100.0, 1.0, OptionType::Call);
/// let put_price = bs.price(100.0, 1.0, OptionType::Put);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Spot price (S)
    spot: f64,
    /// Risk-free interest rate (r)
    rate: f64,
    /// Volatility (σ)
    volatility: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised, continuously compounded)
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0 or not finite
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0 or not finite
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0, 0.05, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0, 0.05, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0, 0.05, 0.0).is_err());
    /// ```
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(AnalyticalError::InvalidSpot { spot });
        }

        if !(volatility > 0.0 && volatility.is_finite()) {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }

        Ok(Self::unchecked(spot, rate, volatility))
    }

    /// Builds the model without validation; used by the functional API.
    #[inline]
    pub(crate) fn unchecked(spot: f64, rate: f64, volatility: f64) -> Self {
        Self {
            spot,
            rate,
            volatility,
        }
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Computes the d1 term of the Black-Scholes formula.
    ///
    /// d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
    ///
    /// At expiry the term diverges; a large signed value is returned instead
    /// so that N(d₁) collapses to the intrinsic indicator.
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return if self.spot > strike {
                100.0
            } else if self.spot < strike {
                -100.0
            } else {
                0.0
            };
        }

        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let log_moneyness = (self.spot / strike).ln();
        let drift = (self.rate + 0.5 * self.volatility * self.volatility) * expiry;

        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes the d2 term of the Black-Scholes formula.
    ///
    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return self.d1(strike, expiry);
        }

        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Computes the option price.
    ///
    /// For `expiry <= 0` this is the intrinsic value `max(0, S-K)` for calls
    /// and `max(0, K-S)` for puts.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::OptionType;
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    /// assert!(bs.price(100.0, 1.0, OptionType::Call) > 0.0);
    /// assert_eq!(bs.price(90.0, 0.0, OptionType::Call), 10.0);
    /// ```
    #[inline]
    pub fn price(&self, strike: f64, expiry: f64, option_type: OptionType) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return option_type.intrinsic(self.spot, strike);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();

        match option_type {
            // C = S·N(d₁) - K·e^(-rT)·N(d₂)
            OptionType::Call => self.spot * norm_cdf(d1) - strike * discount * norm_cdf(d2),
            // P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
            OptionType::Put => strike * discount * norm_cdf(-d2) - self.spot * norm_cdf(-d1),
        }
    }

    /// Computes Delta (∂V/∂S).
    ///
    /// - Call Delta = N(d₁)
    /// - Put Delta = N(d₁) - 1
    ///
    /// At expiry the intrinsic-delta convention applies: a call has delta 1
    /// when strictly in the money and 0 otherwise; a put has delta -1 when
    /// strictly in the money and 0 otherwise. Exactly at the strike both are 0.
    #[inline]
    pub fn delta(&self, strike: f64, expiry: f64, option_type: OptionType) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return match option_type {
                OptionType::Call if self.spot > strike => 1.0,
                OptionType::Put if self.spot < strike => -1.0,
                _ => 0.0,
            };
        }

        let n_d1 = norm_cdf(self.d1(strike, expiry));
        match option_type {
            OptionType::Call => n_d1,
            OptionType::Put => n_d1 - 1.0,
        }
    }

    /// Computes Gamma (∂²V/∂S²).
    ///
    /// Gamma = φ(d₁) / (S·σ·√T), identical for calls and puts; 0 at expiry.
    #[inline]
    pub fn gamma(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Computes raw Vega (∂V/∂σ per unit of volatility).
    ///
    /// Vega = S·√T·φ(d₁); 0 at expiry.
    #[inline]
    pub fn raw_vega(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        self.spot * expiry.sqrt() * norm_pdf(d1)
    }

    /// Computes Vega per volatility point (raw vega / 100).
    #[inline]
    pub fn vega(&self, strike: f64, expiry: f64) -> f64 {
        self.raw_vega(strike, expiry) / VEGA_POINT
    }

    /// Computes Theta per calendar day.
    ///
    /// - Call Theta = [-(S·σ·φ(d₁))/(2√T) - r·K·e^(-rT)·N(d₂)] / 365
    /// - Put Theta = [-(S·σ·φ(d₁))/(2√T) + r·K·e^(-rT)·N(-d₂)] / 365
    ///
    /// Usually negative for long positions; 0 at expiry.
    #[inline]
    pub fn theta(&self, strike: f64, expiry: f64, option_type: OptionType) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();

        let decay = -(self.spot * self.volatility * norm_pdf(d1)) / (2.0 * expiry.sqrt());
        let carry = self.rate * strike * discount;

        let annual = match option_type {
            OptionType::Call => decay - carry * norm_cdf(d2),
            OptionType::Put => decay + carry * norm_cdf(-d2),
        };
        annual / CALENDAR_DAYS_PER_YEAR
    }

    /// Computes all Greeks for one option in a single snapshot.
    pub fn greeks(&self, strike: f64, expiry: f64, option_type: OptionType) -> Greeks {
        Greeks {
            delta: self.delta(strike, expiry, option_type),
            gamma: self.gamma(strike, expiry),
            theta: self.theta(strike, expiry, option_type),
            vega: self.vega(strike, expiry),
        }
    }
}

/// Black-Scholes price, unchecked.
///
/// Assumes `spot > 0`, `strike > 0`, `vol > 0`. `t <= 0` yields intrinsic value.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::price;
///
/// let p = price(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call);
/// assert!((p - 10.4506).abs() < 1e-3);
/// ```
#[inline]
pub fn price(spot: f64, strike: f64, t: f64, rate: f64, vol: f64, option_type: OptionType) -> f64 {
    BlackScholes::unchecked(spot, rate, vol).price(strike, t, option_type)
}

/// Black-Scholes delta, unchecked.
#[inline]
pub fn delta(spot: f64, strike: f64, t: f64, rate: f64, vol: f64, option_type: OptionType) -> f64 {
    BlackScholes::unchecked(spot, rate, vol).delta(strike, t, option_type)
}

/// Black-Scholes gamma, unchecked.
#[inline]
pub fn gamma(spot: f64, strike: f64, t: f64, rate: f64, vol: f64) -> f64 {
    BlackScholes::unchecked(spot, rate, vol).gamma(strike, t)
}

/// Black-Scholes theta per calendar day, unchecked.
#[inline]
pub fn theta(spot: f64, strike: f64, t: f64, rate: f64, vol: f64, option_type: OptionType) -> f64 {
    BlackScholes::unchecked(spot, rate, vol).theta(strike, t, option_type)
}

/// Black-Scholes vega per volatility point, unchecked.
#[inline]
pub fn vega(spot: f64, strike: f64, t: f64, rate: f64, vol: f64) -> f64 {
    BlackScholes::unchecked(spot, rate, vol).vega(strike, t)
}

/// All Black-Scholes Greeks, unchecked.
#[inline]
pub fn greeks(spot: f64, strike: f64, t: f64, rate: f64, vol: f64, option_type: OptionType) -> Greeks {
    BlackScholes::unchecked(spot, rate, vol).greeks(strike, t, option_type)
}
