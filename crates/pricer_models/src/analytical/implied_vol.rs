//! Newton-Raphson implied volatility solver.
//!
//! Iterates `σₙ₊₁ = σₙ - (BS(σₙ) - P_obs) / ∂BS/∂σ(σₙ)` from a fixed initial
//! guess, clamping every iterate into `[min_vol, max_vol]`.
//!
//! Convergence failures are not errors: when the iteration budget runs out,
//! or vega underflows to zero, the last iterate is returned with
//! `converged = false` and a `warn!` event is emitted. Only inputs outside
//! the model's domain (negative price, non-positive spot or strike, negative
//! expiry) are rejected.

use pricer_core::types::OptionType;
use tracing::{debug, warn};

use super::black_scholes::BlackScholes;
use super::error::AnalyticalError;

/// Vega magnitude treated as an underflow.
const VEGA_FLOOR: f64 = 1e-30;

/// Configuration for the implied volatility solver.
///
/// # Examples
/// ```
/// use pricer_models::analytical::ImpliedVolConfig;
///
/// let config = ImpliedVolConfig::default();
/// assert_eq!(config.initial_guess, 0.30);
/// assert_eq!(config.max_iterations, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpliedVolConfig {
    /// Starting volatility for the iteration.
    pub initial_guess: f64,
    /// Iteration budget.
    pub max_iterations: usize,
    /// Convergence tolerance on the absolute price residual.
    pub tolerance: f64,
    /// Lower clamp applied to every iterate.
    pub min_vol: f64,
    /// Upper clamp applied to every iterate.
    pub max_vol: f64,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.30,
            max_iterations: 100,
            tolerance: 1e-4,
            min_vol: 0.01,
            max_vol: 3.0,
        }
    }
}

/// Outcome of an implied volatility solve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVol {
    /// Best volatility estimate.
    pub volatility: f64,
    /// Number of Newton updates performed.
    pub iterations: usize,
    /// Whether the price residual fell below tolerance.
    pub converged: bool,
}

/// Newton-Raphson implied volatility solver.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::{price, ImpliedVolSolver};
///
/// let observed = price(100.0, 110.0, 0.5, 0.05, 0.35, OptionType::Put);
/// let solver = ImpliedVolSolver::default();
/// let iv = solver.solve(observed, 100.0, 110.0, 0.5, 0.05, OptionType::Put).unwrap();
/// assert!(iv.converged);
/// assert!((iv.volatility - 0.35).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpliedVolSolver {
    config: ImpliedVolConfig,
}

impl ImpliedVolSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: ImpliedVolConfig) -> Self {
        Self { config }
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &ImpliedVolConfig {
        &self.config
    }

    /// Solves for the volatility reproducing `observed_price`.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidPrice` if the price is negative or not finite
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidStrike` if strike <= 0
    /// - `AnalyticalError::InvalidExpiry` if `t` is negative or not finite
    pub fn solve(
        &self,
        observed_price: f64,
        spot: f64,
        strike: f64,
        t: f64,
        rate: f64,
        option_type: OptionType,
    ) -> Result<ImpliedVol, AnalyticalError> {
        if !(observed_price >= 0.0 && observed_price.is_finite()) {
            return Err(AnalyticalError::InvalidPrice {
                price: observed_price,
            });
        }
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(AnalyticalError::InvalidStrike { strike });
        }
        if !(t >= 0.0 && t.is_finite()) {
            return Err(AnalyticalError::InvalidExpiry { expiry: t });
        }

        let cfg = &self.config;
        let mut vol = cfg.initial_guess;

        for iteration in 0..cfg.max_iterations {
            let model = BlackScholes::new(spot, rate, vol)?;
            let residual = model.price(strike, t, option_type) - observed_price;

            if residual.abs() < cfg.tolerance {
                debug!(strike, iterations = iteration, volatility = vol, "implied vol converged");
                return Ok(ImpliedVol {
                    volatility: vol,
                    iterations: iteration,
                    converged: true,
                });
            }

            let vega = model.raw_vega(strike, t);
            if vega.abs() < VEGA_FLOOR {
                warn!(strike, t, volatility = vol, "vega underflow, returning last estimate");
                return Ok(ImpliedVol {
                    volatility: vol,
                    iterations: iteration,
                    converged: false,
                });
            }

            vol = (vol - residual / vega).clamp(cfg.min_vol, cfg.max_vol);
        }

        warn!(
            strike,
            max_iterations = cfg.max_iterations,
            volatility = vol,
            "implied vol did not converge"
        );
        Ok(ImpliedVol {
            volatility: vol,
            iterations: cfg.max_iterations,
            converged: false,
        })
    }
}

/// Implied volatility with the default solver configuration.
///
/// Returns the best estimate even when the solver did not converge; use
/// [`ImpliedVolSolver::solve`] to inspect convergence.
pub fn implied_volatility(
    observed_price: f64,
    spot: f64,
    strike: f64,
    t: f64,
    rate: f64,
    option_type: OptionType,
) -> Result<f64, AnalyticalError> {
    ImpliedVolSolver::default()
        .solve(observed_price, spot, strike, t, rate, option_type)
        .map(|iv| iv.volatility)
}
