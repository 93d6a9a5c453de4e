//! Rolling implied-volatility history.
//!
//! History is kept per `(symbol, expiry)` in an injected [`IvHistoryStore`].
//! Every append enforces the window rules in one step:
//!
//! - at most one observation per calendar date (repeat records are no-ops)
//! - oldest observations are evicted once the window exceeds
//!   [`IV_HISTORY_WINDOW`] entries
//!
//! Keys never interact, so [`InMemoryIvHistoryStore`] locks each series
//! separately behind a shared map. Readers never observe a series longer
//! than the window.
//!
//! When too little history has accumulated, [`simulate_iv_history`] produces
//! a mean-reverting demo series from an explicit random source.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{Duration, NaiveDate};
use pricer_pricing::rng::PricerRng;
use tracing::{debug, trace};

use crate::error::RiskError;

/// Maximum observations kept per key (one trading year).
pub const IV_HISTORY_WINDOW: usize = 252;

/// Observations required before stored history is preferred over simulation.
pub const DEFAULT_MIN_HISTORY_DAYS: usize = 30;

/// Identifies one IV series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvHistoryKey {
    /// Underlying symbol.
    pub symbol: String,
    /// Option expiry.
    pub expiry: NaiveDate,
}

impl IvHistoryKey {
    /// Creates a key.
    pub fn new(symbol: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            expiry,
        }
    }
}

impl fmt::Display for IvHistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.expiry)
    }
}

/// One daily IV observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvHistoryPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Implied volatility as a decimal.
    pub iv: f64,
}

impl IvHistoryPoint {
    /// Creates a point.
    pub fn new(date: NaiveDate, iv: f64) -> Self {
        Self { date, iv }
    }
}

/// Result of a windowed append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The series already held the date; nothing changed.
    Duplicate,
    /// The point was appended and `evicted` oldest points were dropped.
    Appended {
        /// Points dropped to restore the window.
        evicted: usize,
    },
}

impl AppendOutcome {
    /// Whether the point was stored.
    pub fn is_appended(&self) -> bool {
        matches!(self, Self::Appended { .. })
    }
}

/// Storage for IV series.
///
/// Implementations must make `append` atomic per key: the date check, the
/// push and the eviction happen under one lock (or one transaction).
pub trait IvHistoryStore: Send + Sync {
    /// Series for `key` in insertion order; empty if unknown.
    fn get(&self, key: &IvHistoryKey) -> Result<Vec<IvHistoryPoint>, RiskError>;

    /// Appends `point` unless the series already holds its date, then evicts
    /// the oldest points until at most `max_len` remain.
    fn append(
        &self,
        key: &IvHistoryKey,
        point: IvHistoryPoint,
        max_len: usize,
    ) -> Result<AppendOutcome, RiskError>;

    /// Number of points stored for `key`.
    fn count(&self, key: &IvHistoryKey) -> Result<usize, RiskError> {
        Ok(self.get(key)?.len())
    }
}

impl<S: IvHistoryStore + ?Sized> IvHistoryStore for Arc<S> {
    fn get(&self, key: &IvHistoryKey) -> Result<Vec<IvHistoryPoint>, RiskError> {
        (**self).get(key)
    }

    fn append(
        &self,
        key: &IvHistoryKey,
        point: IvHistoryPoint,
        max_len: usize,
    ) -> Result<AppendOutcome, RiskError> {
        (**self).append(key, point, max_len)
    }

    fn count(&self, key: &IvHistoryKey) -> Result<usize, RiskError> {
        (**self).count(key)
    }
}

type Series = Arc<Mutex<Vec<IvHistoryPoint>>>;

/// Process-local [`IvHistoryStore`].
#[derive(Debug, Default)]
pub struct InMemoryIvHistoryStore {
    series: RwLock<HashMap<IvHistoryKey, Series>>,
}

impl InMemoryIvHistoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a series.
    pub fn key_count(&self) -> usize {
        self.series
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn existing(&self, key: &IvHistoryKey) -> Option<Series> {
        self.series
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn get_or_create(&self, key: &IvHistoryKey) -> Series {
        if let Some(series) = self.existing(key) {
            return series;
        }
        self.series
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default()
            .clone()
    }
}

impl IvHistoryStore for InMemoryIvHistoryStore {
    fn get(&self, key: &IvHistoryKey) -> Result<Vec<IvHistoryPoint>, RiskError> {
        Ok(self
            .existing(key)
            .map(|series| series.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .unwrap_or_default())
    }

    fn append(
        &self,
        key: &IvHistoryKey,
        point: IvHistoryPoint,
        max_len: usize,
    ) -> Result<AppendOutcome, RiskError> {
        let series = self.get_or_create(key);
        let mut points = series.lock().unwrap_or_else(PoisonError::into_inner);
        if points.iter().any(|p| p.date == point.date) {
            return Ok(AppendOutcome::Duplicate);
        }
        points.push(point);
        let evicted = points.len().saturating_sub(max_len);
        points.drain(..evicted);
        Ok(AppendOutcome::Appended { evicted })
    }

    fn count(&self, key: &IvHistoryKey) -> Result<usize, RiskError> {
        Ok(self
            .existing(key)
            .map_or(0, |series| series.lock().unwrap_or_else(PoisonError::into_inner).len()))
    }
}

/// Applies the once-per-day, fixed-window rules on top of a store.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use pricer_risk::volatility::{InMemoryIvHistoryStore, IvHistoryKey, IvHistoryRecorder};
///
/// let recorder = IvHistoryRecorder::new(InMemoryIvHistoryStore::new());
/// let key = IvHistoryKey::new("NIFTY", NaiveDate::from_ymd_opt(2024, 6, 27).unwrap());
/// let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
///
/// assert!(recorder.record(&key, today, 0.14).unwrap());
/// assert!(!recorder.record(&key, today, 0.15).unwrap());
/// assert_eq!(recorder.history(&key).unwrap().len(), 1);
/// assert!(!recorder.has_enough_history(&key, 30).unwrap());
/// ```
#[derive(Debug)]
pub struct IvHistoryRecorder<S> {
    store: S,
    window: usize,
}

impl<S: IvHistoryStore> IvHistoryRecorder<S> {
    /// Creates a recorder with the standard 252-day window.
    pub fn new(store: S) -> Self {
        Self {
            store,
            window: IV_HISTORY_WINDOW,
        }
    }

    /// Creates a recorder with a custom window.
    ///
    /// # Errors
    /// `RiskError::InvalidConfig` if `window == 0`.
    pub fn with_window(store: S, window: usize) -> Result<Self, RiskError> {
        if window == 0 {
            return Err(RiskError::InvalidConfig(
                "IV history window must be positive".to_string(),
            ));
        }
        Ok(Self { store, window })
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Window length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Records the IV observed on `date`.
    ///
    /// Returns `false` if `date` was already recorded for `key`.
    ///
    /// # Errors
    /// - `RiskError::InvalidInput` for a non-positive or non-finite IV
    /// - any store error
    pub fn record(&self, key: &IvHistoryKey, date: NaiveDate, iv: f64) -> Result<bool, RiskError> {
        if !(iv > 0.0 && iv.is_finite()) {
            return Err(RiskError::InvalidInput(format!(
                "implied volatility must be positive, got {}",
                iv
            )));
        }

        match self.store.append(key, IvHistoryPoint::new(date, iv), self.window)? {
            AppendOutcome::Duplicate => Ok(false),
            AppendOutcome::Appended { evicted } => {
                debug!(key = %key, %date, iv, "recorded IV observation");
                if evicted > 0 {
                    trace!(key = %key, evicted, "evicted IV observations");
                }
                Ok(true)
            }
        }
    }

    /// Stored series for `key`, oldest first.
    pub fn history(&self, key: &IvHistoryKey) -> Result<Vec<IvHistoryPoint>, RiskError> {
        self.store.get(key)
    }

    /// Whether at least `min_days` observations are stored.
    pub fn has_enough_history(&self, key: &IvHistoryKey, min_days: usize) -> Result<bool, RiskError> {
        Ok(self.store.count(key)? >= min_days)
    }

    /// Stored history when at least [`DEFAULT_MIN_HISTORY_DAYS`] observations
    /// exist, otherwise a simulated year ending at `as_of`.
    ///
    /// The flag is `true` when the series is simulated.
    pub fn history_or_simulated(
        &self,
        key: &IvHistoryKey,
        current_iv: f64,
        as_of: NaiveDate,
        rng: &mut PricerRng,
    ) -> Result<(Vec<IvHistoryPoint>, bool), RiskError> {
        if self.has_enough_history(key, DEFAULT_MIN_HISTORY_DAYS)? {
            return Ok((self.history(key)?, false));
        }
        let simulated = simulate_iv_history(
            current_iv,
            base_iv_for_symbol(&key.symbol),
            as_of,
            self.window,
            rng,
        );
        Ok((simulated, true))
    }
}

const MEAN_REVERSION: f64 = 0.1;
const NOISE_WIDTH: f64 = 0.08;
const MIN_SIMULATED_IV: f64 = 0.10;
const MAX_WALK_IV: f64 = 0.60;
const CLUSTER_SCALE_DAYS: f64 = 30.0;
const CLUSTER_AMPLITUDE: f64 = 0.03;

/// Long-run IV level used for simulated history.
///
/// Bank indices revert to 25%, financial-services indices to 22%, anything
/// else to 20%. Matching is case-insensitive.
pub fn base_iv_for_symbol(symbol: &str) -> f64 {
    let symbol = symbol.to_ascii_uppercase();
    if symbol.contains("BANK") {
        0.25
    } else if symbol.contains("FIN") {
        0.22
    } else {
        0.20
    }
}

/// Simulates `days + 1` daily IV observations ending at `end_date`.
///
/// Starting from `current_iv`, each day reverts 10% of the way to `base_iv`,
/// adds uniform noise of ±4 vol points and is bounded to [0.10, 0.60]. A
/// slow cluster term `0.03 × sin(days_back / 30)` (±3 points, a period of
/// 2π × 30 ≈ 188 days) is then added, floored at 0.10, and carried into the
/// next day.
pub fn simulate_iv_history(
    current_iv: f64,
    base_iv: f64,
    end_date: NaiveDate,
    days: usize,
    rng: &mut PricerRng,
) -> Vec<IvHistoryPoint> {
    let mut previous = current_iv;

    (0..=days)
        .rev()
        .map(|days_back| {
            let reversion = (base_iv - previous) * MEAN_REVERSION;
            let noise = (rng.gen_uniform() - 0.5) * NOISE_WIDTH;
            let walked = (previous + reversion + noise).clamp(MIN_SIMULATED_IV, MAX_WALK_IV);

            let cluster = (days_back as f64 / CLUSTER_SCALE_DAYS).sin() * CLUSTER_AMPLITUDE;
            let iv = (walked + cluster).max(MIN_SIMULATED_IV);
            previous = iv;

            IvHistoryPoint::new(end_date - Duration::days(days_back as i64), iv)
        })
        .collect()
}
