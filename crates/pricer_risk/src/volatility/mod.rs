//! Implied-volatility analytics.
//!
//! - [`rank`]: IV rank and percentile against a trailing history
//! - [`skew`]: per-strike call/put IV table, skew and moneyness buckets
//! - [`history`]: rolling per-(symbol, expiry) IV window behind an injected
//!   store, plus simulated demo history

pub mod history;
pub mod rank;
pub mod skew;

pub use history::{
    base_iv_for_symbol, simulate_iv_history, AppendOutcome, InMemoryIvHistoryStore,
    IvHistoryKey, IvHistoryPoint, IvHistoryRecorder, IvHistoryStore, DEFAULT_MIN_HISTORY_DAYS,
    IV_HISTORY_WINDOW,
};
pub use rank::{calculate_iv_rank, calculate_iv_rank_with, IvRankResult, IvRankThresholds};
pub use skew::{
    analyze_iv_by_moneyness, atm_implied_vol, build_strike_iv_table, calculate_iv_skew,
    calculate_iv_skew_with, IvSkewResult, MoneynessBucket, MoneynessIvBreakdown, SkewBias,
    SkewThresholds, StrikeIvRecord,
};
