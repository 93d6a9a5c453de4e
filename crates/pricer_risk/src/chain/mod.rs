//! Option chain aggregates.
//!
//! All functions take the ascending strike ladder of an
//! [`OptionChain`](pricer_models::instruments::OptionChain) (or a slice of
//! [`StrikeRow`](pricer_models::instruments::StrikeRow)s) and are pure.
//!
//! - [`calculate_max_pain`]: strike minimising total writer payout at expiry
//! - [`calculate_pcr`]: put-call ratio by OI and volume, read contrarian
//! - [`detect_buildup`]: OI buildup and unwinding against a previous snapshot
//! - [`support_resistance`]: top OI strikes per side
//! - [`scan_chain`]: unusual OI activity scanner

mod buildup;
mod levels;
mod max_pain;
mod pcr;
mod scanner;

pub use buildup::{
    detect_buildup, detect_buildup_with, detect_chain_buildup, BuildupSignal, BuildupThresholds,
    SideActivity,
};
pub use levels::{support_resistance, SupportResistance, LEVEL_COUNT};
pub use max_pain::{calculate_max_pain, MaxPainResult, StrikePain};
pub use pcr::{calculate_pcr, calculate_pcr_with, PcrResult, PcrSignal, PcrThresholds};
pub use scanner::{
    classify_activity, scan_chain, ActivitySignal, ActivityThresholds, ActivityType,
    ActivityScanner, SignalStrength, SymbolActivity,
};
