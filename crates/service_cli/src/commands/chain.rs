//! Chain command implementation
//!
//! Runs every chain aggregate over one snapshot: max pain, PCR, OI levels,
//! IV skew and moneyness buckets, IV rank against recorded (or simulated)
//! history, buildup against a previous snapshot and the activity scan.

use chrono::NaiveDate;
use clap::Args;
use pricer_models::instruments::OptionChain;
use pricer_pricing::rng::PricerRng;
use pricer_risk::chain::{
    calculate_max_pain, calculate_pcr_with, detect_chain_buildup, support_resistance,
    ActivityScanner, ActivitySignal, BuildupSignal, MaxPainResult, PcrResult, SupportResistance,
};
use pricer_risk::volatility::{
    analyze_iv_by_moneyness, atm_implied_vol, build_strike_iv_table, calculate_iv_rank_with,
    calculate_iv_skew_with, InMemoryIvHistoryStore, IvHistoryKey, IvHistoryPoint,
    IvHistoryRecorder, IvRankResult, IvSkewResult, MoneynessIvBreakdown,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::input::{load_chain, load_history};
use super::output::{num, pct, print_json, Table};
use super::valuation_date;
use crate::config::{EngineConfig, OutputFormat};
use crate::Result;

/// Arguments of `optlab chain`
#[derive(Debug, Clone, Args)]
pub struct ChainArgs {
    /// JSON file with the current chain snapshot
    #[arg(short, long)]
    pub file: PathBuf,

    /// JSON file with the previous snapshot, enables buildup detection
    #[arg(short, long)]
    pub previous: Option<PathBuf>,

    /// JSON file with recorded `{date, iv}` observations
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Seed for simulated history when too little is recorded
    #[arg(long)]
    pub seed: Option<u64>,

    /// Snapshot date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<String>,
}

/// Everything the chain command reports
#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    pub symbol: String,
    pub expiry: NaiveDate,
    pub spot: f64,
    pub max_pain: MaxPainResult,
    pub pcr: PcrResult,
    pub levels: SupportResistance,
    pub atm_iv: f64,
    pub iv_rank: IvRankResult,
    pub simulated_history: bool,
    pub skew: IvSkewResult,
    pub moneyness: MoneynessIvBreakdown,
    pub buildup: Vec<BuildupSignal>,
    pub activity: Vec<ActivitySignal>,
}

/// Runs every aggregate over `chain`.
///
/// `history` is recorded before today's ATM IV; with fewer than 30
/// observations a simulated year seeded from `rng` stands in.
pub fn analyse_chain(
    chain: &OptionChain,
    previous: Option<&OptionChain>,
    history: &[IvHistoryPoint],
    as_of: NaiveDate,
    rng: &mut PricerRng,
    config: &EngineConfig,
) -> Result<ChainReport> {
    let table = build_strike_iv_table(chain);
    let atm_iv = atm_implied_vol(&table);

    let recorder = IvHistoryRecorder::new(InMemoryIvHistoryStore::new());
    let key = IvHistoryKey::new(chain.symbol(), chain.expiry());
    for point in history {
        recorder.record(&key, point.date, point.iv)?;
    }
    recorder.record(&key, as_of, atm_iv)?;
    let (series, simulated_history) = recorder.history_or_simulated(&key, atm_iv, as_of, rng)?;
    debug!(%key, points = series.len(), simulated_history, "IV history ready");

    let buildup = match previous {
        Some(previous) => detect_chain_buildup(chain, previous, &config.buildup),
        None => Vec::new(),
    };

    Ok(ChainReport {
        symbol: chain.symbol().to_string(),
        expiry: chain.expiry(),
        spot: chain.spot(),
        max_pain: calculate_max_pain(chain.rows())?,
        pcr: calculate_pcr_with(chain.rows(), &config.pcr),
        levels: support_resistance(chain.rows()),
        atm_iv,
        iv_rank: calculate_iv_rank_with(&series, atm_iv, &config.iv_rank),
        simulated_history,
        skew: calculate_iv_skew_with(&table, &config.skew),
        moneyness: analyze_iv_by_moneyness(&table),
        buildup,
        activity: ActivityScanner::new(config.activity).scan(chain),
    })
}

/// Run the chain command
pub fn run(args: &ChainArgs, config: &EngineConfig) -> Result<()> {
    let chain = load_chain(&args.file)?;
    let previous = args.previous.as_deref().map(load_chain).transpose()?;
    let history = match &args.history {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };
    let as_of = valuation_date(args.as_of.as_deref())?;
    let mut rng = match args.seed {
        Some(seed) => PricerRng::from_seed(seed),
        None => PricerRng::from_entropy(),
    };

    let report = analyse_chain(&chain, previous.as_ref(), &history, as_of, &mut rng, config)?;
    info!(
        symbol = %report.symbol,
        strikes = chain.rows().len(),
        max_pain = report.max_pain.max_pain_strike,
        "Analysed chain"
    );

    match config.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            print_tables(&report);
            Ok(())
        }
    }
}

fn strikes(levels: &[f64]) -> String {
    levels.iter().map(|s| num(*s, 0)).collect::<Vec<_>>().join(", ")
}

fn print_tables(report: &ChainReport) {
    let history_label = if report.simulated_history {
        "IV history (simulated)"
    } else {
        "IV history (recorded)"
    };

    Table::key_value([
        ("Symbol", report.symbol.clone()),
        ("Expiry", report.expiry.to_string()),
        ("Spot", num(report.spot, 2)),
        ("Max pain", num(report.max_pain.max_pain_strike, 0)),
        ("PCR (OI)", num(report.pcr.pcr_by_oi, 2)),
        ("PCR (volume)", num(report.pcr.pcr_by_volume, 2)),
        ("PCR reading", report.pcr.interpretation.clone()),
        ("Support", strikes(&report.levels.support)),
        ("Resistance", strikes(&report.levels.resistance)),
    ])
    .print(Some("Chain summary"));

    Table::key_value([
        ("ATM IV", pct(report.atm_iv)),
        ("IV rank", num(report.iv_rank.iv_rank, 1)),
        ("IV percentile", num(report.iv_rank.iv_percentile, 1)),
        ("52w high", pct(report.iv_rank.high_52w)),
        ("52w low", pct(report.iv_rank.low_52w)),
        ("52w mean", pct(report.iv_rank.mean_52w)),
        ("Rank reading", report.iv_rank.interpretation.clone()),
        ("Average skew", pct(report.skew.avg_skew)),
        ("Skew reading", report.skew.interpretation.clone()),
    ])
    .print(Some(history_label));

    let mut buckets = Table::new(&["Moneyness", "Strikes", "Avg call IV", "Avg put IV"]);
    for (label, bucket) in [
        ("ITM", &report.moneyness.itm),
        ("ATM", &report.moneyness.atm),
        ("OTM", &report.moneyness.otm),
    ] {
        buckets.row(vec![
            label.to_string(),
            bucket.count.to_string(),
            pct(bucket.avg_call_iv),
            pct(bucket.avg_put_iv),
        ]);
    }
    buckets.print(Some("IV by moneyness"));

    let mut buildup = Table::new(&["Strike", "Signals"]);
    for signal in &report.buildup {
        buildup.row(vec![num(signal.strike, 0), signal.signals.join("; ")]);
    }
    buildup.print(Some("OI buildup"));

    let mut activity = Table::new(&["Strike", "Type", "Activity", "OI chg %", "Volume", "Strength"]);
    for signal in &report.activity {
        activity.row(vec![
            num(signal.strike, 0),
            signal.option_type.to_string(),
            signal.activity.to_string(),
            num(signal.oi_change_pct, 1),
            signal.volume.to_string(),
            signal.strength.to_string(),
        ]);
    }
    activity.print(Some("Unusual activity"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pricer_core::types::OptionType;
    use pricer_models::instruments::{OptionQuote, StrikeRow};
    use pricer_risk::chain::PcrSignal;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 28).unwrap()
    }

    fn chain(call_oi: u64, put_oi: u64) -> OptionChain {
        let rows = [21_900.0, 22_000.0, 22_100.0]
            .iter()
            .map(|&strike| {
                StrikeRow::new(
                    strike,
                    Some(
                        OptionQuote::new(strike, OptionType::Call)
                            .with_open_interest(call_oi)
                            .with_volume(call_oi / 4)
                            .with_implied_vol(0.15),
                    ),
                    Some(
                        OptionQuote::new(strike, OptionType::Put)
                            .with_open_interest(put_oi)
                            .with_volume(put_oi / 4)
                            .with_implied_vol(0.19),
                    ),
                )
            })
            .collect();
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
        OptionChain::new("NIFTY", expiry, 22_000.0, rows).unwrap()
    }

    #[test]
    fn test_analyse_without_history_simulates() {
        let config = EngineConfig::default();
        let report =
            analyse_chain(&chain(10_000, 15_000), None, &[], as_of(), &mut PricerRng::from_seed(1), &config)
                .unwrap();

        assert_eq!(report.symbol, "NIFTY");
        assert!(report.simulated_history);
        assert!((report.atm_iv - 0.17).abs() < 1e-12);
        assert!((report.pcr.pcr_by_oi - 1.5).abs() < 1e-12);
        assert_eq!(report.pcr.signal, PcrSignal::Bullish);
        assert_eq!(report.moneyness.atm.count, 1);
        assert!(report.buildup.is_empty());
        assert!(report.iv_rank.iv_rank >= 0.0 && report.iv_rank.iv_rank <= 100.0);
    }

    #[test]
    fn test_analyse_with_recorded_history() {
        let config = EngineConfig::default();
        let history: Vec<IvHistoryPoint> = (1..=40)
            .rev()
            .map(|d| IvHistoryPoint::new(as_of() - Duration::days(d), 0.10 + 0.005 * d as f64))
            .collect();

        let report = analyse_chain(
            &chain(10_000, 15_000),
            None,
            &history,
            as_of(),
            &mut PricerRng::from_seed(1),
            &config,
        )
        .unwrap();

        // 40 recorded points plus today's observation.
        assert!(!report.simulated_history);
        assert!((report.iv_rank.low_52w - 0.105).abs() < 1e-12);
        assert!((report.iv_rank.high_52w - 0.30).abs() < 1e-12);
    }

    #[test]
    fn test_analyse_detects_buildup() {
        let config = EngineConfig::default();
        let previous = chain(10_000, 15_000);
        let current = chain(12_000, 15_000);

        let report = analyse_chain(
            &current,
            Some(&previous),
            &[],
            as_of(),
            &mut PricerRng::from_seed(1),
            &config,
        )
        .unwrap();

        assert_eq!(report.buildup.len(), 3);
        assert!(report.buildup[0].signals[0].contains("Call Buildup"));
    }
}
