//! Backtest command implementation

use clap::Args;
use pricer_core::types::parse_date;
use pricer_pricing::backtest::{run_backtest, ExpiryHorizon};
use pricer_pricing::rng::PricerRng;
use std::path::PathBuf;
use tracing::info;

use super::input::load_legs;
use super::output::{num, print_json, Table};
use crate::config::{EngineConfig, OutputFormat};
use crate::Result;

/// Arguments of `optlab backtest`
#[derive(Debug, Clone, Args)]
pub struct BacktestArgs {
    /// JSON file with the strategy legs
    #[arg(short, long)]
    pub file: PathBuf,

    /// Starting capital
    #[arg(long, default_value = "100000")]
    pub capital: f64,

    /// Simulated trading days, defaults to `backtest.days`
    #[arg(short, long)]
    pub days: Option<usize>,

    /// RNG seed; drawn from OS entropy when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Starting underlying price, defaults to the first leg's strike
    #[arg(long)]
    pub spot: Option<f64>,

    /// First simulated date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start: Option<String>,

    /// Expire legs on their own expiry dates instead of a fixed horizon
    #[arg(long)]
    pub leg_expiry: bool,
}

/// Run the backtest command
pub fn run(args: &BacktestArgs, config: &EngineConfig) -> Result<()> {
    let legs = load_legs(&args.file)?;

    let mut settings = config.backtest.clone();
    if let Some(days) = args.days {
        settings.days = days;
    }
    if let Some(spot) = args.spot {
        settings.spot = Some(spot);
    }
    if let Some(start) = &args.start {
        settings.start_date = Some(parse_date(start)?);
    }
    if args.leg_expiry {
        settings.horizon = ExpiryHorizon::LegExpiry;
    }

    let mut rng = match args.seed {
        Some(seed) => PricerRng::from_seed(seed),
        None => PricerRng::from_entropy(),
    };
    info!(seed = rng.seed(), "Backtest RNG ready");

    let result = run_backtest(&legs, args.capital, &settings, &mut rng)?;

    match config.format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Table => {
            let m = &result.metrics;
            let final_equity = result.equity_curve.last().copied().unwrap_or(args.capital);
            Table::key_value([
                ("Seed", result.seed.to_string()),
                ("Days", settings.days.to_string()),
                ("Final equity", num(final_equity, 2)),
                ("Total return", format!("{}%", num(m.total_return, 2))),
                ("CAGR", format!("{}%", num(m.cagr, 2))),
                ("Sharpe ratio", num(m.sharpe_ratio, 2)),
                ("Max drawdown", format!("{}%", num(m.max_drawdown, 2))),
                ("Win rate", format!("{}%", num(m.win_rate, 1))),
                ("Checkpoints", m.total_trades.to_string()),
                ("Avg profit", num(m.avg_profit, 2)),
                ("Avg loss", num(m.avg_loss, 2)),
            ])
            .print(Some("Backtest summary"));

            let mut trades = Table::new(&["Date", "P&L", "Outcome"]);
            for trade in &result.trades {
                trades.row(vec![
                    trade.date.to_string(),
                    num(trade.pnl, 2),
                    format!("{:?}", trade.outcome),
                ]);
            }
            trades.print(Some("Checkpoints"));
            Ok(())
        }
    }
}
