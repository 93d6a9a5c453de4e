//! Payoff command implementation
//!
//! Expiry payoff profile of a strategy, with position Greeks at the given spot.

use clap::Args;
use pricer_models::analytical::Greeks;
use pricer_risk::greeks::{position_greeks, MarketSnapshot};
use pricer_risk::payoff::{payoff_profile, PayoffProfile};
use serde::Serialize;
use std::path::PathBuf;

use super::input::load_legs;
use super::output::{num, print_json, Table};
use super::valuation_date;
use crate::config::{EngineConfig, OutputFormat};
use crate::Result;

/// Grid points shown in table output, every n-th point.
const TABLE_STRIDE: usize = 5;

/// Arguments of `optlab payoff`
#[derive(Debug, Clone, Args)]
pub struct PayoffArgs {
    /// JSON file with the strategy legs
    #[arg(short, long)]
    pub file: PathBuf,

    /// Underlying price
    #[arg(short, long)]
    pub spot: f64,

    /// Volatility for the position Greeks, defaults to `market.volatility`
    #[arg(long)]
    pub vol: Option<f64>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize)]
struct PayoffReport {
    spot: f64,
    lot_size: u32,
    greeks: Greeks,
    profile: PayoffProfile,
}

/// Run the payoff command
pub fn run(args: &PayoffArgs, config: &EngineConfig) -> Result<()> {
    let legs = load_legs(&args.file)?;
    let lot_size = config.market.lot_size;

    let profile = payoff_profile(&legs, args.spot, lot_size, &config.payoff)?;
    let market = MarketSnapshot {
        spot: args.spot,
        rate: config.market.risk_free_rate,
        volatility: args.vol.unwrap_or(config.market.volatility),
        as_of: valuation_date(args.as_of.as_deref())?,
    };
    let greeks = position_greeks(&legs, &market, lot_size)?;

    let report = PayoffReport {
        spot: args.spot,
        lot_size,
        greeks,
        profile,
    };

    match config.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            let breakevens = report
                .profile
                .breakevens
                .iter()
                .map(|b| num(*b, 2))
                .collect::<Vec<_>>()
                .join(", ");
            Table::key_value([
                ("Max profit", num(report.profile.max_profit, 2)),
                ("Max loss", num(report.profile.max_loss, 2)),
                ("Breakevens", breakevens),
                ("Delta", num(greeks.delta, 2)),
                ("Gamma", num(greeks.gamma, 4)),
                ("Theta (per day)", num(greeks.theta, 2)),
                ("Vega (per vol pt)", num(greeks.vega, 2)),
            ])
            .print(Some("Strategy profile"));

            let mut points = Table::new(&["Underlying", "P&L at expiry"]);
            for point in report.profile.points.iter().step_by(TABLE_STRIDE) {
                points.row(vec![num(point.underlying, 2), num(point.pnl, 2)]);
            }
            points.print(None);
            Ok(())
        }
    }
}
