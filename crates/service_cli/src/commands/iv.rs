//! Implied volatility command implementation

use clap::Args;
use pricer_core::types::OptionType;
use pricer_models::analytical::{ImpliedVol, ImpliedVolSolver};
use serde::Serialize;
use tracing::warn;

use super::output::{num, pct, print_json, Table};
use super::ContractArgs;
use crate::config::{EngineConfig, OutputFormat};
use crate::Result;

/// Arguments of `optlab iv`
#[derive(Debug, Clone, Args)]
pub struct IvArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Observed option price
    #[arg(long)]
    pub price: f64,
}

#[derive(Debug, Serialize)]
struct IvReport {
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    observed_price: f64,
    implied_vol: ImpliedVol,
}

/// Run the iv command
pub fn run(args: &IvArgs, config: &EngineConfig) -> Result<()> {
    let contract = &args.contract;
    let strike = contract.checked_strike()?;
    let t = contract.time_to_expiry()?;
    let rate = contract.rate.unwrap_or(config.market.risk_free_rate);

    let solved = ImpliedVolSolver::new(config.implied_vol).solve(
        args.price,
        contract.spot,
        strike,
        t,
        rate,
        contract.option_type,
    )?;
    if !solved.converged {
        warn!(
            iterations = solved.iterations,
            "Implied volatility is an approximate estimate"
        );
    }

    let report = IvReport {
        option_type: contract.option_type,
        spot: contract.spot,
        strike,
        time_to_expiry: t,
        rate,
        observed_price: args.price,
        implied_vol: solved,
    };

    match config.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            Table::key_value([
                ("Option", format!("{} {}", report.option_type, num(strike, 2))),
                ("Spot", num(report.spot, 2)),
                ("Observed price", num(report.observed_price, 4)),
                ("Implied volatility", pct(solved.volatility)),
                ("Iterations", solved.iterations.to_string()),
                ("Converged", solved.converged.to_string()),
            ])
            .print(None);
            Ok(())
        }
    }
}
