//! Price command implementation
//!
//! Black-Scholes price and Greeks for one European option.

use clap::Args;
use pricer_core::types::{Moneyness, OptionType};
use pricer_models::analytical::{BlackScholes, Greeks};
use serde::Serialize;
use tracing::info;

use super::output::{num, pct, print_json, Table};
use super::ContractArgs;
use crate::config::{EngineConfig, OutputFormat};
use crate::Result;

/// Arguments of `optlab price`
#[derive(Debug, Clone, Args)]
pub struct PriceArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Volatility as a fraction (0.20 = 20%), defaults to `market.volatility`
    #[arg(long)]
    pub vol: Option<f64>,
}

#[derive(Debug, Serialize)]
struct PriceReport {
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    volatility: f64,
    moneyness: Moneyness,
    price: f64,
    greeks: Greeks,
}

/// Run the price command
pub fn run(args: &PriceArgs, config: &EngineConfig) -> Result<()> {
    let contract = &args.contract;
    let strike = contract.checked_strike()?;
    let t = contract.time_to_expiry()?;
    let rate = contract.rate.unwrap_or(config.market.risk_free_rate);
    let volatility = args.vol.unwrap_or(config.market.volatility);

    let model = BlackScholes::new(contract.spot, rate, volatility)?;
    let report = PriceReport {
        option_type: contract.option_type,
        spot: contract.spot,
        strike,
        time_to_expiry: t,
        rate,
        volatility,
        moneyness: Moneyness::classify(contract.spot, strike, contract.option_type),
        price: model.price(strike, t, contract.option_type),
        greeks: model.greeks(strike, t, contract.option_type),
    };
    info!(
        option_type = %report.option_type,
        strike,
        t,
        price = report.price,
        "Priced option"
    );

    match config.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            Table::key_value([
                ("Option", format!("{} {}", report.option_type, num(strike, 2))),
                ("Spot", num(report.spot, 2)),
                ("Time to expiry (y)", num(t, 6)),
                ("Rate", pct(rate)),
                ("Volatility", pct(volatility)),
                ("Moneyness", report.moneyness.to_string()),
                ("Price", num(report.price, 4)),
                ("Delta", num(report.greeks.delta, 4)),
                ("Gamma", num(report.greeks.gamma, 6)),
                ("Theta (per day)", num(report.greeks.theta, 4)),
                ("Vega (per vol pt)", num(report.greeks.vega, 4)),
            ])
            .print(None);
            Ok(())
        }
    }
}
