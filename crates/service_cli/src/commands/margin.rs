//! Margin command implementation

use clap::Args;
use pricer_risk::margin::MarginCalculator;
use std::path::PathBuf;
use tracing::info;

use super::input::load_legs;
use super::output::{num, print_json, Table};
use crate::config::{EngineConfig, OutputFormat};
use crate::Result;

/// Arguments of `optlab margin`
#[derive(Debug, Clone, Args)]
pub struct MarginArgs {
    /// JSON file with the strategy legs
    #[arg(short, long)]
    pub file: PathBuf,

    /// Underlying price
    #[arg(short, long)]
    pub spot: f64,
}

/// Run the margin command
pub fn run(args: &MarginArgs, config: &EngineConfig) -> Result<()> {
    let legs = load_legs(&args.file)?;
    let margin = MarginCalculator::new(config.margin).calculate(&legs, args.spot)?;
    info!(
        legs = legs.len(),
        total_margin = margin.total_margin,
        "Estimated margin"
    );

    match config.format {
        OutputFormat::Json => print_json(&margin),
        OutputFormat::Table => {
            Table::key_value([
                ("SPAN margin", num(margin.span_margin, 2)),
                ("Exposure margin", num(margin.exposure_margin, 2)),
                ("Hedge benefit", num(margin.hedge_benefit, 2)),
                ("Net premium", num(margin.net_premium, 2)),
                ("Total margin", num(margin.total_margin, 2)),
            ])
            .print(Some("Margin estimate"));

            let mut breakdown = Table::new(&["Breakdown"]);
            for line in &margin.breakdown {
                breakdown.row(vec![line.clone()]);
            }
            breakdown.print(None);
            Ok(())
        }
    }
}
