//! optlab CLI - Command Line Front End for the Options Analytics Engine
//!
//! This is the operational entry point for the optlab pricing and analytics
//! crates.
//!
//! # Commands
//!
//! - `optlab price` - Black-Scholes price and Greeks for one option
//! - `optlab iv` - Implied volatility from an observed price
//! - `optlab chain --file <chain.json>` - Chain aggregates and IV analytics
//! - `optlab margin --file <legs.json> --spot <S>` - Margin estimate
//! - `optlab backtest --file <legs.json>` - Path-simulated strategy backtest
//! - `optlab payoff --file <legs.json> --spot <S>` - Expiry payoff and Greeks
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate loads configuration, sets up
//! logging and hands validated inputs to the pricer crates below it.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::backtest::BacktestArgs;
use commands::chain::ChainArgs;
use commands::iv::IvArgs;
use commands::margin::MarginArgs;
use commands::payoff::PayoffArgs;
use commands::price::PriceArgs;
use config::{build_config, CliArgs, LogLevel, OutputFormat};

/// optlab Options Analytics CLI
#[derive(Parser)]
#[command(name = "optlab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to optlab.toml when present)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European option and its Greeks
    Price(PriceArgs),

    /// Solve implied volatility from an observed price
    Iv(IvArgs),

    /// Analyse an option chain snapshot
    Chain(ChainArgs),

    /// Estimate margin for a strategy
    Margin(MarginArgs),

    /// Backtest a strategy on a simulated price path
    Backtest(BacktestArgs),

    /// Expiry payoff profile and position Greeks of a strategy
    Payoff(PayoffArgs),
}

fn init_tracing(level: LogLevel) {
    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config_file: cli.config.clone(),
        log_level: cli.log_level.clone(),
        verbose: cli.verbose,
        format: cli.format,
    };
    let config = build_config(&args).context("failed to load configuration")?;

    init_tracing(config.log_level);
    info!(log_level = %config.log_level, "optlab starting");
    debug!(?config, "Effective configuration");

    let outcome = match &cli.command {
        Commands::Price(args) => commands::price::run(args, &config),
        Commands::Iv(args) => commands::iv::run(args, &config),
        Commands::Chain(args) => commands::chain::run(args, &config),
        Commands::Margin(args) => commands::margin::run(args, &config),
        Commands::Backtest(args) => commands::backtest::run(args, &config),
        Commands::Payoff(args) => commands::payoff::run(args, &config),
    };

    outcome.context("command failed")
}
