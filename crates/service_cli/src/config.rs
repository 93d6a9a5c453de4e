//! Engine configuration management
//!
//! Settings are layered from a TOML file, `OPTLAB_*` environment variables
//! and command-line flags, in increasing order of precedence.

use pricer_models::analytical::ImpliedVolConfig;
use pricer_pricing::backtest::BacktestConfig;
use pricer_risk::chain::{ActivityThresholds, BuildupThresholds, PcrThresholds};
use pricer_risk::margin::MarginConfig;
use pricer_risk::payoff::PayoffGrid;
use pricer_risk::volatility::{IvRankThresholds, SkewThresholds};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default configuration file, read only when present.
pub const DEFAULT_CONFIG_FILE: &str = "optlab.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Rendering of command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Market inputs used when a command does not supply them
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarketDefaults {
    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,
    /// Volatility for Greeks when none is given
    pub volatility: f64,
    /// Contract multiplier for payoff and position Greeks
    pub lot_size: u32,
}

impl Default for MarketDefaults {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.07,
            volatility: 0.20,
            lot_size: 50,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Output format
    #[serde(deserialize_with = "deserialize_format")]
    pub format: OutputFormat,
    /// Market defaults
    pub market: MarketDefaults,
    /// Implied volatility solver
    pub implied_vol: ImpliedVolConfig,
    /// IV rank interpretation bands
    pub iv_rank: IvRankThresholds,
    /// Skew bias bands
    pub skew: SkewThresholds,
    /// Put-call ratio signal bands
    pub pcr: PcrThresholds,
    /// OI buildup detection
    pub buildup: BuildupThresholds,
    /// Unusual activity scanner
    pub activity: ActivityThresholds,
    /// Margin estimator
    pub margin: MarginConfig,
    /// Path-simulation backtester
    pub backtest: BacktestConfig,
    /// Payoff grid
    pub payoff: PayoffGrid,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OutputFormat::from_str(&s).map_err(serde::de::Error::custom)
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={} could not be parsed", name, value)))
}

impl EngineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `OPTLAB_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply `OPTLAB_*` overrides through an arbitrary lookup
    ///
    /// `OPTLAB_LOT_SIZE` sets the lot size of the market defaults, the margin
    /// estimator and the backtester together.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("OPTLAB_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(format) = lookup("OPTLAB_FORMAT") {
            self.format = OutputFormat::from_str(&format)?;
        }
        if let Some(rate) = lookup("OPTLAB_RISK_FREE_RATE") {
            let rate = parse_env("OPTLAB_RISK_FREE_RATE", &rate)?;
            self.market.risk_free_rate = rate;
            self.backtest.risk_free_rate = rate;
        }
        if let Some(vol) = lookup("OPTLAB_VOLATILITY") {
            self.market.volatility = parse_env("OPTLAB_VOLATILITY", &vol)?;
        }
        if let Some(lot) = lookup("OPTLAB_LOT_SIZE") {
            let lot = parse_env("OPTLAB_LOT_SIZE", &lot)?;
            self.market.lot_size = lot;
            self.margin.lot_size = lot;
            self.backtest.lot_size = lot;
        }
        if let Some(days) = lookup("OPTLAB_BACKTEST_DAYS") {
            self.backtest.days = parse_env("OPTLAB_BACKTEST_DAYS", &days)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: &dyn std::fmt::Display| ConfigError::Invalid(e.to_string());

        if !self.market.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "market.risk_free_rate must be finite, got {}",
                self.market.risk_free_rate
            )));
        }
        if !(self.market.volatility > 0.0 && self.market.volatility.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "market.volatility must be positive, got {}",
                self.market.volatility
            )));
        }
        if self.market.lot_size == 0 {
            return Err(ConfigError::Invalid("market.lot_size must be positive".into()));
        }

        let iv = &self.implied_vol;
        if iv.max_iterations == 0
            || !(iv.tolerance > 0.0)
            || !(iv.min_vol > 0.0 && iv.min_vol < iv.max_vol)
            || !(iv.initial_guess >= iv.min_vol && iv.initial_guess <= iv.max_vol)
        {
            return Err(ConfigError::Invalid(format!(
                "implied_vol needs iterations > 0, tolerance > 0 and min_vol <= initial_guess <= max_vol, got {:?}",
                iv
            )));
        }

        self.iv_rank.validate().map_err(|e| invalid(&e))?;
        self.skew.validate().map_err(|e| invalid(&e))?;
        self.pcr.validate().map_err(|e| invalid(&e))?;
        self.buildup.validate().map_err(|e| invalid(&e))?;
        self.activity.validate().map_err(|e| invalid(&e))?;
        self.margin.validate().map_err(|e| invalid(&e))?;
        self.backtest.validate().map_err(|e| invalid(&e))?;

        if self.payoff.steps == 0 || !(self.payoff.range_pct > 0.0 && self.payoff.range_pct < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "payoff needs steps > 0 and range_pct in (0, 1), got {} / {}",
                self.payoff.steps, self.payoff.range_pct
            )));
        }

        Ok(())
    }
}

/// Global CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Forces debug logging
    pub verbose: bool,
    /// Output format override
    pub format: Option<OutputFormat>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (an explicit path must exist; `optlab.toml` is optional)
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<EngineConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => EngineConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            EngineConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => EngineConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}
