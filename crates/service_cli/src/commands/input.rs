//! JSON input files
//!
//! Library value objects validate on construction, so files are decoded into
//! plain input records first and then passed through the checked
//! constructors.

use chrono::NaiveDate;
use pricer_core::types::OptionType;
use pricer_models::instruments::{OptionChain, StrategyLeg, StrikeRow, TradeAction};
use pricer_risk::volatility::IvHistoryPoint;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

use crate::{CliError, Result};

/// One strategy leg as written in a legs file
#[derive(Debug, Clone, Deserialize)]
pub struct LegInput {
    pub option_type: OptionType,
    pub action: TradeAction,
    pub strike: f64,
    pub premium: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub expiry: NaiveDate,
}

fn default_quantity() -> u32 {
    1
}

impl LegInput {
    /// Validates the leg.
    pub fn into_leg(self) -> Result<StrategyLeg> {
        Ok(StrategyLeg::new(
            self.option_type,
            self.action,
            self.strike,
            self.premium,
            self.quantity,
            self.expiry,
        )?)
    }
}

/// Chain snapshot as written in a chain file
#[derive(Debug, Clone, Deserialize)]
pub struct ChainInput {
    pub symbol: String,
    pub expiry: NaiveDate,
    pub spot: f64,
    pub rows: Vec<StrikeRow>,
}

impl ChainInput {
    /// Validates and sorts the ladder.
    pub fn into_chain(self) -> Result<OptionChain> {
        Ok(OptionChain::new(self.symbol, self.expiry, self.spot, self.rows)?)
    }
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Reads and decodes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    decode(&read_file(path)?, &path.display().to_string())
}

fn decode<T: DeserializeOwned>(content: &str, source: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| CliError::Parse(format!("{}: {}", source, e)))
}

/// Decodes a JSON array of legs.
pub fn parse_legs(content: &str, source: &str) -> Result<Vec<StrategyLeg>> {
    let inputs: Vec<LegInput> = decode(content, source)?;
    if inputs.is_empty() {
        return Err(CliError::InvalidArgument(format!("{}: no legs", source)));
    }
    inputs.into_iter().map(LegInput::into_leg).collect()
}

/// Loads a legs file.
pub fn load_legs(path: &Path) -> Result<Vec<StrategyLeg>> {
    parse_legs(&read_file(path)?, &path.display().to_string())
}

/// Decodes a chain snapshot.
pub fn parse_chain(content: &str, source: &str) -> Result<OptionChain> {
    decode::<ChainInput>(content, source)?.into_chain()
}

/// Loads a chain file.
pub fn load_chain(path: &Path) -> Result<OptionChain> {
    parse_chain(&read_file(path)?, &path.display().to_string())
}

/// Loads a JSON array of `{date, iv}` observations.
pub fn load_history(path: &Path) -> Result<Vec<IvHistoryPoint>> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGS: &str = r#"[
        {"option_type": "call", "action": "buy", "strike": 22000, "premium": 150, "expiry": "2024-06-27"},
        {"option_type": "call", "action": "sell", "strike": 22200, "premium": 80, "quantity": 2, "expiry": "2024-06-27"}
    ]"#;

    const CHAIN: &str = r#"{
        "symbol": "NIFTY",
        "expiry": "2024-06-27",
        "spot": 22000,
        "rows": [
            {"strike": 22100,
             "call": {"strike": 22100, "option_type": "call", "open_interest": 9000},
             "put": {"strike": 22100, "option_type": "put", "open_interest": 4000}},
            {"strike": 21900,
             "call": {"strike": 21900, "option_type": "call", "open_interest": 3000, "implied_vol": 0.16}}
        ]
    }"#;

    #[test]
    fn test_parse_legs() {
        let legs = parse_legs(LEGS, "legs.json").unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].quantity(), 1);
        assert_eq!(legs[1].action(), TradeAction::Sell);
        assert_eq!(legs[1].quantity(), 2);
        assert_eq!(legs[1].expiry(), NaiveDate::from_ymd_opt(2024, 6, 27).unwrap());
    }

    #[test]
    fn test_parse_legs_validates() {
        let bad = r#"[{"option_type": "put", "action": "sell", "strike": -5, "premium": 10, "expiry": "2024-06-27"}]"#;
        assert!(matches!(parse_legs(bad, "bad.json"), Err(CliError::Instrument(_))));
        assert!(matches!(parse_legs("[]", "empty.json"), Err(CliError::InvalidArgument(_))));
        assert!(matches!(parse_legs("{", "broken.json"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_parse_chain_sorts_rows() {
        let chain = parse_chain(CHAIN, "chain.json").unwrap();
        assert_eq!(chain.symbol(), "NIFTY");
        assert_eq!(chain.rows().len(), 2);
        assert_eq!(chain.rows()[0].strike, 21_900.0);
        assert!(chain.rows()[0].put.is_none());
        assert_eq!(chain.rows()[1].call_oi(), 9_000);
    }

    #[test]
    fn test_parse_chain_rejects_bad_spot() {
        let bad = CHAIN.replace("\"spot\": 22000", "\"spot\": 0");
        assert!(matches!(parse_chain(&bad, "chain.json"), Err(CliError::Instrument(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_legs(Path::new("/nonexistent/legs.json"));
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }
}
