use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

use market_risk_core::config::validate_weights;
use market_risk_core::stress::stress_test::{self, StressScenario};
use market_risk_core::types::with_metadata;
use market_risk_core::AssetId;

/// Arguments for a portfolio stress test
#[derive(Args)]
pub struct StressArgs {
    /// Uniform shocked return applied to every asset (e.g. -0.20)
    #[arg(long, default_value = "-0.20", allow_hyphen_values = true)]
    pub shock: Decimal,

    /// Comma-separated ASSET=WEIGHT pairs (e.g. "AAPL=0.4,MSFT=0.3,TSLA=0.3")
    #[arg(long, value_delimiter = ',', default_value = "AAPL=0.4,MSFT=0.3,TSLA=0.3")]
    pub weights: Vec<String>,

    /// Per-asset shock override as ASSET=SHOCK; repeatable
    #[arg(long = "asset-shock", allow_hyphen_values = true)]
    pub asset_shocks: Vec<String>,

    /// Scenario label
    #[arg(long, default_value = "Uniform market crash")]
    pub name: String,
}

/// Parse "NAME=VALUE" into an asset id and a decimal.
fn parse_pair(pair: &str) -> Result<(AssetId, Decimal), Box<dyn std::error::Error>> {
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("Expected ASSET=VALUE, got '{}'", pair))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing asset name in '{}'", pair).into());
    }
    let value: Decimal = value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid number in '{}': {}", pair, e))?;
    Ok((AssetId::from(name), value))
}

pub fn run_stress(args: StressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();

    // Keep the order the weights were given in
    let mut assets = Vec::with_capacity(args.weights.len());
    let mut weights = BTreeMap::new();
    for pair in &args.weights {
        let (asset, weight) = parse_pair(pair)?;
        if weights.insert(asset.clone(), weight).is_some() {
            return Err(format!("Asset '{}' listed twice in --weights", asset).into());
        }
        assets.push(asset);
    }
    validate_weights(&weights)?;

    let mut scenario = StressScenario::uniform(args.shock);
    scenario.name = args.name;
    for pair in &args.asset_shocks {
        let (asset, shock) = parse_pair(pair)?;
        if !weights.contains_key(&asset) {
            return Err(format!("--asset-shock names '{}' which has no weight", asset).into());
        }
        scenario.asset_shocks.insert(asset, shock);
    }

    let result = stress_test::stress_test(&assets, &weights, &scenario)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Weighted Shock Stress Test",
        &scenario,
        Vec::new(),
        elapsed,
        result,
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn args(weights: &[&str], shocks: &[&str]) -> StressArgs {
        StressArgs {
            shock: Decimal::from_str("-0.20").unwrap(),
            weights: weights.iter().map(|s| s.to_string()).collect(),
            asset_shocks: shocks.iter().map(|s| s.to_string()).collect(),
            name: "test".into(),
        }
    }

    #[test]
    fn test_parse_pair() {
        let (asset, value) = parse_pair("TSLA=-0.5").unwrap();
        assert_eq!(asset.as_str(), "TSLA");
        assert_eq!(value, Decimal::from_str("-0.5").unwrap());
        assert!(parse_pair("TSLA").is_err());
        assert!(parse_pair("=0.1").is_err());
        assert!(parse_pair("TSLA=abc").is_err());
    }

    #[test]
    fn test_uniform_stress_command() {
        let value = run_stress(args(&["AAPL=0.4", "MSFT=0.3", "TSLA=0.3"], &[])).unwrap();
        let loss = Decimal::from_str(value["result"]["portfolio_loss"].as_str().unwrap()).unwrap();
        assert_eq!(loss, Decimal::from_str("-0.2").unwrap());
        assert_eq!(value["result"]["positions"][0]["asset"], "AAPL");
    }

    #[test]
    fn test_weights_not_summing_to_one_rejected() {
        assert!(run_stress(args(&["AAPL=0.5", "MSFT=0.3"], &[])).is_err());
    }

    #[test]
    fn test_override_for_unknown_asset_rejected() {
        assert!(run_stress(args(&["AAPL=1.0"], &["TSLA=-0.5"])).is_err());
    }
}
