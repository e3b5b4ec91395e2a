use clap::Args;
use serde_json::Value;
use std::time::Instant;

use market_risk_core::hedging::put_hedge;
use market_risk_core::types::with_metadata;
use market_risk_core::AssetId;

/// Arguments for a constant-offset hedge adjustment
#[derive(Args)]
pub struct HedgeArgs {
    /// Unhedged historical VaR as a return (e.g. -0.05)
    #[arg(long, allow_hyphen_values = true)]
    pub var: f64,

    /// Hedge cost as a return (e.g. 0.02 option premium)
    #[arg(long, default_value = "0.02")]
    pub cost: f64,

    /// Hedged asset
    #[arg(long, default_value = "TSLA")]
    pub asset: String,
}

pub fn run_hedge(args: HedgeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let asset = AssetId::from(args.asset);
    let result = put_hedge::hedge_var(&asset, args.var, args.cost)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Constant-Offset Put Hedge",
        &serde_json::json!({
            "asset": asset,
            "hedge_cost": args.cost,
            "model": "hedged_var = historical_var + cost",
        }),
        Vec::new(),
        elapsed,
        result,
    ))?)
}
