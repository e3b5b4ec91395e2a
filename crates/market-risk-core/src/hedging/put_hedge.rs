use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::types::{AssetId, Return};
use crate::RiskResult;

/// Protective hedge on a single asset, modelled as a constant offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HedgeConfig {
    pub asset: AssetId,
    /// Hedge cost as a return (e.g. 0.02 option premium)
    pub cost: f64,
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            asset: "TSLA".into(),
            cost: 0.02,
        }
    }
}

impl HedgeConfig {
    pub fn validate(&self) -> RiskResult<()> {
        validate_cost(self.cost)
    }
}

/// Hedged VaR for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeResult {
    pub asset: AssetId,
    pub unhedged_var: Return,
    pub hedge_cost: f64,
    pub hedged_var: Return,
    /// hedged_var - unhedged_var
    pub var_reduction: Return,
}

fn validate_cost(cost: f64) -> RiskResult<()> {
    if !cost.is_finite() || cost <= 0.0 {
        return Err(RiskError::InvalidInput {
            field: "hedge.cost".into(),
            reason: format!("Hedge cost must be positive and finite, got {cost}"),
        });
    }
    Ok(())
}

/// Hedged VaR = historical VaR + hedge cost.
///
/// The hedge shifts the tail by a constant; the option's floor on losses is
/// not modelled.
pub fn hedge_var(asset: &AssetId, historical_var: Return, cost: f64) -> RiskResult<HedgeResult> {
    validate_cost(cost)?;
    if !historical_var.is_finite() {
        return Err(RiskError::InvalidInput {
            field: "historical_var".into(),
            reason: "VaR must be finite".into(),
        });
    }
    let hedged_var = historical_var + cost;
    Ok(HedgeResult {
        asset: asset.clone(),
        unhedged_var: historical_var,
        hedge_cost: cost,
        hedged_var,
        var_reduction: hedged_var - historical_var,
    })
}
