use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::RiskError;
use crate::types::AssetId;
use crate::RiskResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A hypothetical one-period shock.
///
/// `shock` applies to every asset; `asset_shocks` overrides it per asset so
/// that a scenario can hit some holdings harder than others.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StressScenario {
    pub name: String,
    /// Uniform shocked return as a decimal (e.g. -0.20 for a 20% fall)
    pub shock: Decimal,
    pub asset_shocks: BTreeMap<AssetId, Decimal>,
}

impl Default for StressScenario {
    fn default() -> Self {
        Self {
            name: "Uniform market crash".into(),
            shock: dec!(-0.20),
            asset_shocks: BTreeMap::new(),
        }
    }
}

impl StressScenario {
    pub fn uniform(shock: Decimal) -> Self {
        Self {
            shock,
            ..Self::default()
        }
    }

    /// Shocked return applied to `asset`.
    pub fn shock_for(&self, asset: &AssetId) -> Decimal {
        self.asset_shocks.get(asset).copied().unwrap_or(self.shock)
    }
}

/// Stress impact on one holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressedPosition {
    pub asset: AssetId,
    pub weight: Decimal,
    pub shocked_return: Decimal,
    /// weight * shocked_return
    pub contribution: Decimal,
}

/// Output of a portfolio stress test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenario_name: String,
    pub positions: Vec<StressedPosition>,
    /// Portfolio return under the scenario (sum of contributions)
    pub portfolio_loss: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Portfolio stress loss: the dot product of per-asset shocked returns and
/// portfolio weights, evaluated over `assets` in order.
///
/// Every asset must carry a weight.
pub fn stress_test(
    assets: &[AssetId],
    weights: &BTreeMap<AssetId, Decimal>,
    scenario: &StressScenario,
) -> RiskResult<StressTestResult> {
    if assets.is_empty() {
        return Err(RiskError::InsufficientData(
            "Stress test requires at least one asset".into(),
        ));
    }

    let mut positions = Vec::with_capacity(assets.len());
    for asset in assets {
        let weight = *weights.get(asset).ok_or_else(|| RiskError::MissingAsset {
            asset: asset.to_string(),
            table: "weights".into(),
        })?;
        let shocked_return = scenario.shock_for(asset);
        positions.push(StressedPosition {
            asset: asset.clone(),
            weight,
            shocked_return,
            contribution: weight * shocked_return,
        });
    }

    let portfolio_loss: Decimal = positions.iter().map(|p| p.contribution).sum();
    debug!(scenario = %scenario.name, %portfolio_loss, "stress test evaluated");

    Ok(StressTestResult {
        scenario_name: scenario.name.clone(),
        positions,
        portfolio_loss,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> Vec<AssetId> {
        vec!["AAPL".into(), "MSFT".into(), "TSLA".into()]
    }

    fn weights() -> BTreeMap<AssetId, Decimal> {
        BTreeMap::from([
            ("AAPL".into(), dec!(0.4)),
            ("MSFT".into(), dec!(0.3)),
            ("TSLA".into(), dec!(0.3)),
        ])
    }

    #[test]
    fn test_uniform_shock_returns_shock() {
        let result = stress_test(&assets(), &weights(), &StressScenario::uniform(dec!(-0.20))).unwrap();
        assert_eq!(result.portfolio_loss, dec!(-0.20));
        assert_eq!(result.positions.len(), 3);
        assert_eq!(result.positions[0].contribution, dec!(-0.08));
        assert_eq!(result.positions[1].contribution, dec!(-0.06));
    }

    #[test]
    fn test_per_asset_override() {
        let mut scenario = StressScenario::uniform(dec!(-0.20));
        scenario.asset_shocks.insert("TSLA".into(), dec!(-0.50));
        let result = stress_test(&assets(), &weights(), &scenario).unwrap();
        // 0.4 * -0.2 + 0.3 * -0.2 + 0.3 * -0.5
        assert_eq!(result.portfolio_loss, dec!(-0.29));
        assert_eq!(result.positions[2].shocked_return, dec!(-0.50));
    }

    #[test]
    fn test_zero_shock_zero_loss() {
        let result = stress_test(&assets(), &weights(), &StressScenario::uniform(Decimal::ZERO)).unwrap();
        assert!(result.portfolio_loss.is_zero());
    }

    #[test]
    fn test_missing_weight_rejected() {
        let mut w = weights();
        w.remove(&AssetId::from("MSFT"));
        let err = stress_test(&assets(), &w, &StressScenario::default()).unwrap_err();
        assert!(matches!(err, RiskError::MissingAsset { .. }));
    }

    #[test]
    fn test_empty_assets_rejected() {
        assert!(stress_test(&[], &weights(), &StressScenario::default()).is_err());
    }
}
