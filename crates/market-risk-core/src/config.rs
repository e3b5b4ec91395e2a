use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RiskError;
use crate::hedging::put_hedge::HedgeConfig;
use crate::returns::generator::{Frequency, SyntheticReturnsInput};
use crate::returns::ReturnSeries;
use crate::stress::stress_test::StressScenario;
use crate::types::AssetId;
use crate::var::monte_carlo::MIN_SIMULATIONS;
use crate::RiskResult;

/// Largest accepted deviation of the weight total from 1.
const WEIGHT_SUM_TOLERANCE: Decimal = dec!(0.000000001);

/// Run configuration. Every field has a default so a partial JSON/YAML file
/// only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Confidence level for every VaR method (e.g. 0.95)
    pub confidence_level: f64,
    /// Portfolio weight per asset; non-negative, summing to 1
    pub weights: BTreeMap<AssetId, Decimal>,
    /// Lowest acceptable historical VaR per asset (a negative return)
    pub risk_limits: BTreeMap<AssetId, f64>,
    pub stress: StressScenario,
    pub hedge: HedgeConfig,
    pub monte_carlo: MonteCarloConfig,
    /// Seed for synthetic data, and for Monte Carlo unless overridden
    pub seed: u64,
    pub chart: ChartConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub num_simulations: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Asset whose distribution is charted; first asset when unset
    pub asset: Option<AssetId>,
    pub bins: usize,
}

/// Shape of the synthetic return table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub frequency: Frequency,
    pub assets: Vec<AssetId>,
    pub mean: f64,
    pub std_dev: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1_000,
            seed: None,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            asset: None,
            bins: 50,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            frequency: Frequency::BusinessDay,
            assets: default_assets(),
            mean: 0.0,
            std_dev: 0.02,
        }
    }
}

fn default_assets() -> Vec<AssetId> {
    vec!["AAPL".into(), "MSFT".into(), "TSLA".into()]
}

impl Default for RiskConfig {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (AssetId::from("AAPL"), dec!(0.4)),
            (AssetId::from("MSFT"), dec!(0.3)),
            (AssetId::from("TSLA"), dec!(0.3)),
        ]);
        let risk_limits = BTreeMap::from([
            (AssetId::from("AAPL"), -0.04),
            (AssetId::from("MSFT"), -0.03),
            (AssetId::from("TSLA"), -0.06),
        ]);
        Self {
            confidence_level: 0.95,
            weights,
            risk_limits,
            stress: StressScenario::default(),
            hedge: HedgeConfig::default(),
            monte_carlo: MonteCarloConfig::default(),
            seed: 42,
            chart: ChartConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl RiskConfig {
    /// Seed used for Monte Carlo VaR.
    pub fn monte_carlo_seed(&self) -> u64 {
        self.monte_carlo.seed.unwrap_or(self.seed)
    }

    /// Generator input for the configured synthetic data set.
    pub fn synthetic_input(&self) -> SyntheticReturnsInput {
        SyntheticReturnsInput {
            start: self.data.start,
            end: self.data.end,
            frequency: self.data.frequency,
            assets: self.data.assets.clone(),
            mean: self.data.mean,
            std_dev: self.data.std_dev,
            seed: self.seed,
        }
    }

    /// Checks that need no return data: ranges, signs and the weight total.
    pub fn validate(&self) -> RiskResult<()> {
        if !self.confidence_level.is_finite()
            || self.confidence_level <= 0.0
            || self.confidence_level >= 1.0
        {
            return Err(RiskError::InvalidInput {
                field: "confidence_level".into(),
                reason: "Confidence level must be between 0 and 1 (exclusive)".into(),
            });
        }

        validate_weights(&self.weights)?;

        if let Some((asset, limit)) = self
            .risk_limits
            .iter()
            .find(|(_, l)| !l.is_finite() || **l >= 0.0)
        {
            return Err(RiskError::InvalidInput {
                field: format!("risk_limits.{asset}"),
                reason: format!("Risk limit must be a finite negative return, got {limit}"),
            });
        }

        self.hedge.validate()?;

        if self.monte_carlo.num_simulations < MIN_SIMULATIONS {
            return Err(RiskError::InvalidInput {
                field: "monte_carlo.num_simulations".into(),
                reason: format!("Must be at least {MIN_SIMULATIONS}"),
            });
        }

        if self.chart.bins == 0 {
            return Err(RiskError::InvalidInput {
                field: "chart.bins".into(),
                reason: "At least one histogram bin is required".into(),
            });
        }

        Ok(())
    }

    /// Checks that every asset in `series` is covered by the configuration
    /// and that every configured asset exists in `series`. Runs before any
    /// metric is computed.
    pub fn validate_against(&self, series: &ReturnSeries) -> RiskResult<()> {
        self.validate()?;

        for asset in series.assets() {
            if !self.weights.contains_key(asset) {
                return Err(RiskError::MissingAsset {
                    asset: asset.to_string(),
                    table: "weights".into(),
                });
            }
            if !self.risk_limits.contains_key(asset) {
                return Err(RiskError::MissingAsset {
                    asset: asset.to_string(),
                    table: "risk_limits".into(),
                });
            }
        }

        let unknown = |asset: &AssetId, context: &str| RiskError::UnknownAsset {
            asset: asset.to_string(),
            context: context.to_string(),
        };
        if let Some(asset) = self.weights.keys().find(|a| !series.contains(a)) {
            return Err(unknown(asset, "weights"));
        }
        if let Some(asset) = self.risk_limits.keys().find(|a| !series.contains(a)) {
            return Err(unknown(asset, "risk_limits"));
        }
        if let Some(asset) = self.stress.asset_shocks.keys().find(|a| !series.contains(a)) {
            return Err(unknown(asset, "stress.asset_shocks"));
        }
        if !series.contains(&self.hedge.asset) {
            return Err(unknown(&self.hedge.asset, "hedge.asset"));
        }
        if let Some(asset) = self.chart.asset.as_ref().filter(|a| !series.contains(a)) {
            return Err(unknown(asset, "chart.asset"));
        }

        Ok(())
    }
}

/// Weights must be non-empty, non-negative and sum to 1.
pub fn validate_weights(weights: &BTreeMap<AssetId, Decimal>) -> RiskResult<()> {
    if weights.is_empty() {
        return Err(RiskError::InvalidInput {
            field: "weights".into(),
            reason: "At least one portfolio weight is required".into(),
        });
    }
    if let Some((asset, w)) = weights.iter().find(|(_, w)| **w < Decimal::ZERO) {
        return Err(RiskError::InvalidInput {
            field: format!("weights.{asset}"),
            reason: format!("Weight must be non-negative, got {w}"),
        });
    }
    let total: Decimal = weights.values().sum();
    if (total - Decimal::ONE).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(RiskError::InvalidInput {
            field: "weights".into(),
            reason: format!("Weights must sum to 1, got {total}"),
        });
    }
    Ok(())
}
