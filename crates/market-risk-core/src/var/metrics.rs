use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::historical::{historical_var, tail_mean};
use super::monte_carlo::monte_carlo_var;
use super::parametric::parametric_var;
use crate::config::RiskConfig;
use crate::returns::ReturnSeries;
use crate::types::{with_metadata, AssetId, ComputationOutput, CvarMetric, RiskMetric};
use crate::RiskResult;

/// The four per-asset risk estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub confidence_level: f64,
    pub historical_var: RiskMetric,
    pub parametric_var: RiskMetric,
    pub monte_carlo_var: RiskMetric,
    pub cvar: CvarMetric,
}

/// Seed for the Monte Carlo stream of `asset`.
///
/// Derived from the asset id rather than its column, so an asset's estimate
/// is unchanged when other assets are added, removed or reordered.
pub fn asset_seed(base: u64, asset: &AssetId) -> u64 {
    base ^ fnv1a_hash(asset.as_str().as_bytes())
}

fn fnv1a_hash(bytes: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Compute historical, parametric and Monte Carlo VaR plus historical CVaR
/// for every asset in `series`.
///
/// An empty CVaR tail is reported as `None` with a warning rather than
/// failing the run.
pub fn calculate_risk_metrics(
    series: &ReturnSeries,
    config: &RiskConfig,
) -> RiskResult<ComputationOutput<RiskMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let c = config.confidence_level;
    let base_seed = config.monte_carlo_seed();

    let mut metrics = RiskMetrics {
        confidence_level: c,
        historical_var: RiskMetric::new(),
        parametric_var: RiskMetric::new(),
        monte_carlo_var: RiskMetric::new(),
        cvar: CvarMetric::new(),
    };

    for (asset, returns) in series.iter_columns() {
        let hist = historical_var(returns, c)?;
        let param = parametric_var(returns, c)?;
        let mut rng = StdRng::seed_from_u64(asset_seed(base_seed, asset));
        let mc = monte_carlo_var(returns, c, config.monte_carlo.num_simulations, &mut rng)?;
        let cvar = tail_mean(returns, hist);

        if cvar.is_none() {
            warn!(%asset, "no returns below historical VaR; CVaR undefined");
            warnings.push(format!(
                "{asset}: no returns fall below the historical VaR, CVaR is undefined"
            ));
        }
        debug!(%asset, hist, param, mc, ?cvar, "risk metrics computed");

        metrics.historical_var.insert(asset.clone(), hist);
        metrics.parametric_var.insert(asset.clone(), param);
        metrics.monte_carlo_var.insert(asset.clone(), mc);
        metrics.cvar.insert(asset.clone(), cvar);
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Historical, Parametric and Monte Carlo VaR with Historical CVaR",
        &serde_json::json!({
            "observations": series.len(),
            "confidence_level": c,
            "num_simulations": config.monte_carlo.num_simulations,
            "monte_carlo_seed": base_seed,
            "quantile": "linear interpolation",
            "std_dev": "sample (n - 1)",
        }),
        warnings,
        elapsed,
        metrics,
    ))
}
