use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use super::histogram::{return_histogram, ReturnHistogram};
use crate::config::RiskConfig;
use crate::error::RiskError;
use crate::hedging::put_hedge::{hedge_var, HedgeResult};
use crate::returns::generator::generate_returns;
use crate::returns::ReturnSeries;
use crate::stress::limits::check_limits;
use crate::stress::stress_test::{stress_test, StressTestResult};
use crate::types::{with_metadata, AlertStatus, AssetId, ComputationOutput, Return, RiskMetric};
use crate::var::metrics::calculate_risk_metrics;
use crate::RiskResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One line of the summary table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub asset: AssetId,
    pub historical_var: Return,
    pub parametric_var: Return,
    pub monte_carlo_var: Return,
    pub cvar: Option<Return>,
    pub limit: Return,
    pub alert: AlertStatus,
}

/// Everything a single run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub confidence_level: f64,
    pub observations: usize,
    pub rows: Vec<SummaryRow>,
    pub stress: StressTestResult,
    pub hedge: HedgeResult,
    pub chart: ReturnHistogram,
}

impl RiskReport {
    pub fn breaches(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(|r| r.alert.is_breach())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pipeline over `series`: validate the configuration, compute
/// the four risk metrics, check limits, stress the portfolio, apply the hedge
/// and build the chart histogram.
///
/// Rows follow the column order of `series`.
pub fn build_risk_report(
    series: &ReturnSeries,
    config: &RiskConfig,
) -> RiskResult<ComputationOutput<RiskReport>> {
    let start = Instant::now();
    config.validate_against(series)?;

    let metrics_out = calculate_risk_metrics(series, config)?;
    let mut warnings = metrics_out.warnings;
    let metrics = metrics_out.result;

    let limit_checks = check_limits(&metrics.historical_var, &config.risk_limits)?;
    let stress = stress_test(series.assets(), &config.weights, &config.stress)?;

    let hedge_asset = &config.hedge.asset;
    let hedge = hedge_var(
        hedge_asset,
        lookup(&metrics.historical_var, hedge_asset)?,
        config.hedge.cost,
    )?;

    let chart_asset = config
        .chart
        .asset
        .clone()
        .unwrap_or_else(|| series.assets()[0].clone());
    let chart_returns = series.column(&chart_asset).ok_or_else(|| RiskError::UnknownAsset {
        asset: chart_asset.to_string(),
        context: "chart.asset".into(),
    })?;
    let chart = return_histogram(
        &chart_asset,
        chart_returns,
        lookup(&metrics.historical_var, &chart_asset)?,
        config.chart.bins,
    )?;

    let mut rows = Vec::with_capacity(series.assets().len());
    for asset in series.assets() {
        let check = limit_checks.get(asset).ok_or_else(|| RiskError::MissingAsset {
            asset: asset.to_string(),
            table: "risk_limits".into(),
        })?;
        rows.push(SummaryRow {
            asset: asset.clone(),
            historical_var: check.historical_var,
            parametric_var: lookup(&metrics.parametric_var, asset)?,
            monte_carlo_var: lookup(&metrics.monte_carlo_var, asset)?,
            cvar: metrics.cvar.get(asset).copied().flatten(),
            limit: check.limit,
            alert: check.status,
        });
    }

    let report = RiskReport {
        confidence_level: config.confidence_level,
        observations: series.len(),
        rows,
        stress,
        hedge,
        chart,
    };

    let breached: Vec<String> = report.breaches().map(|r| r.asset.to_string()).collect();
    if !breached.is_empty() {
        warnings.push(format!("Risk limit exceeded for: {}", breached.join(", ")));
    }

    info!(
        assets = report.rows.len(),
        observations = report.observations,
        breaches = breached.len(),
        stress_loss = %report.stress.portfolio_loss,
        "risk report built"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Market Risk Snapshot (Historical / Parametric / Monte Carlo VaR, CVaR, Stress, Limits, Hedge)",
        &serde_json::json!({
            "confidence_level": config.confidence_level,
            "observations": series.len(),
            "num_simulations": config.monte_carlo.num_simulations,
            "monte_carlo_seed": config.monte_carlo_seed(),
            "stress_scenario": config.stress.name,
            "uniform_shock": config.stress.shock.to_string(),
            "hedge_asset": config.hedge.asset,
            "hedge_cost": config.hedge.cost,
            "hedge_model": "constant offset",
        }),
        warnings,
        elapsed,
        report,
    ))
}

/// Generate the configured synthetic return table and report on it.
pub fn run_snapshot(config: &RiskConfig) -> RiskResult<ComputationOutput<RiskReport>> {
    config.validate()?;
    let series = generate_returns(&config.synthetic_input())?;
    build_risk_report(&series, config)
}

fn lookup(metric: &RiskMetric, asset: &AssetId) -> RiskResult<Return> {
    metric
        .get(asset)
        .copied()
        .ok_or_else(|| RiskError::UnknownAsset {
            asset: asset.to_string(),
            context: "risk metrics".into(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
