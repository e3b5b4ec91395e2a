use clap::Args;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Instant;
use tracing::debug;

use market_risk_core::report::summary;
use market_risk_core::returns::generator::generate_returns;
use market_risk_core::types::with_metadata;
use market_risk_core::var::metrics;
use market_risk_core::{AssetId, RiskConfig};

use crate::input;

/// Configuration source and the most common overrides
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to a JSON or YAML configuration file (stdin is read when piped)
    #[arg(long)]
    pub config: Option<String>,

    /// Seed for the synthetic returns (and Monte Carlo unless configured)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Confidence level for VaR/CVaR (e.g. 0.95 for 95%)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Number of Monte Carlo draws per asset
    #[arg(long)]
    pub simulations: Option<usize>,
}

/// Arguments for the full risk report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Asset whose return distribution is charted (default: first asset)
    #[arg(long)]
    pub chart_asset: Option<String>,

    /// Number of histogram bins
    #[arg(long)]
    pub bins: Option<usize>,
}

/// Arguments for the per-asset VaR table
#[derive(Args)]
pub struct VarArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for printing the synthetic return table
#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ConfigArgs {
    /// File, then stdin, then defaults; flags override whichever was loaded.
    fn load(&self) -> Result<RiskConfig, Box<dyn std::error::Error>> {
        let mut cfg: RiskConfig = if let Some(ref path) = self.config {
            debug!(path = %path, "loading configuration file");
            input::file::read_config(path)?
        } else if let Some(cfg) = input::stdin::read_stdin()? {
            debug!("loaded configuration from stdin");
            cfg
        } else {
            debug!("using default configuration");
            RiskConfig::default()
        };

        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(c) = self.confidence {
            cfg.confidence_level = c;
        }
        if let Some(n) = self.simulations {
            cfg.monte_carlo.num_simulations = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut cfg = args.config.load()?;
    if let Some(asset) = args.chart_asset {
        cfg.chart.asset = Some(AssetId::from(asset));
    }
    if let Some(bins) = args.bins {
        cfg.chart.bins = bins;
    }
    let result = summary::run_snapshot(&cfg)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_var(args: VarArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cfg = args.config.load()?;
    let series = generate_returns(&cfg.synthetic_input())?;
    let result = metrics::calculate_risk_metrics(&series, &cfg)?;
    Ok(serde_json::to_value(result)?)
}

#[derive(Debug, Serialize)]
struct GeneratedReturns {
    assets: Vec<AssetId>,
    rows: Vec<Map<String, Value>>,
}

pub fn run_generate(args: GenerateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let cfg = args.config.load()?;
    let input = cfg.synthetic_input();
    let series = generate_returns(&input)?;

    let mut rows = Vec::with_capacity(series.len());
    for (i, date) in series.dates().iter().enumerate() {
        let mut row = Map::new();
        row.insert("date".into(), Value::String(date.to_string()));
        let values = series.row(i).unwrap_or_default();
        for (asset, r) in series.assets().iter().zip(values) {
            row.insert(asset.to_string(), serde_json::to_value(r)?);
        }
        rows.push(row);
    }

    let output = GeneratedReturns {
        assets: series.assets().to_vec(),
        rows,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Synthetic i.i.d. normal returns",
        &input,
        Vec::new(),
        elapsed,
        output,
    ))?)
}
