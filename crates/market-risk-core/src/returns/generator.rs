use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use tracing::debug;

use super::series::ReturnSeries;
use crate::error::RiskError;
use crate::types::AssetId;
use crate::RiskResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Spacing of the date index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Monday to Friday, no holiday calendar.
    #[default]
    BusinessDay,
    /// Every calendar day.
    Daily,
}

impl Frequency {
    fn includes(&self, date: NaiveDate) -> bool {
        match self {
            Frequency::BusinessDay => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            Frequency::Daily => true,
        }
    }
}

/// Input for synthetic return generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticReturnsInput {
    pub start: NaiveDate,
    /// Inclusive end date.
    pub end: NaiveDate,
    #[serde(default)]
    pub frequency: Frequency,
    pub assets: Vec<AssetId>,
    /// Mean periodic return (default 0.0)
    #[serde(default)]
    pub mean: f64,
    /// Standard deviation of periodic returns (default 0.02)
    #[serde(default = "default_std_dev")]
    pub std_dev: f64,
    pub seed: u64,
}

fn default_std_dev() -> f64 {
    0.02
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the date index between `start` and `end` inclusive.
pub fn business_days(
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
) -> RiskResult<Vec<NaiveDate>> {
    if end < start {
        return Err(RiskError::InvalidInput {
            field: "end".into(),
            reason: format!("End date {end} precedes start date {start}"),
        });
    }
    let dates: Vec<NaiveDate> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| frequency.includes(*d))
        .collect();
    Ok(dates)
}

/// Draw an i.i.d. normal return table.
///
/// Values are drawn date by date, asset by asset, from a single `StdRng`
/// seeded with `input.seed`, so the output depends only on the seed and the
/// table shape.
pub fn generate_returns(input: &SyntheticReturnsInput) -> RiskResult<ReturnSeries> {
    if !input.std_dev.is_finite() || input.std_dev <= 0.0 {
        return Err(RiskError::InvalidInput {
            field: "std_dev".into(),
            reason: "Standard deviation must be positive and finite".into(),
        });
    }
    if !input.mean.is_finite() {
        return Err(RiskError::InvalidInput {
            field: "mean".into(),
            reason: "Mean must be finite".into(),
        });
    }
    if input.assets.is_empty() {
        return Err(RiskError::InvalidInput {
            field: "assets".into(),
            reason: "At least one asset is required".into(),
        });
    }

    let dates = business_days(input.start, input.end, input.frequency)?;
    if dates.is_empty() {
        return Err(RiskError::InsufficientData(format!(
            "No {:?} dates between {} and {}",
            input.frequency, input.start, input.end
        )));
    }

    let dist = Normal::new(input.mean, input.std_dev).map_err(|e| RiskError::InvalidInput {
        field: "std_dev".into(),
        reason: format!("Invalid Normal parameters: {e}"),
    })?;
    let mut rng = StdRng::seed_from_u64(input.seed);

    let mut columns: Vec<Vec<f64>> = input
        .assets
        .iter()
        .map(|_| Vec::with_capacity(dates.len()))
        .collect();
    for _ in 0..dates.len() {
        for column in columns.iter_mut() {
            column.push(rng.sample(dist));
        }
    }

    debug!(
        observations = dates.len(),
        assets = input.assets.len(),
        seed = input.seed,
        "generated synthetic returns"
    );

    ReturnSeries::new(dates, input.assets.clone(), columns)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
