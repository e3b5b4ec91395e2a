use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::RiskError;
use crate::types::{AssetId, Return};
use crate::RiskResult;

/// Per-asset periodic returns aligned on a shared date index.
///
/// Construction enforces the table shape: every column has one value per
/// date, dates are strictly increasing, asset ids are unique and every value
/// is finite. Once built the series is immutable.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    assets: Vec<AssetId>,
    /// Column-major: `columns[i]` holds the returns of `assets[i]`.
    columns: Vec<Vec<Return>>,
}

impl ReturnSeries {
    pub fn new(
        dates: Vec<NaiveDate>,
        assets: Vec<AssetId>,
        columns: Vec<Vec<Return>>,
    ) -> RiskResult<Self> {
        if assets.is_empty() {
            return Err(RiskError::InvalidInput {
                field: "assets".into(),
                reason: "At least one asset is required".into(),
            });
        }
        if dates.is_empty() {
            return Err(RiskError::InsufficientData(
                "Return series has no observations".into(),
            ));
        }
        if columns.len() != assets.len() {
            return Err(RiskError::InvalidInput {
                field: "columns".into(),
                reason: format!(
                    "{} columns supplied for {} assets",
                    columns.len(),
                    assets.len()
                ),
            });
        }

        let mut seen = BTreeSet::new();
        for asset in &assets {
            if !seen.insert(asset) {
                return Err(RiskError::InvalidInput {
                    field: "assets".into(),
                    reason: format!("Duplicate asset '{asset}'"),
                });
            }
        }

        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RiskError::InvalidInput {
                field: "dates".into(),
                reason: "Dates must be strictly increasing".into(),
            });
        }

        for (asset, column) in assets.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(RiskError::InvalidInput {
                    field: asset.to_string(),
                    reason: format!(
                        "Column has {} values but the date index has {}",
                        column.len(),
                        dates.len()
                    ),
                });
            }
            if let Some(pos) = column.iter().position(|r| !r.is_finite()) {
                return Err(RiskError::InvalidInput {
                    field: asset.to_string(),
                    reason: format!("Missing or non-finite return on {}", dates[pos]),
                });
            }
        }

        Ok(Self {
            dates,
            assets,
            columns,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Assets in column order.
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.assets.contains(asset)
    }

    pub fn column(&self, asset: &AssetId) -> Option<&[Return]> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate `(asset, returns)` pairs in column order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&AssetId, &[Return])> {
        self.assets
            .iter()
            .zip(self.columns.iter().map(|c| c.as_slice()))
    }

    /// Row view: the returns of every asset on the `i`-th date.
    pub fn row(&self, i: usize) -> Option<Vec<Return>> {
        if i >= self.dates.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[i]).collect())
    }
}
