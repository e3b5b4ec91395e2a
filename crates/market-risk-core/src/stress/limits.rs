use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::RiskError;
use crate::types::{AlertStatus, AssetId, Return, RiskMetric};
use crate::RiskResult;

/// Limit evaluation for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitCheck {
    pub asset: AssetId,
    pub historical_var: Return,
    pub limit: Return,
    pub status: AlertStatus,
}

/// `LimitExceeded` when the VaR is more negative than the limit.
pub fn evaluate_limit(var: Return, limit: Return) -> AlertStatus {
    if var < limit {
        AlertStatus::LimitExceeded
    } else {
        AlertStatus::Ok
    }
}

/// Compare each asset's historical VaR against its risk limit.
///
/// Every asset in `historical_var` must have a limit; a gap is reported as a
/// configuration error rather than defaulted.
pub fn check_limits(
    historical_var: &RiskMetric,
    limits: &BTreeMap<AssetId, Return>,
) -> RiskResult<BTreeMap<AssetId, LimitCheck>> {
    let mut checks = BTreeMap::new();
    for (asset, var) in historical_var {
        let limit = *limits.get(asset).ok_or_else(|| RiskError::MissingAsset {
            asset: asset.to_string(),
            table: "risk_limits".into(),
        })?;
        let status = evaluate_limit(*var, limit);
        if status.is_breach() {
            warn!(%asset, var, limit, "historical VaR exceeds risk limit");
        }
        checks.insert(
            asset.clone(),
            LimitCheck {
                asset: asset.clone(),
                historical_var: *var,
                limit,
                status,
            },
        );
    }
    Ok(checks)
}
