use crate::error::RiskError;
use crate::statistics::{mean, quantile_sorted, sorted_ascending, tail_alpha};
use crate::types::Return;
use crate::RiskResult;

/// Historical VaR: the `(1 - c)` quantile of the empirical return sample.
///
/// Expressed as a return, so a riskier asset has a more negative value.
/// No distributional assumption is made.
pub fn historical_var(returns: &[Return], confidence_level: f64) -> RiskResult<Return> {
    let alpha = tail_alpha(confidence_level)?;
    if returns.is_empty() {
        return Err(RiskError::InsufficientData(
            "Historical VaR requires at least one return".into(),
        ));
    }
    quantile_sorted(&sorted_ascending(returns), alpha)
}

/// Historical CVaR (expected shortfall): the mean of all returns strictly
/// below the historical VaR.
///
/// Returns `Ok(None)` when no return lies below the threshold.
pub fn historical_cvar(returns: &[Return], confidence_level: f64) -> RiskResult<Option<Return>> {
    let var = historical_var(returns, confidence_level)?;
    Ok(tail_mean(returns, var))
}

/// Mean of the returns strictly below `threshold`, `None` for an empty tail.
pub fn tail_mean(returns: &[Return], threshold: Return) -> Option<Return> {
    let tail: Vec<Return> = returns.iter().copied().filter(|r| *r < threshold).collect();
    if tail.is_empty() {
        None
    } else {
        Some(mean(&tail))
    }
}
