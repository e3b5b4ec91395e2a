use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::RiskError;
use crate::statistics::{mean, sample_std_dev, tail_alpha};
use crate::types::Return;
use crate::RiskResult;

/// Standard-normal quantile for a tail probability `alpha`.
///
/// Closed-form inverse CDF, so the result is identical on every call.
pub fn z_score(alpha: f64) -> RiskResult<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(RiskError::InvalidInput {
            field: "alpha".into(),
            reason: format!("Tail probability must be between 0 and 1, got {alpha}"),
        });
    }
    let std_normal = Normal::new(0.0, 1.0).map_err(|e| RiskError::InvalidInput {
        field: "distribution".into(),
        reason: format!("Invalid Normal parameters: {e}"),
    })?;
    Ok(std_normal.inverse_cdf(alpha))
}

/// Parametric (variance-covariance) VaR from explicit moments:
/// `mean + std_dev * z(alpha)`.
pub fn parametric_var_from_moments(mean: f64, std_dev: f64, confidence_level: f64) -> RiskResult<Return> {
    let alpha = tail_alpha(confidence_level)?;
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(RiskError::InvalidInput {
            field: "std_dev".into(),
            reason: "Standard deviation must be non-negative and finite".into(),
        });
    }
    Ok(mean + std_dev * z_score(alpha)?)
}

/// Parametric VaR of a return sample, using its mean and sample standard
/// deviation.
pub fn parametric_var(returns: &[Return], confidence_level: f64) -> RiskResult<Return> {
    let std_dev = sample_std_dev(returns)?;
    parametric_var_from_moments(mean(returns), std_dev, confidence_level)
}
