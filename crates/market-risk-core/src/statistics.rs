use crate::error::RiskError;
use crate::RiskResult;

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std_dev(values: &[f64]) -> RiskResult<f64> {
    if values.len() < 2 {
        return Err(RiskError::InsufficientData(
            "At least 2 observations required for a standard deviation".into(),
        ));
    }
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    Ok((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Copy and sort ascending (worst returns first).
pub fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Quantile of a **sorted** slice using linear interpolation between order
/// statistics, `q` in [0, 1]. Rank is `q * (n - 1)`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> RiskResult<f64> {
    if sorted.is_empty() {
        return Err(RiskError::InsufficientData(
            "Cannot take a quantile of an empty sample".into(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(RiskError::InvalidInput {
            field: "quantile".into(),
            reason: format!("Quantile must be within [0, 1], got {q}"),
        });
    }
    if sorted.len() == 1 {
        return Ok(sorted[0]);
    }
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        Ok(sorted[lower])
    } else {
        let frac = rank - lower as f64;
        Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
    }
}

/// Validate a confidence level and return the tail probability `1 - c`.
pub fn tail_alpha(confidence_level: f64) -> RiskResult<f64> {
    if !confidence_level.is_finite() || confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(RiskError::InvalidInput {
            field: "confidence_level".into(),
            reason: format!("Confidence level must be between 0 and 1 (exclusive), got {confidence_level}"),
        });
    }
    Ok(1.0 - confidence_level)
}
