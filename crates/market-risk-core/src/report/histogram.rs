use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};

use crate::error::RiskError;
use crate::statistics::{sample_std_dev, sorted_ascending};
use crate::types::{AssetId, Return};
use crate::RiskResult;

/// A single histogram bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
    pub frequency: f64,
    /// Gaussian kernel density at the bin midpoint, scaled to a bin count
    pub smoothed_count: f64,
}

/// Return distribution of one asset with its historical VaR marked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnHistogram {
    pub asset: AssetId,
    pub bins: Vec<HistogramBin>,
    pub var_marker: Return,
    /// Index of the bin containing `var_marker`
    pub marker_bin: usize,
}

/// Build a histogram with `num_bins` equal-width bins over `values`.
///
/// The last bin is closed on the right so the maximum is counted. When every
/// value is equal a single bin holds the whole sample.
pub fn build_histogram(values: &[f64], num_bins: usize) -> RiskResult<Vec<HistogramBin>> {
    if values.is_empty() {
        return Err(RiskError::InsufficientData(
            "Cannot build a histogram of an empty sample".into(),
        ));
    }
    if num_bins == 0 {
        return Err(RiskError::InvalidInput {
            field: "bins".into(),
            reason: "At least one bin is required".into(),
        });
    }

    let sorted = sorted_ascending(values);
    let min_val = sorted[0];
    let max_val = sorted[sorted.len() - 1];
    let n = sorted.len() as f64;

    if (max_val - min_val).abs() < f64::EPSILON {
        return Ok(vec![HistogramBin {
            lower: min_val,
            upper: max_val,
            count: sorted.len() as u32,
            frequency: 1.0,
            smoothed_count: sorted.len() as f64,
        }]);
    }

    let bin_width = (max_val - min_val) / num_bins as f64;

    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| {
            let lower = min_val + i as f64 * bin_width;
            let upper = if i == num_bins - 1 {
                max_val
            } else {
                min_val + (i + 1) as f64 * bin_width
            };
            HistogramBin {
                lower,
                upper,
                count: 0,
                frequency: 0.0,
                smoothed_count: 0.0,
            }
        })
        .collect();

    for &val in &sorted {
        bins[bin_index(val, min_val, bin_width, num_bins)].count += 1;
    }

    for bin in &mut bins {
        bin.frequency = bin.count as f64 / n;
    }

    if let Some(h) = silverman_bandwidth(&sorted) {
        let kernel = Normal::new(0.0, 1.0).map_err(|e| RiskError::InvalidInput {
            field: "distribution".into(),
            reason: format!("Invalid Normal parameters: {e}"),
        })?;
        for bin in &mut bins {
            let mid = (bin.lower + bin.upper) / 2.0;
            let pdf = sorted.iter().map(|x| kernel.pdf((mid - x) / h)).sum::<f64>() / (n * h);
            bin.smoothed_count = pdf * n * bin_width;
        }
    }

    Ok(bins)
}

/// Silverman's rule of thumb, `1.06 * sd * n^(-1/5)`. None without spread.
fn silverman_bandwidth(values: &[f64]) -> Option<f64> {
    let sd = sample_std_dev(values).ok()?;
    if sd <= 0.0 {
        return None;
    }
    Some(1.06 * sd * (values.len() as f64).powf(-0.2))
}

fn bin_index(val: f64, min_val: f64, bin_width: f64, num_bins: usize) -> usize {
    if val <= min_val || bin_width <= 0.0 {
        return 0;
    }
    let idx = ((val - min_val) / bin_width).floor() as usize;
    idx.min(num_bins - 1)
}

/// Histogram of `returns` with the bin holding `var` recorded for charting.
pub fn return_histogram(
    asset: &AssetId,
    returns: &[Return],
    var: Return,
    num_bins: usize,
) -> RiskResult<ReturnHistogram> {
    let bins = build_histogram(returns, num_bins)?;
    let min_val = bins[0].lower;
    let width = bins[0].upper - bins[0].lower;
    let marker_bin = bin_index(var, min_val, width, bins.len());
    Ok(ReturnHistogram {
        asset: asset.clone(),
        bins,
        var_marker: var,
        marker_bin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<f64> {
        (0..100).map(|i| -0.05 + i as f64 * 0.001).collect()
    }

    #[test]
    fn test_bin_count() {
        let h = build_histogram(&values(), 20).unwrap();
        assert_eq!(h.len(), 20);
    }

    #[test]
    fn test_total_count() {
        let h = build_histogram(&values(), 20).unwrap();
        let total: u32 = h.iter().map(|b| b.count).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_frequency_sums_to_one() {
        let h = build_histogram(&values(), 7).unwrap();
        let total: f64 = h.iter().map(|b| b.frequency).sum();
        assert!((total - 1.0).abs() < 1e-10, "total={total}");
    }

    #[test]
    fn test_constant_sample_single_bin() {
        let h = build_histogram(&[0.01; 10], 50).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].count, 10);
    }

    #[test]
    fn test_marker_bin_contains_var() {
        let v = values();
        let h = return_histogram(&"AAPL".into(), &v, -0.0405, 10).unwrap();
        let bin = &h.bins[h.marker_bin];
        assert!(bin.lower <= -0.0405 && -0.0405 <= bin.upper);
        assert_eq!(h.marker_bin, 0);
    }

    #[test]
    fn test_smoothed_counts_track_histogram() {
        // Uniform sample: the density is flat in the interior and the
        // smoothed counts carry roughly the same total as the raw counts
        let h = build_histogram(&values(), 10).unwrap();
        let raw: f64 = h.iter().map(|b| b.count as f64).sum();
        let smooth: f64 = h.iter().map(|b| b.smoothed_count).sum();
        assert!((smooth - raw).abs() / raw < 0.2, "smooth={smooth} raw={raw}");
        assert!(h.iter().all(|b| b.smoothed_count > 0.0));
        assert!(h[5].smoothed_count > h[0].smoothed_count);
    }

    #[test]
    fn test_constant_sample_smoothed_equals_count() {
        let h = build_histogram(&[0.01; 10], 5).unwrap();
        assert_eq!(h[0].smoothed_count, 10.0);
    }

    #[test]
    fn test_empty_and_zero_bins_rejected() {
        assert!(build_histogram(&[], 10).is_err());
        assert!(build_histogram(&values(), 0).is_err());
    }
}
