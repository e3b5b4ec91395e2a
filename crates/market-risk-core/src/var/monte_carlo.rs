use rand::Rng;
use statrs::distribution::Normal;

use crate::error::RiskError;
use crate::statistics::{mean, quantile_sorted, sample_std_dev, sorted_ascending, tail_alpha};
use crate::types::Return;
use crate::RiskResult;

/// Smallest accepted number of simulated returns.
pub const MIN_SIMULATIONS: usize = 100;

/// Monte Carlo VaR: draw `num_simulations` returns from a normal
/// distribution fitted to the sample (mean, sample std dev) and take the
/// `(1 - c)` quantile of the draws.
///
/// Randomness comes only from `rng`; pass a seeded `StdRng` for repeatable
/// results.
pub fn monte_carlo_var<R: Rng>(
    returns: &[Return],
    confidence_level: f64,
    num_simulations: usize,
    rng: &mut R,
) -> RiskResult<Return> {
    let alpha = tail_alpha(confidence_level)?;
    if num_simulations < MIN_SIMULATIONS {
        return Err(RiskError::InvalidInput {
            field: "num_simulations".into(),
            reason: format!("Must be at least {MIN_SIMULATIONS}"),
        });
    }

    let mu = mean(returns);
    let sigma = sample_std_dev(returns)?;

    // Zero variance: the fitted distribution is a point mass at the mean.
    if sigma <= f64::EPSILON {
        return Ok(mu);
    }

    let dist = Normal::new(mu, sigma).map_err(|e| RiskError::InvalidInput {
        field: "distribution".into(),
        reason: format!("Invalid Normal parameters: {e}"),
    })?;

    let simulated: Vec<f64> = (0..num_simulations).map(|_| rng.sample(dist)).collect();
    quantile_sorted(&sorted_ascending(&simulated), alpha)
}
