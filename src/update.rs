//! Refitting the sampling distribution to the elite set.
//!
//! ```text
//! m_j  = Σ_i w_i · x_ij
//! v_j  = Σ_i w_i · (x_ij - m_j)² + z(t)
//! ```
//!
//! The variance is taken around the new mean. With a single elite member
//! the first term is 0 and the noise `z(t)` is the only spread left.

use crate::distribution::DiagonalNormal;
use crate::error::{CemError, Result};
use crate::selection::EliteSet;

/// New distribution parameters computed from one elite set.
#[derive(Debug, Clone, PartialEq)]
pub struct Refit {
    /// Weighted centroid of the elite points
    pub mean: Vec<f64>,
    /// Weighted elite variance plus noise
    pub variance: Vec<f64>,
}

/// Weighted centroid of the elite points.
pub fn weighted_mean(elite: &EliteSet, dim: usize) -> Result<Vec<f64>> {
    let mut mean = vec![0.0; dim];
    for (ind, &w) in elite.members().iter().zip(elite.weights()) {
        if ind.point.len() != dim {
            return Err(CemError::DimensionMismatch {
                expected: dim,
                actual: ind.point.len(),
            });
        }
        for (m, x) in mean.iter_mut().zip(&ind.point) {
            *m += w * x;
        }
    }
    Ok(mean)
}

/// Weighted variance of the elite points around `mean`.
pub fn weighted_variance(elite: &EliteSet, mean: &[f64]) -> Result<Vec<f64>> {
    let mut variance = vec![0.0; mean.len()];
    for (ind, &w) in elite.members().iter().zip(elite.weights()) {
        if ind.point.len() != mean.len() {
            return Err(CemError::DimensionMismatch {
                expected: mean.len(),
                actual: ind.point.len(),
            });
        }
        for ((v, x), m) in variance.iter_mut().zip(&ind.point).zip(mean) {
            *v += w * (x - m) * (x - m);
        }
    }
    Ok(variance)
}

/// Compute the refit for an elite set in `dim` dimensions with noise `noise`.
///
/// `noise` must already be clamped to `>= 0` (see
/// [`NoiseSchedule::value`](crate::NoiseSchedule::value)).
pub fn refit(elite: &EliteSet, dim: usize, noise: f64) -> Result<Refit> {
    let mean = weighted_mean(elite, dim)?;
    let mut variance = weighted_variance(elite, &mean)?;
    for v in &mut variance {
        *v += noise;
    }
    Ok(Refit { mean, variance })
}

/// Refit `distribution` to `elite` and commit mean and variance together.
///
/// On error the distribution is left as it was.
pub fn apply(distribution: &mut DiagonalNormal, elite: &EliteSet, noise: f64) -> Result<Refit> {
    let refit = refit(elite, distribution.dimension(), noise)?;
    distribution.update(refit.mean.clone(), refit.variance.clone())?;
    Ok(refit)
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
