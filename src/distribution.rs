//! Diagonal-covariance normal distribution.
//!
//! Each dimension is sampled independently as `mean[i] + sqrt(var[i]) * z`
//! with `z ~ N(0, 1)`. The per-dimension standard deviations are cached
//! and re-derived on every variance change, so a sample never sees a stale
//! variance.

use rand::Rng;
use std::f64::consts::PI;

use crate::error::{CemError, Result};

/// Sample a standard normal deviate using the Box-Muller transform.
pub fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Check that every mean component is finite.
pub(crate) fn validate_mean(mean: &[f64]) -> Result<()> {
    match mean.iter().position(|m| !m.is_finite()) {
        Some(i) => Err(CemError::invalid_config(
            format!("mean[{i}]"),
            mean[i],
            "a finite value",
        )),
        None => Ok(()),
    }
}

/// Check that every variance component is finite and non-negative.
pub(crate) fn validate_variance(variance: &[f64]) -> Result<()> {
    match variance.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(i) => Err(CemError::invalid_config(
            format!("variance[{i}]"),
            variance[i],
            "a finite value >= 0",
        )),
        None => Ok(()),
    }
}

/// Multivariate normal with diagonal covariance.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalNormal {
    mean: Vec<f64>,
    variance: Vec<f64>,
    /// Cached `sqrt(variance)`; must be refreshed whenever `variance` changes.
    std_dev: Vec<f64>,
}

impl DiagonalNormal {
    /// Create a distribution from a mean and a variance of equal length.
    pub fn new(mean: Vec<f64>, variance: Vec<f64>) -> Result<Self> {
        if mean.len() != variance.len() {
            return Err(CemError::DimensionMismatch {
                expected: mean.len(),
                actual: variance.len(),
            });
        }
        validate_mean(&mean)?;
        validate_variance(&variance)?;
        let std_dev = variance.iter().map(|v| v.sqrt()).collect();
        Ok(Self {
            mean,
            variance,
            std_dev,
        })
    }

    /// Create a distribution with the same variance in every dimension.
    pub fn isotropic(mean: Vec<f64>, variance: f64) -> Result<Self> {
        let n = mean.len();
        Self::new(mean, vec![variance; n])
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Current mean.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Current per-dimension variance.
    #[must_use]
    pub fn variance(&self) -> &[f64] {
        &self.variance
    }

    /// Replace the mean. The length must match the dimension.
    pub fn set_mean(&mut self, mean: Vec<f64>) -> Result<()> {
        self.check_len(mean.len())?;
        validate_mean(&mean)?;
        self.mean = mean;
        Ok(())
    }

    /// Replace the variance and re-derive the sampler.
    pub fn set_variance(&mut self, variance: Vec<f64>) -> Result<()> {
        self.check_len(variance.len())?;
        validate_variance(&variance)?;
        self.variance = variance;
        self.refresh_std_dev();
        Ok(())
    }

    /// Set every variance component to `variance`.
    pub fn set_variance_all(&mut self, variance: f64) -> Result<()> {
        self.set_variance(vec![variance; self.dimension()])
    }

    /// Replace mean and variance together.
    ///
    /// Both are validated before either is written, so a failed call
    /// leaves the distribution unchanged.
    pub fn update(&mut self, mean: Vec<f64>, variance: Vec<f64>) -> Result<()> {
        self.check_len(mean.len())?;
        self.check_len(variance.len())?;
        validate_mean(&mean)?;
        validate_variance(&variance)?;
        self.mean = mean;
        self.variance = variance;
        self.refresh_std_dev();
        Ok(())
    }

    /// Draw one point.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.mean
            .iter()
            .zip(&self.std_dev)
            .map(|(m, s)| m + s * standard_normal(rng))
            .collect()
    }

    /// Indices of dimensions whose variance is exactly zero.
    ///
    /// Sampling in these dimensions always returns the mean.
    #[must_use]
    pub fn degenerate_dimensions(&self) -> Vec<usize> {
        self.variance
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    fn refresh_std_dev(&mut self) {
        self.std_dev = self.variance.iter().map(|v| v.sqrt()).collect();
    }

    fn check_len(&self, actual: usize) -> Result<()> {
        if actual == self.dimension() {
            Ok(())
        } else {
            Err(CemError::DimensionMismatch {
                expected: self.dimension(),
                actual,
            })
        }
    }
}

#[cfg(test)]
#[path = "distribution_tests.rs"]
mod tests;
