//! Versioned, resumable optimizer state.
//!
//! A checkpoint is a flat JSON record. The `version` field is read first,
//! so a file from a newer release fails with
//! [`CemError::UnsupportedVersion`] rather than a field-level parse error.
//!
//! ```
//! use crossent::{Checkpoint, CrossEntropy, CrossEntropyConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut f = |x: &[f64]| x[0] * x[0];
//! let mut cem = CrossEntropy::new(CrossEntropyConfig::default().with_population_size(20));
//! cem.init_at(&f, &[1.0], StdRng::seed_from_u64(1)).unwrap();
//! cem.step(&mut f).unwrap();
//!
//! let json = cem.checkpoint().unwrap().to_json().unwrap();
//! let resumed = CrossEntropy::from_checkpoint(
//!     Checkpoint::from_json(&json).unwrap(),
//!     StdRng::seed_from_u64(2),
//! )
//! .unwrap();
//! assert_eq!(resumed.generation().unwrap(), 1);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distribution::{validate_mean, validate_variance};
use crate::error::{CemError, Result};
use crate::noise::NoiseSchedule;
use crate::population::Individual;
use crate::selection::Recombination;

/// Format revision written by this build.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Everything needed to resume a run, except the random source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Format revision
    pub version: u32,
    /// Distribution mean
    pub mean: Vec<f64>,
    /// Distribution variance
    pub variance: Vec<f64>,
    /// Samples per generation (λ)
    pub population_size: usize,
    /// Elite members per generation (μ)
    pub selection_size: usize,
    /// Completed generations
    pub generation: u64,
    /// Objective evaluations so far
    #[serde(default)]
    pub evaluations: u64,
    /// Noise schedule parameters
    pub noise: NoiseSchedule,
    /// Elite weighting
    #[serde(default)]
    pub recombination: Recombination,
    /// Best individual found so far
    #[serde(default)]
    pub best: Option<Individual>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl Checkpoint {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.version > CHECKPOINT_VERSION {
            return Err(CemError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if self.mean.is_empty() {
            return Err(CemError::invalid_config("mean", "[]", "at least one dimension"));
        }
        if self.variance.len() != self.mean.len() {
            return Err(CemError::DimensionMismatch {
                expected: self.mean.len(),
                actual: self.variance.len(),
            });
        }
        validate_mean(&self.mean)?;
        validate_variance(&self.variance)?;
        self.noise.validate()?;
        if self.population_size == 0 {
            return Err(CemError::invalid_config("population_size", 0, ">= 1"));
        }
        if self.selection_size == 0 || self.selection_size > self.population_size {
            return Err(CemError::invalid_config(
                "selection_size",
                self.selection_size,
                format!("1..={}", self.population_size),
            ));
        }
        if let Some(best) = &self.best {
            if best.point.len() != self.mean.len() {
                return Err(CemError::DimensionMismatch {
                    expected: self.mean.len(),
                    actual: best.point.len(),
                });
            }
        }
        Ok(())
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.version > CHECKPOINT_VERSION {
            return Err(CemError::UnsupportedVersion {
                found: probe.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        let checkpoint: Self = serde_json::from_str(json)?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Write to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
