//! Noise schedules for the variance floor.
//!
//! After each refit the optimizer adds `z(t)` to every variance component,
//! where `t` is the generation being updated. The schedules are pure
//! functions of `t` and always return a non-negative value.
//!
//! # Example
//!
//! ```
//! use crossent::NoiseSchedule;
//!
//! let decaying = NoiseSchedule::linear(1.0, -0.25);
//! assert_eq!(decaying.value(0), 1.0);
//! assert_eq!(decaying.value(2), 0.5);
//! assert_eq!(decaying.value(10), 0.0);
//! assert_eq!(decaying.description(), "z(t) = 1 - t * 0.25");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CemError, Result};

/// Additive variance noise as a function of the generation index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseSchedule {
    /// No noise: `z(t) = 0`.
    #[default]
    Zero,
    /// `z(t) = max(z, 0)`.
    Constant {
        /// Noise level
        z: f64,
    },
    /// `z(t) = max(a + t * b, 0)`; a negative `b` decays towards zero.
    Linear {
        /// Intercept
        a: f64,
        /// Slope per generation
        b: f64,
    },
}

impl NoiseSchedule {
    /// Constant noise `z`.
    #[must_use]
    pub fn constant(z: f64) -> Self {
        Self::Constant { z }
    }

    /// Linear noise `a + t * b`.
    #[must_use]
    pub fn linear(a: f64, b: f64) -> Self {
        Self::Linear { a, b }
    }

    /// Noise added to the variance when updating generation `generation`.
    ///
    /// Never negative. A NaN result (from NaN coefficients) is reported
    /// as 0.
    #[must_use]
    pub fn value(&self, generation: u64) -> f64 {
        let raw = match *self {
            Self::Zero => 0.0,
            Self::Constant { z } => z,
            Self::Linear { a, b } => a + generation as f64 * b,
        };
        // f64::max returns the non-NaN operand
        raw.max(0.0)
    }

    /// Reject non-finite coefficients.
    pub fn validate(&self) -> Result<()> {
        let coefficients = match *self {
            Self::Zero => vec![],
            Self::Constant { z } => vec![("noise.z", z)],
            Self::Linear { a, b } => vec![("noise.a", a), ("noise.b", b)],
        };
        match coefficients.into_iter().find(|(_, c)| !c.is_finite()) {
            Some((name, c)) => Err(CemError::invalid_config(name, c, "a finite value")),
            None => Ok(()),
        }
    }

    /// Human-readable formula, for reports only.
    #[must_use]
    pub fn description(&self) -> String {
        match *self {
            Self::Zero => "z(t) = 0".to_string(),
            Self::Constant { z } => format!("z(t) = {z}"),
            Self::Linear { a, b } => {
                let sign = if b < 0.0 { '-' } else { '+' };
                format!("z(t) = {a} {sign} t * {}", b.abs())
            }
        }
    }

    /// Short name of the schedule kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Constant { .. } => "constant",
            Self::Linear { .. } => "linear",
        }
    }

    /// Build a schedule from a kind name and its coefficients.
    ///
    /// `constant` uses `a` as `z`; `linear` uses both. Unused
    /// coefficients are ignored.
    pub fn parse(kind: &str, a: f64, b: f64) -> Option<Self> {
        match kind.to_lowercase().as_str() {
            "zero" | "none" => Some(Self::Zero),
            "constant" | "const" => Some(Self::constant(a)),
            "linear" => Some(Self::linear(a, b)),
            _ => None,
        }
    }
}

impl fmt::Display for NoiseSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
