//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use crossent::prelude::*;
//! ```

pub use crate::benchmarks::{Benchmark, BenchmarkKind};
pub use crate::error::{CemError, StepError};
pub use crate::noise::NoiseSchedule;
pub use crate::objective::ObjectiveFunction;
pub use crate::optimizer::{CrossEntropy, CrossEntropyConfig};
pub use crate::population::{Individual, Population};
pub use crate::selection::Recombination;
