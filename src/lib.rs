//! Crossent: Cross-Entropy Method optimization in pure Rust.
//!
//! Minimizes black-box objectives over real-valued vectors by repeatedly
//! sampling a diagonal Gaussian, keeping the best fraction of the samples
//! and refitting the Gaussian to them. An optional noise schedule adds a
//! variance floor each generation to slow premature convergence.
//!
//! # Quick Start
//!
//! ```
//! use crossent::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut objective = Benchmark::new(BenchmarkKind::Sphere, 2, 1.5);
//! let config = CrossEntropyConfig::default()
//!     .with_population_size(50)
//!     .with_selection_size(5)
//!     .with_noise(NoiseSchedule::linear(0.1, -0.005));
//!
//! let mut cem = CrossEntropy::new(config);
//! cem.init(&objective, StdRng::seed_from_u64(7)).unwrap();
//! for _ in 0..30 {
//!     cem.step(&mut objective).unwrap();
//! }
//!
//! let report = cem.report().unwrap();
//! assert_eq!(report.generation, 30);
//! assert!(report.best.unwrap().fitness < 0.05);
//! ```
//!
//! # Modules
//!
//! - [`noise`]: Noise schedules for the variance floor
//! - [`distribution`]: Diagonal normal sampling distribution
//! - [`population`]: Individuals and fitness statistics
//! - [`selection`]: Truncation selection and recombination weights
//! - [`update`]: Refitting mean and variance to the elite set
//! - [`optimizer`]: The optimizer state machine
//! - [`objective`]: The objective-function capability
//! - [`report`]: Per-generation snapshots
//! - [`checkpoint`]: Versioned resumable state
//! - [`benchmarks`]: Standard test functions

pub mod benchmarks;
pub mod checkpoint;
pub mod distribution;
pub mod error;
pub mod noise;
pub mod objective;
pub mod optimizer;
pub mod population;
pub mod prelude;
pub mod report;
pub mod selection;
pub mod update;

pub use checkpoint::{Checkpoint, CHECKPOINT_VERSION};
pub use distribution::DiagonalNormal;
pub use error::{CemError, Result, StepError};
pub use noise::NoiseSchedule;
pub use objective::{CountingObjective, ObjectiveFunction};
pub use optimizer::{
    suggest_population_size, suggest_selection_size, CrossEntropy, CrossEntropyConfig,
};
pub use population::{FitnessStats, Individual, Population};
pub use report::GenerationReport;
pub use selection::{EliteSet, Recombination};
