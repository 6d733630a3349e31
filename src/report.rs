//! Read-only snapshot of the optimizer after a step.

use serde::{Deserialize, Serialize};

use crate::population::{FitnessStats, Individual};

/// What a caller can record about one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generations completed so far
    pub generation: u64,
    /// Objective evaluations made since `init`
    pub evaluations: u64,
    /// Fitness statistics of the last evaluated population
    pub fitness: FitnessStats,
    /// Best individual found since `init`
    pub best: Option<Individual>,
    /// Distribution mean after the update
    pub mean: Vec<f64>,
    /// Distribution variance after the update
    pub variance: Vec<f64>,
    /// Formula of the active noise schedule
    pub noise: String,
}

impl GenerationReport {
    /// Column names for `dim`-dimensional reports.
    #[must_use]
    pub fn csv_header(dim: usize) -> Vec<String> {
        let mut cols: Vec<String> = ["generation", "evaluations", "min", "max", "mean", "std_dev"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        cols.push("noise".to_string());
        cols.extend((0..dim).map(|i| format!("m{i}")));
        cols.extend((0..dim).map(|i| format!("v{i}")));
        cols
    }

    /// Field values in [`csv_header`](Self::csv_header) order.
    #[must_use]
    pub fn csv_record(&self) -> Vec<String> {
        let mut cols = vec![
            self.generation.to_string(),
            self.evaluations.to_string(),
            self.fitness.min.to_string(),
            self.fitness.max.to_string(),
            self.fitness.mean.to_string(),
            self.fitness.std_dev.to_string(),
            self.noise.clone(),
        ];
        cols.extend(self.mean.iter().map(f64::to_string));
        cols.extend(self.variance.iter().map(f64::to_string));
        cols
    }
}
