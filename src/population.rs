//! Candidate solutions and the per-generation population.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A sampled point together with its objective value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Point in the search space
    pub point: Vec<f64>,
    /// Objective value (lower is better)
    pub fitness: f64,
}

impl Individual {
    /// Create an individual.
    #[must_use]
    pub fn new(point: Vec<f64>, fitness: f64) -> Self {
        Self { point, fitness }
    }

    /// Strict improvement under minimization. NaN never improves.
    #[must_use]
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.fitness < other.fitness
    }
}

/// Total order on fitness for minimization: ascending, NaN last.
#[must_use]
pub fn fitness_order(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// Summary of the fitness values of one population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessStats {
    /// Lowest fitness
    pub min: f64,
    /// Highest fitness
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

/// One generation's evaluated samples, in sampling order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    members: Vec<Individual>,
}

impl Population {
    /// Wrap a list of evaluated individuals.
    #[must_use]
    pub fn new(members: Vec<Individual>) -> Self {
        Self { members }
    }

    /// Number of individuals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Individuals in sampling order.
    #[must_use]
    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Iterate over the individuals.
    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.members.iter()
    }

    /// Best individual; the earliest sampled wins ties.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.members.iter().reduce(|best, candidate| {
            if fitness_order(candidate.fitness, best.fitness) == Ordering::Less {
                candidate
            } else {
                best
            }
        })
    }

    /// Min, max, mean and standard deviation of fitness.
    ///
    /// Returns `None` for an empty population.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        if self.members.is_empty() {
            return None;
        }
        let n = self.members.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for ind in &self.members {
            min = min.min(ind.fitness);
            max = max.max(ind.fitness);
            sum += ind.fitness;
        }
        let mean = sum / n;
        let var = self
            .members
            .iter()
            .map(|ind| (ind.fitness - mean).powi(2))
            .sum::<f64>()
            / n;
        Some(FitnessStats {
            min,
            max,
            mean,
            std_dev: var.sqrt(),
        })
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
