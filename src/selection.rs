//! Truncation selection and recombination weights.
//!
//! The population is ranked by ascending fitness with a stable sort, so
//! equal fitness values keep their sampling order. The first `mu` ranked
//! individuals form the elite set, each paired with a weight from the
//! configured [`Recombination`] scheme.

use serde::{Deserialize, Serialize};

use crate::error::{CemError, Result};
use crate::population::{fitness_order, Individual, Population};

/// How elite members are weighted when refitting the distribution.
///
/// Every scheme yields non-negative, non-increasing weights that sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recombination {
    /// `w_i = 1 / mu`
    #[default]
    Equal,
    /// `w_i ∝ mu - i`
    Linear,
    /// `w_i ∝ ln(mu + 0.5) - ln(i + 1)` (log-linear)
    Superlinear,
}

impl Recombination {
    /// Normalized weights for an elite set of size `mu`, best first.
    #[must_use]
    pub fn weights(&self, mu: usize) -> Vec<f64> {
        if mu == 0 {
            return Vec::new();
        }
        let raw: Vec<f64> = match self {
            Self::Equal => vec![1.0; mu],
            Self::Linear => (0..mu).map(|i| (mu - i) as f64).collect(),
            Self::Superlinear => (0..mu)
                .map(|i| ((mu as f64 + 0.5).ln() - ((i + 1) as f64).ln()).max(0.0))
                .collect(),
        };
        let sum: f64 = raw.iter().sum();
        raw.iter().map(|w| w / sum).collect()
    }

    /// Get string name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Linear => "linear",
            Self::Superlinear => "superlinear",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "equal" | "uniform" => Some(Self::Equal),
            "linear" | "rank" => Some(Self::Linear),
            "superlinear" | "log" => Some(Self::Superlinear),
            _ => None,
        }
    }
}

/// The selected individuals and their recombination weights.
#[derive(Debug, Clone, PartialEq)]
pub struct EliteSet {
    members: Vec<Individual>,
    weights: Vec<f64>,
}

impl EliteSet {
    /// Pair members with weights of the same length.
    pub fn new(members: Vec<Individual>, weights: Vec<f64>) -> Result<Self> {
        if members.len() != weights.len() {
            return Err(CemError::DimensionMismatch {
                expected: members.len(),
                actual: weights.len(),
            });
        }
        if members.is_empty() {
            return Err(CemError::invalid_config("elite size", 0, ">= 1"));
        }
        Ok(Self { members, weights })
    }

    /// Elite members, best first.
    #[must_use]
    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Weights aligned with [`members`](Self::members).
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of elite members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Indices of `population` in ranked order (stable, NaN last).
#[must_use]
pub fn rank(population: &Population) -> Vec<usize> {
    let members = population.members();
    let mut order: Vec<usize> = (0..members.len()).collect();
    order.sort_by(|&a, &b| fitness_order(members[a].fitness, members[b].fitness));
    order
}

/// Pick the best `selection_size` individuals of `population`.
///
/// The elite set has `min(selection_size, population.len())` members.
pub fn select(
    population: &Population,
    selection_size: usize,
    recombination: Recombination,
) -> Result<EliteSet> {
    if selection_size == 0 {
        return Err(CemError::invalid_config("selection_size", 0, ">= 1"));
    }
    let mu = selection_size.min(population.len());
    let members: Vec<Individual> = rank(population)
        .into_iter()
        .take(mu)
        .map(|i| population.members()[i].clone())
        .collect();
    EliteSet::new(members, recombination.weights(mu))
}
