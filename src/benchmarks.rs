//! Standard test objectives.
//!
//! Plain functions for use as closures, plus [`Benchmark`], which also
//! knows its dimensionality and proposes a starting point so it can be
//! passed to [`CrossEntropy::init`](crate::CrossEntropy::init) directly.

use std::convert::Infallible;
use std::f64::consts::{E, PI};

use serde::{Deserialize, Serialize};

use crate::objective::ObjectiveFunction;

/// Sphere: `f(x) = Σ xᵢ²`, minimum 0 at the origin.
///
/// ```
/// use crossent::benchmarks::sphere;
/// assert_eq!(sphere(&[3.0, 4.0]), 25.0);
/// ```
#[must_use]
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

/// Rosenbrock: minimum 0 at `(1, ..., 1)` in a curved valley.
#[must_use]
pub fn rosenbrock(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Rastrigin: minimum 0 at the origin, regular lattice of local minima.
#[must_use]
pub fn rastrigin(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Ackley: minimum 0 at the origin, nearly flat outer region.
#[must_use]
pub fn ackley(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|xi| (2.0 * PI * xi).cos()).sum();
    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Which test function to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkKind {
    /// [`sphere`]
    Sphere,
    /// [`rosenbrock`]
    Rosenbrock,
    /// [`rastrigin`]
    Rastrigin,
    /// [`ackley`]
    Ackley,
}

impl BenchmarkKind {
    /// Get string name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Rosenbrock => "rosenbrock",
            Self::Rastrigin => "rastrigin",
            Self::Ackley => "ackley",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sphere" => Some(Self::Sphere),
            "rosenbrock" | "rosen" => Some(Self::Rosenbrock),
            "rastrigin" => Some(Self::Rastrigin),
            "ackley" => Some(Self::Ackley),
            _ => None,
        }
    }

    /// Evaluate the function.
    #[must_use]
    pub fn eval(&self, x: &[f64]) -> f64 {
        match self {
            Self::Sphere => sphere(x),
            Self::Rosenbrock => rosenbrock(x),
            Self::Rastrigin => rastrigin(x),
            Self::Ackley => ackley(x),
        }
    }
}

/// A benchmark function bound to a dimensionality and a starting point.
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    kind: BenchmarkKind,
    start: Vec<f64>,
}

impl Benchmark {
    /// Benchmark in `dim` dimensions starting from `(start, ..., start)`.
    #[must_use]
    pub fn new(kind: BenchmarkKind, dim: usize, start: f64) -> Self {
        Self {
            kind,
            start: vec![start; dim],
        }
    }

    /// Benchmark starting from an explicit point.
    #[must_use]
    pub fn with_start(kind: BenchmarkKind, start: Vec<f64>) -> Self {
        Self { kind, start }
    }

    /// The test function.
    #[must_use]
    pub fn kind(&self) -> BenchmarkKind {
        self.kind
    }
}

impl ObjectiveFunction for Benchmark {
    type Error = Infallible;

    fn evaluate(&mut self, point: &[f64]) -> Result<f64, Infallible> {
        Ok(self.kind.eval(point))
    }

    fn number_of_variables(&self) -> Option<usize> {
        Some(self.start.len())
    }

    fn propose_starting_point(&self) -> Option<Vec<f64>> {
        Some(self.start.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optima() {
        assert!(sphere(&[0.0; 5]).abs() < 1e-12);
        assert!(rosenbrock(&[1.0; 5]).abs() < 1e-12);
        assert!(rastrigin(&[0.0; 5]).abs() < 1e-12);
        assert!(ackley(&[0.0; 5]).abs() < 1e-12);
    }

    #[test]
    fn test_off_optimum_is_positive() {
        let x = [0.5, -0.3, 1.2];
        for kind in [
            BenchmarkKind::Sphere,
            BenchmarkKind::Rosenbrock,
            BenchmarkKind::Rastrigin,
            BenchmarkKind::Ackley,
        ] {
            assert!(kind.eval(&x) > 0.0, "{}", kind.as_str());
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        for kind in [
            BenchmarkKind::Sphere,
            BenchmarkKind::Rosenbrock,
            BenchmarkKind::Rastrigin,
            BenchmarkKind::Ackley,
        ] {
            assert_eq!(BenchmarkKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(BenchmarkKind::parse("griewank"), None);
    }

    #[test]
    fn test_benchmark_objective() {
        let mut bench = Benchmark::new(BenchmarkKind::Sphere, 3, 2.0);
        assert_eq!(bench.number_of_variables(), Some(3));
        assert_eq!(bench.propose_starting_point(), Some(vec![2.0; 3]));
        assert_eq!(bench.evaluate(&[1.0, 1.0, 1.0]), Ok(3.0));
        assert_eq!(bench.kind(), BenchmarkKind::Sphere);
    }

    #[test]
    fn test_benchmark_with_explicit_start() {
        let bench = Benchmark::with_start(BenchmarkKind::Rosenbrock, vec![-1.5, 2.0]);
        assert_eq!(bench.kind(), BenchmarkKind::Rosenbrock);
        assert_eq!(bench.number_of_variables(), Some(2));
        assert_eq!(bench.propose_starting_point(), Some(vec![-1.5, 2.0]));
    }
}
