//! The function being minimized.
//!
//! Any `FnMut(&[f64]) -> f64` is an objective that never fails. Types that
//! can fail, keep state between calls, or know their own dimensionality
//! implement [`ObjectiveFunction`] directly.
//!
//! ```
//! use crossent::ObjectiveFunction;
//!
//! let mut sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//! assert_eq!(sphere.evaluate(&[1.0, 2.0]), Ok(5.0));
//! ```

use std::convert::Infallible;

/// A single-objective function under the minimization convention.
pub trait ObjectiveFunction {
    /// Error raised by a failed evaluation.
    type Error;

    /// Score one point; lower is better.
    fn evaluate(&mut self, point: &[f64]) -> Result<f64, Self::Error>;

    /// Dimensionality of the search space, if fixed.
    fn number_of_variables(&self) -> Option<usize> {
        None
    }

    /// Starting point to use when none is given to `init`.
    fn propose_starting_point(&self) -> Option<Vec<f64>> {
        None
    }
}

impl<F> ObjectiveFunction for F
where
    F: FnMut(&[f64]) -> f64,
{
    type Error = Infallible;

    fn evaluate(&mut self, point: &[f64]) -> Result<f64, Infallible> {
        Ok(self(point))
    }
}

/// Counts evaluations made through it.
#[derive(Debug, Clone)]
pub struct CountingObjective<O> {
    inner: O,
    evaluations: u64,
}

impl<O> CountingObjective<O> {
    /// Wrap an objective.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            evaluations: 0,
        }
    }

    /// Number of calls to `evaluate` so far, failed ones included.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Unwrap the inner objective.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: ObjectiveFunction> ObjectiveFunction for CountingObjective<O> {
    type Error = O::Error;

    fn evaluate(&mut self, point: &[f64]) -> Result<f64, Self::Error> {
        self.evaluations += 1;
        self.inner.evaluate(point)
    }

    fn number_of_variables(&self) -> Option<usize> {
        self.inner.number_of_variables()
    }

    fn propose_starting_point(&self) -> Option<Vec<f64>> {
        self.inner.propose_starting_point()
    }
}
