//! The Cross-Entropy Method optimizer.
//!
//! Each [`step`](CrossEntropy::step) samples `λ` points from a diagonal
//! normal distribution, scores them with the objective, keeps the best `μ`
//! and refits mean and variance to that elite set, adding the noise
//! schedule's value to every variance component.
//!
//! The optimizer never decides when to stop; callers loop over `step`
//! until their own budget or convergence test says otherwise.
//!
//! # Example
//!
//! ```
//! use crossent::{CrossEntropy, CrossEntropyConfig, NoiseSchedule};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = CrossEntropyConfig::default()
//!     .with_population_size(50)
//!     .with_selection_size(5)
//!     .with_noise(NoiseSchedule::constant(0.01));
//! let mut sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//!
//! let mut cem = CrossEntropy::new(config);
//! cem.init_at(&sphere, &[3.0, -2.0], StdRng::seed_from_u64(42)).unwrap();
//! for _ in 0..40 {
//!     cem.step(&mut sphere).unwrap();
//! }
//! assert!(cem.best().unwrap().unwrap().fitness < 0.1);
//! ```

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::checkpoint::{Checkpoint, CHECKPOINT_VERSION};
use crate::distribution::{validate_variance, DiagonalNormal};
use crate::error::{CemError, Result, StepError};
use crate::noise::NoiseSchedule;
use crate::objective::ObjectiveFunction;
use crate::population::{Individual, Population};
use crate::report::GenerationReport;
use crate::selection::{self, Recombination};
use crate::update;

/// Settings applied at `init`.
///
/// Sizes left as `None` fall back to [`suggest_population_size`] and
/// [`suggest_selection_size`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossEntropyConfig {
    /// Samples per generation (λ)
    pub population_size: Option<usize>,
    /// Elite members kept per generation (μ)
    pub selection_size: Option<usize>,
    /// Variance used in every dimension at `init_at`
    pub initial_variance: f64,
    /// Noise added to the variance after each refit
    pub noise: NoiseSchedule,
    /// Elite weighting
    pub recombination: Recombination,
}

impl Default for CrossEntropyConfig {
    fn default() -> Self {
        Self {
            population_size: None,
            selection_size: None,
            initial_variance: 1.0,
            noise: NoiseSchedule::Zero,
            recombination: Recombination::Equal,
        }
    }
}

impl CrossEntropyConfig {
    /// Set population size (λ).
    #[must_use]
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Set selection size (μ).
    #[must_use]
    pub fn with_selection_size(mut self, size: usize) -> Self {
        self.selection_size = Some(size);
        self
    }

    /// Set initial variance.
    #[must_use]
    pub fn with_initial_variance(mut self, variance: f64) -> Self {
        self.initial_variance = variance;
        self
    }

    /// Set noise schedule.
    #[must_use]
    pub fn with_noise(mut self, noise: NoiseSchedule) -> Self {
        self.noise = noise;
        self
    }

    /// Set recombination weights.
    #[must_use]
    pub fn with_recombination(mut self, recombination: Recombination) -> Self {
        self.recombination = recombination;
        self
    }

    /// Resolve population and selection size for a `dim`-dimensional problem.
    pub fn resolve_sizes(&self, dim: usize) -> Result<(usize, usize)> {
        let lambda = self
            .population_size
            .unwrap_or_else(|| suggest_population_size(dim));
        let mu = self
            .selection_size
            .unwrap_or_else(|| suggest_selection_size(lambda));
        validate_sizes(lambda, mu)?;
        Ok((lambda, mu))
    }

    /// Check the configuration without a problem at hand.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_variance.is_finite() || self.initial_variance < 0.0 {
            return Err(CemError::invalid_config(
                "initial_variance",
                self.initial_variance,
                "a finite value >= 0",
            ));
        }
        self.noise.validate()?;
        match (self.population_size, self.selection_size) {
            (Some(lambda), Some(mu)) => validate_sizes(lambda, mu),
            (Some(0), None) => Err(CemError::invalid_config("population_size", 0, ">= 1")),
            (None, Some(0)) => Err(CemError::invalid_config("selection_size", 0, ">= 1")),
            _ => Ok(()),
        }
    }
}

/// Default λ for a `dim`-dimensional problem: `max(100, 10 · dim)`.
#[must_use]
pub fn suggest_population_size(dim: usize) -> usize {
    100.max(10 * dim)
}

/// Default μ for a population of `population_size`: a tenth, at least 1.
#[must_use]
pub fn suggest_selection_size(population_size: usize) -> usize {
    (population_size / 10).max(1)
}

fn validate_sizes(population_size: usize, selection_size: usize) -> Result<()> {
    if population_size == 0 {
        return Err(CemError::invalid_config("population_size", 0, ">= 1"));
    }
    if selection_size == 0 || selection_size > population_size {
        return Err(CemError::invalid_config(
            "selection_size",
            selection_size,
            format!("1..={population_size}"),
        ));
    }
    Ok(())
}

/// Everything that exists only between `init` and the end of the run.
#[derive(Debug, Clone)]
struct RunState<R> {
    rng: R,
    distribution: DiagonalNormal,
    population_size: usize,
    selection_size: usize,
    generation: u64,
    evaluations: u64,
    best: Option<Individual>,
    population: Population,
}

/// Cross-Entropy Method optimizer over `R`, the injected random source.
#[derive(Debug, Clone)]
pub struct CrossEntropy<R = StdRng> {
    config: CrossEntropyConfig,
    state: Option<RunState<R>>,
}

impl<R: Rng> Default for CrossEntropy<R> {
    fn default() -> Self {
        Self::new(CrossEntropyConfig::default())
    }
}

impl<R: Rng> CrossEntropy<R> {
    /// Create an uninitialized optimizer.
    #[must_use]
    pub fn new(config: CrossEntropyConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// The configuration this optimizer was built with.
    #[must_use]
    pub fn config(&self) -> &CrossEntropyConfig {
        &self.config
    }

    /// Whether `init` has been called.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Initialize at the objective's proposed starting point.
    pub fn init<O: ObjectiveFunction>(&mut self, objective: &O, rng: R) -> Result<()> {
        let start = objective.propose_starting_point().ok_or_else(|| {
            CemError::invalid_config(
                "starting_point",
                "none",
                "a point, since the objective proposes none",
            )
        })?;
        self.init_at(objective, &start, rng)
    }

    /// Initialize at `start` with the configured sizes and variance.
    pub fn init_at<O: ObjectiveFunction>(
        &mut self,
        objective: &O,
        start: &[f64],
        rng: R,
    ) -> Result<()> {
        self.config.validate()?;
        let (lambda, mu) = self.config.resolve_sizes(start.len())?;
        let variance = vec![self.config.initial_variance; start.len()];
        self.init_with(objective, start, lambda, mu, variance, rng)
    }

    /// Initialize with explicit sizes and per-dimension variance.
    pub fn init_with<O: ObjectiveFunction>(
        &mut self,
        objective: &O,
        start: &[f64],
        population_size: usize,
        selection_size: usize,
        initial_variance: Vec<f64>,
        rng: R,
    ) -> Result<()> {
        if start.is_empty() {
            return Err(CemError::invalid_config("starting_point", "[]", "at least one dimension"));
        }
        if let Some(n) = objective.number_of_variables() {
            if n != start.len() {
                return Err(CemError::DimensionMismatch {
                    expected: n,
                    actual: start.len(),
                });
            }
        }
        validate_sizes(population_size, selection_size)?;
        self.config.noise.validate()?;
        let distribution = DiagonalNormal::new(start.to_vec(), initial_variance)?;

        info!(
            dim = start.len(),
            population_size,
            selection_size,
            noise = %self.config.noise,
            recombination = self.config.recombination.as_str(),
            "cross-entropy initialized"
        );

        self.state = Some(RunState {
            rng,
            distribution,
            population_size,
            selection_size,
            generation: 0,
            evaluations: 0,
            best: None,
            population: Population::default(),
        });
        Ok(())
    }

    /// Resume a run from a checkpoint.
    pub fn from_checkpoint(checkpoint: Checkpoint, rng: R) -> Result<Self> {
        checkpoint.validate()?;
        let config = CrossEntropyConfig {
            population_size: Some(checkpoint.population_size),
            selection_size: Some(checkpoint.selection_size),
            initial_variance: 1.0,
            noise: checkpoint.noise,
            recombination: checkpoint.recombination,
        };
        let distribution = DiagonalNormal::new(checkpoint.mean, checkpoint.variance)?;
        info!(
            generation = checkpoint.generation,
            dim = distribution.dimension(),
            "cross-entropy restored from checkpoint"
        );
        Ok(Self {
            config,
            state: Some(RunState {
                rng,
                distribution,
                population_size: checkpoint.population_size,
                selection_size: checkpoint.selection_size,
                generation: checkpoint.generation,
                evaluations: checkpoint.evaluations,
                best: checkpoint.best,
                population: Population::default(),
            }),
        })
    }

    /// Run one generation: sample, evaluate, select, refit.
    ///
    /// Every sampled point is evaluated exactly once. If the objective
    /// fails, its error is returned as [`StepError::Objective`] and the
    /// optimizer state is left exactly as before the call, apart from the
    /// random source having advanced.
    pub fn step<O: ObjectiveFunction>(
        &mut self,
        objective: &mut O,
    ) -> std::result::Result<&Population, StepError<O::Error>> {
        let noise = self.config.noise;
        let recombination = self.config.recombination;
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| CemError::not_initialized("step"))?;

        let mut members = Vec::with_capacity(state.population_size);
        for _ in 0..state.population_size {
            let point = state.distribution.sample(&mut state.rng);
            let fitness = objective.evaluate(&point).map_err(StepError::Objective)?;
            members.push(Individual::new(point, fitness));
        }
        let population = Population::new(members);

        let elite = selection::select(&population, state.selection_size, recombination)?;
        let z = noise.value(state.generation);
        update::apply(&mut state.distribution, &elite, z)?;

        if let Some(candidate) = population.best().filter(|c| !c.fitness.is_nan()) {
            let improved = state
                .best
                .as_ref()
                .map_or(true, |best| candidate.is_better_than(best));
            if improved {
                state.best = Some(candidate.clone());
            }
        }

        state.generation += 1;
        state.evaluations += population.len() as u64;

        let degenerate = state.distribution.degenerate_dimensions();
        if !degenerate.is_empty() {
            warn!(
                generation = state.generation,
                dimensions = ?degenerate,
                "variance collapsed to zero"
            );
        }
        if let Some(stats) = population.fitness_stats() {
            debug!(
                generation = state.generation,
                min = stats.min,
                mean = stats.mean,
                best = state.best.as_ref().map(|b| b.fitness),
                noise = z,
                "generation complete"
            );
        }

        state.population = population;
        Ok(&state.population)
    }

    fn state(&self, operation: &str) -> Result<&RunState<R>> {
        self.state
            .as_ref()
            .ok_or_else(|| CemError::not_initialized(operation))
    }

    fn state_mut(&mut self, operation: &str) -> Result<&mut RunState<R>> {
        self.state
            .as_mut()
            .ok_or_else(|| CemError::not_initialized(operation))
    }

    /// Current distribution mean.
    pub fn mean(&self) -> Result<&[f64]> {
        Ok(self.state("mean")?.distribution.mean())
    }

    /// Current per-dimension variance.
    pub fn variance(&self) -> Result<&[f64]> {
        Ok(self.state("variance")?.distribution.variance())
    }

    /// The sampling distribution.
    pub fn distribution(&self) -> Result<&DiagonalNormal> {
        Ok(&self.state("distribution")?.distribution)
    }

    /// Dimensionality of the search space.
    pub fn dimension(&self) -> Result<usize> {
        Ok(self.state("dimension")?.distribution.dimension())
    }

    /// Replace the mean.
    pub fn set_mean(&mut self, mean: Vec<f64>) -> Result<()> {
        self.state_mut("set_mean")?.distribution.set_mean(mean)
    }

    /// Replace the variance vector.
    pub fn set_variance(&mut self, variance: Vec<f64>) -> Result<()> {
        self.state_mut("set_variance")?
            .distribution
            .set_variance(variance)
    }

    /// Set every variance component to `variance`.
    pub fn set_variance_all(&mut self, variance: f64) -> Result<()> {
        validate_variance(&[variance])?;
        self.state_mut("set_variance_all")?
            .distribution
            .set_variance_all(variance)
    }

    /// Samples per generation (λ).
    pub fn population_size(&self) -> Result<usize> {
        Ok(self.state("population_size")?.population_size)
    }

    /// Elite members per generation (μ).
    pub fn selection_size(&self) -> Result<usize> {
        Ok(self.state("selection_size")?.selection_size)
    }

    /// Change λ; applies from the next step.
    pub fn set_population_size(&mut self, population_size: usize) -> Result<()> {
        let state = self.state_mut("set_population_size")?;
        validate_sizes(population_size, state.selection_size)?;
        state.population_size = population_size;
        Ok(())
    }

    /// Change μ; applies from the next step.
    pub fn set_selection_size(&mut self, selection_size: usize) -> Result<()> {
        let state = self.state_mut("set_selection_size")?;
        validate_sizes(state.population_size, selection_size)?;
        state.selection_size = selection_size;
        Ok(())
    }

    /// Change λ and μ together.
    pub fn set_sizes(&mut self, population_size: usize, selection_size: usize) -> Result<()> {
        let state = self.state_mut("set_sizes")?;
        validate_sizes(population_size, selection_size)?;
        state.population_size = population_size;
        state.selection_size = selection_size;
        Ok(())
    }

    /// Active noise schedule.
    #[must_use]
    pub fn noise(&self) -> &NoiseSchedule {
        &self.config.noise
    }

    /// Swap the noise schedule; used from the next variance update.
    ///
    /// A schedule with non-finite coefficients is rejected and the current
    /// one is kept.
    pub fn set_noise(&mut self, noise: NoiseSchedule) -> Result<()> {
        noise.validate()?;
        self.config.noise = noise;
        Ok(())
    }

    /// Active recombination weights.
    #[must_use]
    pub fn recombination(&self) -> Recombination {
        self.config.recombination
    }

    /// Swap the recombination weights; used from the next step.
    pub fn set_recombination(&mut self, recombination: Recombination) {
        self.config.recombination = recombination;
    }

    /// Generations completed since `init`.
    pub fn generation(&self) -> Result<u64> {
        Ok(self.state("generation")?.generation)
    }

    /// Objective evaluations since `init`.
    pub fn evaluations(&self) -> Result<u64> {
        Ok(self.state("evaluations")?.evaluations)
    }

    /// Best individual found so far; `None` before the first step.
    pub fn best(&self) -> Result<Option<&Individual>> {
        Ok(self.state("best")?.best.as_ref())
    }

    /// Population evaluated by the last step; empty before the first.
    pub fn population(&self) -> Result<&Population> {
        Ok(&self.state("population")?.population)
    }

    /// Snapshot of the last generation.
    pub fn report(&self) -> Result<GenerationReport> {
        let state = self.state("report")?;
        let fitness = state.population.fitness_stats().ok_or_else(|| {
            CemError::IllegalState("`report` needs at least one completed step".to_string())
        })?;
        Ok(GenerationReport {
            generation: state.generation,
            evaluations: state.evaluations,
            fitness,
            best: state.best.clone(),
            mean: state.distribution.mean().to_vec(),
            variance: state.distribution.variance().to_vec(),
            noise: self.config.noise.description(),
        })
    }

    /// Export the resumable state.
    pub fn checkpoint(&self) -> Result<Checkpoint> {
        let state = self.state("checkpoint")?;
        Ok(Checkpoint {
            version: CHECKPOINT_VERSION,
            mean: state.distribution.mean().to_vec(),
            variance: state.distribution.variance().to_vec(),
            population_size: state.population_size,
            selection_size: state.selection_size,
            generation: state.generation,
            evaluations: state.evaluations,
            noise: self.config.noise,
            recombination: self.config.recombination,
            best: state.best.clone().filter(|b| b.fitness.is_finite()),
        })
    }
}

#[cfg(test)]
#[path = "optimizer_tests.rs"]
mod tests;
