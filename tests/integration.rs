//! Integration tests for the cross-entropy optimizer.
//!
//! These tests run full optimization loops through the public API.

use crossent::benchmarks::{rosenbrock, sphere};
use crossent::prelude::*;
use crossent::Checkpoint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn sphere_run(noise: NoiseSchedule, generations: usize) -> (CrossEntropy, Vec<Vec<f64>>) {
    let mut f = |x: &[f64]| sphere(x);
    let mut cem = CrossEntropy::new(CrossEntropyConfig::default().with_noise(noise));
    cem.init_with(&f, &[0.0, 0.0], 50, 5, vec![1.0, 1.0], StdRng::seed_from_u64(2016))
        .expect("valid configuration");

    let mut variances = Vec::with_capacity(generations);
    for _ in 0..generations {
        cem.step(&mut f).expect("sphere never fails");
        variances.push(cem.variance().unwrap().to_vec());
    }
    (cem, variances)
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[test]
fn test_zero_noise_converges_on_sphere() {
    let (cem, _) = sphere_run(NoiseSchedule::Zero, 50);

    let mean = cem.mean().unwrap();
    assert!(
        distance(mean, &[0.0, 0.0]) < 0.1,
        "mean drifted to {mean:?}"
    );
    for (d, v) in cem.variance().unwrap().iter().enumerate() {
        assert!(*v < 1.0, "variance[{d}] = {v} did not shrink");
        assert!(*v >= 0.0);
    }
    assert_eq!(cem.generation().unwrap(), 50);
    assert_eq!(cem.evaluations().unwrap(), 2500);
}

#[test]
fn test_constant_noise_keeps_variance_floor() {
    let (noisy, noisy_history) = sphere_run(NoiseSchedule::constant(0.5), 50);
    let (quiet, _) = sphere_run(NoiseSchedule::Zero, 50);

    for variance in &noisy_history {
        assert!(variance.iter().all(|v| *v >= 0.5), "floor broken: {variance:?}");
    }
    let late: Vec<f64> = noisy_history[40..].iter().flatten().copied().collect();
    assert!(late.iter().all(|v| *v < 1.5), "variance exploded: {late:?}");

    for (n, q) in noisy.variance().unwrap().iter().zip(quiet.variance().unwrap()) {
        assert!(n > q, "noisy {n} should stay above noiseless {q}");
        assert!(*q < 0.5);
    }
}

#[test]
fn test_decaying_noise_converges_after_floor_ends() {
    let mut objective = Benchmark::new(BenchmarkKind::Sphere, 3, 2.0);
    let mut cem = CrossEntropy::new(
        CrossEntropyConfig::default()
            .with_population_size(60)
            .with_selection_size(6)
            .with_noise(NoiseSchedule::linear(0.2, -0.01)),
    );
    cem.init(&objective, StdRng::seed_from_u64(5)).unwrap();

    for _ in 0..60 {
        cem.step(&mut objective).unwrap();
    }
    assert_eq!(cem.noise().value(cem.generation().unwrap()), 0.0);
    assert!(cem.best().unwrap().unwrap().fitness < 0.01);
}

#[test]
fn test_rosenbrock_makes_progress() {
    let mut f = |x: &[f64]| rosenbrock(x);
    let start = [-1.5, 2.0];
    let initial = rosenbrock(&start);

    let mut cem = CrossEntropy::new(
        CrossEntropyConfig::default()
            .with_population_size(100)
            .with_selection_size(10)
            .with_noise(NoiseSchedule::constant(1e-3))
            .with_recombination(Recombination::Superlinear),
    );
    cem.init_at(&f, &start, StdRng::seed_from_u64(99)).unwrap();
    for _ in 0..100 {
        cem.step(&mut f).unwrap();
    }

    let best = cem.best().unwrap().unwrap();
    assert!(best.fitness < initial / 4.0, "best {} vs start {initial}", best.fitness);
}

#[test]
fn test_checkpoint_file_resume() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cem.json");

    let mut f = |x: &[f64]| sphere(x);
    let mut cem = CrossEntropy::new(
        CrossEntropyConfig::default()
            .with_population_size(30)
            .with_selection_size(3)
            .with_noise(NoiseSchedule::linear(0.5, -0.05)),
    );
    cem.init_at(&f, &[3.0, 3.0, 3.0], StdRng::seed_from_u64(1)).unwrap();
    for _ in 0..5 {
        cem.step(&mut f).unwrap();
    }
    cem.checkpoint().unwrap().save(&path).unwrap();

    let loaded = Checkpoint::load(&path).unwrap();
    let mut resumed = CrossEntropy::from_checkpoint(loaded, StdRng::seed_from_u64(2)).unwrap();
    assert_eq!(resumed.generation().unwrap(), 5);
    for (a, b) in resumed.mean().unwrap().iter().zip(cem.mean().unwrap()) {
        assert!((a - b).abs() < 1e-10);
    }

    let before = resumed.best().unwrap().unwrap().fitness;
    for _ in 0..5 {
        resumed.step(&mut f).unwrap();
    }
    assert_eq!(resumed.generation().unwrap(), 10);
    assert!(resumed.best().unwrap().unwrap().fitness <= before);
}

#[test]
fn test_stateful_objective_is_called_in_order() {
    struct Recorder {
        seen: Vec<Vec<f64>>,
    }

    impl ObjectiveFunction for Recorder {
        type Error = std::convert::Infallible;

        fn evaluate(&mut self, point: &[f64]) -> Result<f64, Self::Error> {
            self.seen.push(point.to_vec());
            Ok(sphere(point))
        }
    }

    let mut recorder = Recorder { seen: Vec::new() };
    let mut cem = CrossEntropy::new(
        CrossEntropyConfig::default()
            .with_population_size(7)
            .with_selection_size(2),
    );
    cem.init_at(&recorder, &[1.0, 2.0], StdRng::seed_from_u64(3))
        .unwrap();
    let population = cem.step(&mut recorder).unwrap().clone();

    let sampled: Vec<Vec<f64>> = population.iter().map(|ind| ind.point.clone()).collect();
    assert_eq!(recorder.seen, sampled);
}
