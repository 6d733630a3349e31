use super::*;
use crate::population::Individual;

fn elite(points: &[[f64; 2]], weights: &[f64]) -> EliteSet {
    EliteSet::new(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| Individual::new(p.to_vec(), i as f64))
            .collect(),
        weights.to_vec(),
    )
    .unwrap()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
    }
}

#[test]
fn test_three_points_uniform_weights() {
    // x: 1, 2, 6 -> mean 3, var (4 + 1 + 9) / 3
    // y: 0, 3, 3 -> mean 2, var (4 + 1 + 1) / 3
    let e = elite(&[[1.0, 0.0], [2.0, 3.0], [6.0, 3.0]], &[1.0 / 3.0; 3]);
    let r = refit(&e, 2, 0.0).unwrap();
    assert_close(&r.mean, &[3.0, 2.0]);
    assert_close(&r.variance, &[14.0 / 3.0, 2.0]);
}

#[test]
fn test_three_points_known_weights() {
    // weights 0.5, 0.3, 0.2
    // x: 0.5*1 + 0.3*2 + 0.2*6 = 2.3
    // y: 0.5*0 + 0.3*3 + 0.2*3 = 1.5
    let e = elite(&[[1.0, 0.0], [2.0, 3.0], [6.0, 3.0]], &[0.5, 0.3, 0.2]);
    let r = refit(&e, 2, 0.0).unwrap();
    assert_close(&r.mean, &[2.3, 1.5]);

    let vx = 0.5 * 1.3f64.powi(2) + 0.3 * 0.3f64.powi(2) + 0.2 * 3.7f64.powi(2);
    let vy = 0.5 * 1.5f64.powi(2) + 0.3 * 1.5f64.powi(2) + 0.2 * 1.5f64.powi(2);
    assert_close(&r.variance, &[vx, vy]);
}

#[test]
fn test_noise_is_added_to_every_dimension() {
    let e = elite(&[[1.0, 0.0], [2.0, 3.0], [6.0, 3.0]], &[1.0 / 3.0; 3]);
    let r = refit(&e, 2, 0.5).unwrap();
    assert_close(&r.variance, &[14.0 / 3.0 + 0.5, 2.5]);
}

#[test]
fn test_single_member_variance_is_noise() {
    let e = elite(&[[4.0, -1.0]], &[1.0]);
    let r = refit(&e, 2, 0.0).unwrap();
    assert_eq!(r.mean, vec![4.0, -1.0]);
    assert_eq!(r.variance, vec![0.0, 0.0]);

    let r = refit(&e, 2, 0.25).unwrap();
    assert_eq!(r.variance, vec![0.25, 0.25]);
}

#[test]
fn test_dimension_mismatch_is_reported() {
    let e = elite(&[[1.0, 2.0]], &[1.0]);
    assert!(matches!(
        refit(&e, 3, 0.0),
        Err(CemError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_apply_commits_both() {
    let mut dist = DiagonalNormal::isotropic(vec![0.0, 0.0], 1.0).unwrap();
    let e = elite(&[[1.0, 0.0], [2.0, 3.0], [6.0, 3.0]], &[1.0 / 3.0; 3]);
    apply(&mut dist, &e, 0.0).unwrap();
    assert_close(dist.mean(), &[3.0, 2.0]);
    assert_close(dist.variance(), &[14.0 / 3.0, 2.0]);
}

#[test]
fn test_apply_failure_leaves_distribution() {
    let mut dist = DiagonalNormal::isotropic(vec![0.0; 3], 1.0).unwrap();
    let e = elite(&[[1.0, 0.0]], &[1.0]);
    assert!(apply(&mut dist, &e, 0.0).is_err());
    assert_eq!(dist.mean(), &[0.0; 3]);
    assert_eq!(dist.variance(), &[1.0; 3]);
}
