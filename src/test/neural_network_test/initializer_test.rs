use super::*;
use crate::neural_network::initializer::{orthogonal_matrix, truncated_orthogonal};

fn assert_identity(m: &Array2<f32>) {
    for ((i, j), v) in m.indexed_iter() {
        let expected = if i == j { 1.0 } else { 0.0 };
        assert_abs_diff_eq!(*v, expected, epsilon = 1e-5);
    }
}

#[test]
fn test_orthogonal_matrix() {
    let mut rng = seeded_rng(0);
    let q = orthogonal_matrix(32, &mut rng).unwrap();
    assert_eq!(q.dim(), (32, 32));

    assert_identity(&q.dot(&q.t()));
    assert_identity(&q.t().dot(&q));
}

#[test]
fn test_orthogonal_matrix_size_one() {
    let mut rng = seeded_rng(1);
    let q = orthogonal_matrix(1, &mut rng).unwrap();
    assert_relative_eq!(q[[0, 0]].abs(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_orthogonal_matrix_zero_size() {
    let mut rng = seeded_rng(2);
    assert!(matches!(
        orthogonal_matrix(0, &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_orthogonal_matrix_is_seeded() {
    let a = orthogonal_matrix(6, &mut seeded_rng(9)).unwrap();
    let b = orthogonal_matrix(6, &mut seeded_rng(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_truncated_orthogonal_wide() {
    // fewer rows than columns: rows stay orthonormal
    let mut rng = seeded_rng(3);
    let w = truncated_orthogonal(3, 8, &mut rng).unwrap();
    assert_eq!(w.dim(), (3, 8));
    assert_identity(&w.dot(&w.t()));
}

#[test]
fn test_truncated_orthogonal_tall() {
    // fewer columns than rows: columns stay orthonormal
    let mut rng = seeded_rng(4);
    let w = truncated_orthogonal(10, 2, &mut rng).unwrap();
    assert_eq!(w.dim(), (10, 2));
    assert_identity(&w.t().dot(&w));
}

#[test]
fn test_truncated_orthogonal_empty_shape() {
    let mut rng = seeded_rng(5);
    assert!(truncated_orthogonal(0, 4, &mut rng).is_err());
    assert!(truncated_orthogonal(4, 0, &mut rng).is_err());
}
