use super::*;

#[test]
fn test_categorical_cross_entropy_loss() {
    let loss = CategoricalCrossEntropy::new();

    let y = array![0.0_f32, 1.0, 0.0];
    let p = array![0.2_f32, 0.5, 0.3];
    assert_relative_eq!(loss.compute_loss(y.view(), p.view()), -(0.5_f32).ln(), epsilon = 1e-6);

    // a perfect prediction costs (almost) nothing
    let perfect = array![0.0_f32, 1.0, 0.0];
    let l = loss.compute_loss(y.view(), perfect.view());
    assert!(l >= 0.0);
    assert_abs_diff_eq!(l, 0.0, epsilon = 1e-5);
}

#[test]
fn test_categorical_cross_entropy_is_non_negative() {
    let loss = CategoricalCrossEntropy::new();
    let y = array![1.0_f32, 0.0];
    for p0 in [0.0_f32, 0.01, 0.3, 0.5, 0.99, 1.0] {
        let p = array![p0, 1.0 - p0];
        let l = loss.compute_loss(y.view(), p.view());
        assert!(l.is_finite());
        assert!(l >= 0.0);
    }
}

#[test]
fn test_categorical_cross_entropy_grad() {
    let loss = CategoricalCrossEntropy::new();
    let y = array![0.0_f32, 1.0];
    let p = array![0.75_f32, 0.25];
    let g = loss.compute_grad(y.view(), p.view());
    assert_abs_diff_eq!(g[0], 0.0);
    assert_relative_eq!(g[1], -4.0, epsilon = 1e-5);
}
