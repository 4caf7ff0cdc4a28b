use super::*;

#[test]
fn test_sigmoid_and_tanh_ranges() {
    for x in [-20.0_f32, -3.0, -0.5, 0.0, 0.5, 3.0, 20.0] {
        let s = sigmoid(x);
        assert!((0.0..=1.0).contains(&s));
        let t = tanh(x);
        assert!((-1.0..=1.0).contains(&t));
    }
    assert_relative_eq!(sigmoid(0.0), 0.5);
    assert_relative_eq!(tanh(0.0), 0.0);

    // clamped inputs stay finite
    assert!(sigmoid(-1e6).is_finite());
    assert!(tanh(1e6).is_finite());
}

#[test]
fn test_activation_derivatives() {
    let out = Activation::Sigmoid.apply(&array![0.0_f32]);
    assert_relative_eq!(Activation::Sigmoid.derivative(&out)[0], 0.25);

    let out = Activation::Tanh.apply(&array![0.0_f32]);
    assert_relative_eq!(Activation::Tanh.derivative(&out)[0], 1.0);
}

#[test]
fn test_softmax_sums_to_one() {
    let p = softmax(array![1.0_f32, 2.0, 3.0].view());
    assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-6);
    assert!(p[2] > p[1] && p[1] > p[0]);

    // large logits do not overflow
    let p = softmax(array![1000.0_f32, 1000.0].view());
    assert_relative_eq!(p[0], 0.5, epsilon = 1e-6);
}

#[test]
fn test_softmax_rows_matches_softmax() {
    // more rows than the parallel threshold
    let z = Array2::from_shape_fn((12, 4), |(i, j)| (i as f32 - j as f32) * 0.3);
    let rows = softmax_rows(&z);
    for (i, row) in rows.outer_iter().enumerate() {
        let expected = softmax(z.row(i));
        for (a, b) in row.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    let small = softmax_rows(&z.slice(s![..3, ..]).to_owned());
    for row in small.outer_iter() {
        assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_softmax_rows_sequential_path() {
    // at most the parallel threshold, so every row goes through `softmax`
    let z = array![[0.5_f32, -1.0, 2.0], [1000.0, 1000.0, -1000.0]];
    let rows = softmax_rows(&z);

    assert_eq!(rows.row(0), softmax(z.row(0)));
    assert_relative_eq!(rows[[1, 0]], 0.5, epsilon = 1e-6);
    assert_relative_eq!(rows[[1, 1]], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(rows[[1, 2]], 0.0, epsilon = 1e-6);

    // the rows of a softmax Jacobian sum to zero
    let g = softmax_backward(rows.row(0), array![0.3_f32, -0.7, 1.2].view());
    assert_abs_diff_eq!(g.sum(), 0.0, epsilon = 1e-6);
}

#[test]
fn test_softmax_backward() {
    let p = softmax(array![0.2_f32, -0.4, 1.1].view());

    // a uniform upstream gradient does not change the logits' gradient
    let g = softmax_backward(p.view(), Array1::ones(3).view());
    for v in g.iter() {
        assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-6);
    }

    // d p_0 / d z_0 = p_0 (1 - p_0)
    let g = softmax_backward(p.view(), array![1.0_f32, 0.0, 0.0].view());
    assert_relative_eq!(g[0], p[0] * (1.0 - p[0]), epsilon = 1e-6);
    assert_relative_eq!(g[1], -p[0] * p[1], epsilon = 1e-6);
}
