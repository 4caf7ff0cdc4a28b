use super::*;

fn weighted_sum(hidden: &Array2<f32>, weights: &Array2<f32>) -> f32 {
    (hidden * weights).sum()
}

#[test]
fn test_lstm_forward_shape() {
    let mut rng = seeded_rng(0);
    let layer = LSTM::new("lstm", 4, 6, &mut rng).unwrap();
    let trace = layer.forward(wave_sequence(7, 4).view()).unwrap();

    assert_eq!(trace.hidden_states().dim(), (7, 6));
    assert_eq!(trace.timesteps(), 7);
    assert_eq!(trace.steps().len(), 7);
}

#[test]
fn test_lstm_gate_ranges() {
    let mut rng = seeded_rng(1);
    let layer = LSTM::new("lstm", 5, 8, &mut rng).unwrap();
    let trace = layer.forward(wave_sequence(12, 5).view()).unwrap();

    for step in trace.steps() {
        for v in step.i.iter().chain(step.f.iter()).chain(step.o.iter()) {
            assert!(*v > 0.0 && *v < 1.0);
        }
        for v in step.g.iter().chain(step.c_activated.iter()) {
            assert!(*v > -1.0 && *v < 1.0);
        }
        // h = o * tanh(c)
        for ((h, o), a) in step.h.iter().zip(step.o.iter()).zip(step.c_activated.iter()) {
            assert_relative_eq!(*h, o * a, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_lstm_cell_memory_update() {
    let mut rng = seeded_rng(2);
    let layer = LSTM::new("lstm", 3, 4, &mut rng).unwrap();
    let x = array![0.3_f32, -0.2, 0.9];
    let h_prev = array![0.1_f32, -0.1, 0.2, 0.0];
    let c_prev = array![0.5_f32, -0.5, 1.0, 2.0];

    let step = layer.gates().step(x.view(), h_prev.view(), c_prev.view());
    for u in 0..4 {
        assert_relative_eq!(
            step.c[u],
            step.g[u] * step.i[u] + c_prev[u] * step.f[u],
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_lstm_zero_input_keeps_zero_state() {
    // zero biases and zero initial states: i = f = o = 0.5, g = 0, so c and h stay 0
    let mut rng = seeded_rng(3);
    let layer = LSTM::new("lstm", 3, 5, &mut rng).unwrap();
    let trace = layer.forward(Array2::zeros((6, 3)).view()).unwrap();

    for v in trace.hidden_states().iter() {
        assert_abs_diff_eq!(*v, 0.0);
    }
    for step in trace.steps() {
        assert_relative_eq!(step.f[0], 0.5);
    }
}

#[test]
fn test_lstm_is_deterministic_for_a_seed() {
    let x = wave_sequence(5, 4);
    let a = LSTM::new("lstm", 4, 6, &mut seeded_rng(11)).unwrap();
    let b = LSTM::new("lstm", 4, 6, &mut seeded_rng(11)).unwrap();
    assert_eq!(
        a.forward(x.view()).unwrap().hidden_states(),
        b.forward(x.view()).unwrap().hidden_states()
    );
}

#[test]
fn test_lstm_rejects_bad_input() {
    let mut rng = seeded_rng(4);
    assert!(LSTM::new("lstm", 0, 4, &mut rng).is_err());
    assert!(LSTM::new("lstm", 4, 0, &mut rng).is_err());

    let layer = LSTM::new("lstm", 4, 3, &mut rng).unwrap();
    assert!(matches!(
        layer.forward(Array2::zeros((0, 4)).view()),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        layer.forward(Array2::zeros((5, 3)).view()),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_lstm_backward_rejects_mismatched_gradient() {
    let mut rng = seeded_rng(5);
    let mut layer = LSTM::new("lstm", 2, 3, &mut rng).unwrap();
    let trace = layer.forward(Array2::ones((4, 2)).view()).unwrap();
    assert!(layer.backward(&trace, Array2::zeros((3, 3)).view()).is_err());
}

#[test]
fn test_lstm_parameters() {
    let mut rng = seeded_rng(6);
    let mut layer = LSTM::new("lstm_1", 4, 3, &mut rng).unwrap();
    assert_eq!(layer.param_count(), 4 * (4 * 3 + 3 * 3 + 3) + 2 * 3);

    let (h0, c0) = layer.initial_state();
    assert!(h0.iter().chain(c0.iter()).all(|v| *v == 0.0));

    let ids: Vec<String> = layer
        .parameters_mut()
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect();
    assert_eq!(ids.len(), 14);
    assert_eq!(ids[0], "lstm_1.input_gate.kernel");
    assert_eq!(ids[4], "lstm_1.forget_gate.recurrent_kernel");
    assert_eq!(ids[8], "lstm_1.cell_gate.bias");
    assert_eq!(ids[12], "lstm_1.h0");
    assert_eq!(ids[13], "lstm_1.c0");
}

#[test]
fn test_lstm_backward_matches_finite_differences() {
    let mut rng = seeded_rng(7);
    let mut layer = LSTM::new("lstm", 3, 4, &mut rng).unwrap();
    let x = wave_sequence(5, 3);
    let weights = Array2::from_shape_fn((5, 4), |(t, u)| ((t * 4 + u) as f32 * 0.91).cos());

    // move the initial states away from 0 so every path carries gradient
    nudge(layer.parameters_mut(), 12, 1, 0.3);
    nudge(layer.parameters_mut(), 13, 2, -0.4);

    let trace = layer.forward(x.view()).unwrap();
    let grad_x = layer.backward(&trace, weights.view()).unwrap();
    let analytic = collect_grads(layer.parameters_mut());

    let eps = 1e-2_f32;
    for (k, (id, grads)) in analytic.iter().enumerate() {
        for j in [0, grads.len() / 2, grads.len() - 1] {
            nudge(layer.parameters_mut(), k, j, eps);
            let plus = weighted_sum(layer.forward(x.view()).unwrap().hidden_states(), &weights);
            nudge(layer.parameters_mut(), k, j, -2.0 * eps);
            let minus = weighted_sum(layer.forward(x.view()).unwrap().hidden_states(), &weights);
            nudge(layer.parameters_mut(), k, j, eps);

            let numeric = (plus - minus) / (2.0 * eps);
            assert!(
                (grads[j] - numeric).abs() < 5e-3,
                "{} [{}]: analytic {} vs numeric {}",
                id,
                j,
                grads[j],
                numeric
            );
        }
    }

    for (t, d) in [(0, 0), (2, 1), (4, 2)] {
        let mut x_plus = x.clone();
        x_plus[[t, d]] += eps;
        let mut x_minus = x.clone();
        x_minus[[t, d]] -= eps;
        let plus = weighted_sum(layer.forward(x_plus.view()).unwrap().hidden_states(), &weights);
        let minus = weighted_sum(layer.forward(x_minus.view()).unwrap().hidden_states(), &weights);
        let numeric = (plus - minus) / (2.0 * eps);
        assert_abs_diff_eq!(grad_x[[t, d]], numeric, epsilon = 5e-3);
    }
}
