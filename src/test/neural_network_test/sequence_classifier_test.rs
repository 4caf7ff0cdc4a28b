use super::*;
use crate::dataset::LabelMode;

fn small_config(num_classes: usize) -> ModelConfig {
    ModelConfig {
        input_dim: 3,
        units: 5,
        num_classes,
        head_window: DEFAULT_HEAD_WINDOW,
    }
}

#[test]
fn test_model_config_defaults() {
    let binary = ModelConfig::new(LabelMode::Binary);
    assert_eq!(binary.input_dim, 109);
    assert_eq!(binary.units, 128);
    assert_eq!(binary.num_classes, 2);
    assert_eq!(binary.head_window, 4);

    assert_eq!(ModelConfig::new(LabelMode::MultiClass).num_classes, 5);
}

#[test]
fn test_classifier_parameters() {
    let mut rng = seeded_rng(0);
    let mut model = SequenceClassifier::new(small_config(3), &mut rng).unwrap();

    let ids: Vec<String> = model
        .parameters_mut()
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect();
    assert_eq!(ids.len(), 30);
    assert_eq!(ids[0], "lstm_1.input_gate.kernel");
    assert_eq!(ids[14], "lstm_2.input_gate.kernel");
    assert_eq!(ids[28], "head.weight");
    assert_eq!(ids[29], "head.bias");

    let expected = (4 * (3 * 5 + 5 * 5 + 5) + 2 * 5) + (4 * (5 * 5 + 5 * 5 + 5) + 2 * 5) + (5 * 3 + 3);
    assert_eq!(model.param_count(), expected);
}

#[test]
fn test_classifier_rejects_bad_config() {
    let mut rng = seeded_rng(1);
    assert!(SequenceClassifier::new(small_config(0), &mut rng).is_err());
    let config = ModelConfig {
        units: 0,
        ..small_config(2)
    };
    assert!(SequenceClassifier::new(config, &mut rng).is_err());
}

#[test]
fn test_classifier_predict() {
    let mut rng = seeded_rng(2);
    let model = SequenceClassifier::new(small_config(5), &mut rng).unwrap();
    let x = wave_sequence(8, 3);

    let p = model.predict(x.view()).unwrap();
    assert_eq!(p.len(), 5);
    assert_relative_eq!(p.sum(), 1.0, epsilon = 1e-5);
    assert!(p.iter().all(|v| *v > 0.0));

    // prediction has no side effects
    assert_eq!(model.predict(x.view()).unwrap(), p);
    assert_eq!(model.predict_class(x.view()).unwrap(), argmax(p.view()));

    // short sequences are accepted
    let short = model.predict(wave_sequence(2, 3).view()).unwrap();
    assert_relative_eq!(short.sum(), 1.0, epsilon = 1e-5);
}

#[test]
fn test_classifier_rejects_bad_input() {
    let mut rng = seeded_rng(3);
    let mut model = SequenceClassifier::new(small_config(2), &mut rng).unwrap();
    let mut adam = Adam::default();

    assert!(matches!(
        model.predict(Array2::zeros((0, 3)).view()),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        model.predict(Array2::zeros((4, 7)).view()),
        Err(ModelError::InputValidationError(_))
    ));

    let before = collect_values(model.parameters_mut());
    let result = model.train_step(
        Array2::zeros((4, 3)).view(),
        array![1.0_f32, 0.0, 0.0].view(),
        &mut adam,
    );
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));
    assert_eq!(collect_values(model.parameters_mut()), before);
    assert_eq!(adam.t(), 0);
}

#[test]
fn test_classifier_is_deterministic_for_a_seed() {
    let x = wave_sequence(6, 3);
    let a = SequenceClassifier::new(small_config(2), &mut seeded_rng(21)).unwrap();
    let b = SequenceClassifier::new(small_config(2), &mut seeded_rng(21)).unwrap();
    assert_eq!(a.predict(x.view()).unwrap(), b.predict(x.view()).unwrap());
    assert_eq!(
        a.hidden_states(x.view()).unwrap(),
        b.hidden_states(x.view()).unwrap()
    );
}

#[test]
fn test_classifier_gradient_step_lowers_loss() {
    let mut rng = seeded_rng(4);
    let mut model = SequenceClassifier::new(small_config(3), &mut rng).unwrap();
    let x = wave_sequence(6, 3);
    let y = array![0.0_f32, 0.0, 1.0];
    let loss_fn = CategoricalCrossEntropy::new();

    let loss_before = model.compute_gradients(x.view(), y.view()).unwrap();
    assert_relative_eq!(
        loss_before,
        loss_fn.compute_loss(y.view(), model.predict(x.view()).unwrap().view()),
        epsilon = 1e-6
    );

    for (_, param) in model.parameters_mut() {
        let ParamView { mut value, grad } = param;
        value.scaled_add(-1e-3, &grad);
    }

    let loss_after = loss_fn.compute_loss(y.view(), model.predict(x.view()).unwrap().view());
    assert!(
        loss_after < loss_before,
        "loss went from {} to {}",
        loss_before,
        loss_after
    );
}

#[test]
fn test_classifier_training_reduces_loss_on_one_sample() {
    let mut rng = seeded_rng(5);
    let mut model = SequenceClassifier::new(small_config(2), &mut rng).unwrap();
    let mut adam = Adam::new(0.01, 0.1, 0.01, 1e-8).unwrap();
    let x = wave_sequence(5, 3);
    let y = array![0.0_f32, 1.0];

    let first = model.train_step(x.view(), y.view(), &mut adam).unwrap();
    let mut last = first;
    for _ in 0..50 {
        last = model.train_step(x.view(), y.view(), &mut adam).unwrap();
    }

    assert_eq!(adam.t(), 51);
    assert_eq!(adam.tracked_parameters(), 30);
    assert!(last < first, "loss went from {} to {}", first, last);
}

#[test]
fn test_classifier_zero_input_end_to_end() {
    let mut rng = seeded_rng(6);
    let mut model = SequenceClassifier::new(ModelConfig::new(LabelMode::Binary), &mut rng).unwrap();
    let mut adam = Adam::default();

    let x = Array2::<f32>::zeros((10, 109));
    let y = array![1.0_f32, 0.0];

    // every hidden state is 0, so both classes get probability 0.5
    let p = model.predict(x.view()).unwrap();
    assert_relative_eq!(p[0], 0.5, epsilon = 1e-6);

    let before = collect_values(model.parameters_mut());
    let loss = model.train_step(x.view(), y.view(), &mut adam).unwrap();
    assert!(loss.is_finite());
    assert!(loss >= 0.0);
    assert_relative_eq!(loss, std::f32::consts::LN_2, epsilon = 1e-5);

    let after = collect_values(model.parameters_mut());
    assert_ne!(before, after);
}

#[test]
fn test_argmax() {
    assert_eq!(argmax(array![0.1_f32, 0.7, 0.2].view()), 1);
    // ties resolve to the first index
    assert_eq!(argmax(array![0.5_f32, 0.5].view()), 0);
}
