/// Error types shared by every module of the crate
pub mod error;

/// Traits at the seams between the model, its loss and its optimizer
pub mod traits;

/// Activity recognition dataset: `.npy` loading, label modes and class-balanced sampling.
///
/// # Examples
/// ```rust
/// use har_lstm::dataset::{ActivityDataset, ClassBuckets};
/// use ndarray::{Array2, Array3};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// // 3 samples of class 0, 1 sample of class 1
/// let mut labels = Array2::<f32>::zeros((4, 2));
/// for i in 0..3 {
///     labels[[i, 0]] = 1.0;
/// }
/// labels[[3, 1]] = 1.0;
/// let dataset = ActivityDataset::new(Array3::zeros((4, 6, 3)), labels).unwrap();
///
/// let buckets = ClassBuckets::from_dataset(&dataset).unwrap();
/// assert_eq!(buckets.class_counts(), vec![3, 1]);
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let index = buckets.sample(&mut rng);
/// assert!(index < 4);
/// ```
pub mod dataset;

/// Components of the two-layer LSTM activity classifier.
///
/// # Core Components
///
/// ## Layers
/// - **LSTM**: Recurrent layer with learned initial hidden and memory states
/// - **ClassificationHead**: Softmax projection averaged over the last timesteps
///
/// ## Optimization
/// - **Adam**: Adaptive moment estimation with one shared step counter
///
/// ## Loss
/// - **CategoricalCrossEntropy**: For one-hot multi-class targets
///
/// ## Model
/// - **SequenceClassifier**: Two stacked LSTM layers followed by the head
///
/// # Examples
/// ```rust
/// use har_lstm::dataset::LabelMode;
/// use har_lstm::neural_network::*;
/// use ndarray::{Array2, array};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let config = ModelConfig { input_dim: 4, units: 6, ..ModelConfig::new(LabelMode::MultiClass) };
/// let mut model = SequenceClassifier::new(config, &mut rng).unwrap();
/// let mut optimizer = Adam::default();
///
/// let x = Array2::<f32>::ones((8, 4));
/// let y = array![0.0_f32, 0.0, 1.0, 0.0, 0.0];
/// model.train_step(x.view(), y.view(), &mut optimizer).unwrap();
///
/// let probabilities = model.predict(x.view()).unwrap();
/// assert!((probabilities.sum() - 1.0).abs() < 1e-5);
/// ```
pub mod neural_network;

/// Convenience re-exports of the whole public API
pub mod prelude;

/// Single-sample training loop and held-out evaluation
pub mod training;

/// Dataset preprocessing helpers
pub mod utility;

pub use error::{IoError, ModelError};
