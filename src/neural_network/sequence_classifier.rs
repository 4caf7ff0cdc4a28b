use crate::ModelError;
use crate::dataset::LabelMode;
use crate::neural_network::{
    CategoricalCrossEntropy, ClassificationHead, DEFAULT_HEAD_WINDOW, HeadOutput, LSTM,
    LSTMTrace, LossFunction, Optimizer, ParamId, ParamView, Trainable,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

/// Default number of features per timestep
pub const DEFAULT_INPUT_DIM: usize = 109;
/// Default hidden size of both recurrent layers
pub const DEFAULT_UNITS: usize = 128;

/// Architecture of a [`SequenceClassifier`]
///
/// # Fields
///
/// - `input_dim` - Features per timestep
/// - `units` - Hidden size of both LSTM layers
/// - `num_classes` - Number of output classes
/// - `head_window` - Trailing timesteps averaged by the classification head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    pub input_dim: usize,
    pub units: usize,
    pub num_classes: usize,
    pub head_window: usize,
}

impl ModelConfig {
    /// Default architecture for the given label mode
    pub fn new(mode: LabelMode) -> Self {
        Self {
            input_dim: DEFAULT_INPUT_DIM,
            units: DEFAULT_UNITS,
            num_classes: mode.num_classes(),
            head_window: DEFAULT_HEAD_WINDOW,
        }
    }
}

/// Two stacked LSTM layers followed by a window-averaging softmax head.
///
/// Layer 1 reads the raw `(timesteps, input_dim)` sequence, layer 2 reads layer 1's
/// hidden states, and the head turns layer 2's hidden states into one probability
/// vector. Gradients of all 30 parameter tensors are derived by hand.
///
/// # Example
/// ```rust
/// use har_lstm::dataset::LabelMode;
/// use har_lstm::neural_network::{Adam, ModelConfig, SequenceClassifier};
/// use ndarray::{Array2, array};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let config = ModelConfig { input_dim: 6, units: 8, ..ModelConfig::new(LabelMode::Binary) };
/// let mut model = SequenceClassifier::new(config, &mut rng).unwrap();
/// let mut adam = Adam::default();
///
/// let x = Array2::<f32>::zeros((10, 6));
/// let loss = model.train_step(x.view(), array![1.0_f32, 0.0].view(), &mut adam).unwrap();
/// assert!(loss.is_finite() && loss >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceClassifier {
    config: ModelConfig,
    lstm_1: LSTM,
    lstm_2: LSTM,
    head: ClassificationHead,
    loss: CategoricalCrossEntropy,
}

/// Intermediate values of one forward pass, kept for the backward pass
struct ForwardPass {
    trace_1: LSTMTrace,
    trace_2: LSTMTrace,
    head: HeadOutput,
}

impl SequenceClassifier {
    /// Creates a classifier with freshly initialized parameters
    ///
    /// # Parameters
    ///
    /// - `config` - Architecture
    /// - `rng` - Random number generator for the orthogonal initializers
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If any dimension in `config` is 0
    pub fn new<R: Rng + ?Sized>(config: ModelConfig, rng: &mut R) -> Result<Self, ModelError> {
        if config.num_classes == 0 {
            return Err(ModelError::InputValidationError(
                "num_classes must be greater than 0".to_string(),
            ));
        }

        let lstm_1 = LSTM::new("lstm_1", config.input_dim, config.units, rng)?;
        let lstm_2 = LSTM::new("lstm_2", config.units, config.units, rng)?;
        let head =
            ClassificationHead::new(config.units, config.num_classes, config.head_window, rng)?;

        Ok(Self {
            config,
            lstm_1,
            lstm_2,
            head,
            loss: CategoricalCrossEntropy::new(),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn lstm_1(&self) -> &LSTM {
        &self.lstm_1
    }

    pub fn lstm_2(&self) -> &LSTM {
        &self.lstm_2
    }

    pub fn head(&self) -> &ClassificationHead {
        &self.head
    }

    fn forward(&self, x: ArrayView2<f32>) -> Result<ForwardPass, ModelError> {
        let trace_1 = self.lstm_1.forward(x)?;
        let trace_2 = self.lstm_2.forward(trace_1.hidden_states().view())?;
        let head = self.head.forward(trace_2.hidden_states().view())?;
        Ok(ForwardPass {
            trace_1,
            trace_2,
            head,
        })
    }

    /// Hidden states of the second layer for every timestep, shape (timesteps, units)
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `x` is empty or has the wrong feature count
    pub fn hidden_states(&self, x: ArrayView2<f32>) -> Result<Array2<f32>, ModelError> {
        let trace_1 = self.lstm_1.forward(x)?;
        let trace_2 = self.lstm_2.forward(trace_1.hidden_states().view())?;
        Ok(trace_2.hidden_states().clone())
    }

    /// Predicts class probabilities for one sequence.
    ///
    /// Runs the forward pass only; parameters and gradients are untouched.
    ///
    /// # Parameters
    ///
    /// - `x` - Sequence with shape (timesteps, input_dim)
    ///
    /// # Returns
    ///
    /// - `Result<Array1<f32>, ModelError>` - Probabilities of length `num_classes`, summing to 1
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `x` is empty or has the wrong feature count
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array1<f32>, ModelError> {
        Ok(self.forward(x)?.head.prediction)
    }

    /// Predicts the most probable class index for one sequence
    pub fn predict_class(&self, x: ArrayView2<f32>) -> Result<usize, ModelError> {
        Ok(argmax(self.predict(x)?.view()))
    }

    /// Runs forward, loss and backward passes and stores every parameter's gradient.
    ///
    /// # Parameters
    ///
    /// - `x` - Sequence with shape (timesteps, input_dim)
    /// - `y` - One-hot target of length `num_classes`
    ///
    /// # Returns
    ///
    /// - `Result<f32, ModelError>` - The cross-entropy loss of this sample
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `x` or `y` have the wrong shape
    pub fn compute_gradients(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView1<f32>,
    ) -> Result<f32, ModelError> {
        if y.len() != self.config.num_classes {
            return Err(ModelError::InputValidationError(format!(
                "expected a label with {} classes, got {}",
                self.config.num_classes,
                y.len()
            )));
        }

        let pass = self.forward(x)?;
        let loss = self.loss.compute_loss(y, pass.head.prediction.view());
        let grad_prediction = self.loss.compute_grad(y, pass.head.prediction.view());

        let grad_hidden_2 = self.head.backward(
            pass.trace_2.hidden_states().view(),
            &pass.head,
            grad_prediction.view(),
        )?;
        let grad_hidden_1 = self.lstm_2.backward(&pass.trace_2, grad_hidden_2.view())?;
        self.lstm_1.backward(&pass.trace_1, grad_hidden_1.view())?;

        Ok(loss)
    }

    /// Trains on a single sample: computes gradients, then lets `optimizer` update every
    /// parameter.
    ///
    /// # Returns
    ///
    /// - `Result<f32, ModelError>` - The loss measured before the update
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `x` or `y` have the wrong shape; parameters are left unchanged
    pub fn train_step(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView1<f32>,
        optimizer: &mut dyn Optimizer,
    ) -> Result<f32, ModelError> {
        let loss = self.compute_gradients(x, y)?;
        optimizer.update(self);
        Ok(loss)
    }
}

impl Trainable for SequenceClassifier {
    fn parameters_mut(&mut self) -> Vec<(ParamId, ParamView<'_>)> {
        let mut params = self.lstm_1.parameters_mut();
        params.extend(self.lstm_2.parameters_mut());
        params.extend(self.head.parameters_mut("head"));
        params
    }

    fn param_count(&self) -> usize {
        self.lstm_1.param_count() + self.lstm_2.param_count() + self.head.param_count()
    }
}

/// Index of the largest entry; ties resolve to the first
pub fn argmax(values: ArrayView1<f32>) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best_i, best_v), (i, &v)| {
            if v > best_v { (i, v) } else { (best_i, best_v) }
        })
        .0
}
