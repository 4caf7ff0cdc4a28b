use crate::ModelError;
use crate::neural_network::activation::{softmax_backward, softmax_rows};
use crate::neural_network::initializer::truncated_orthogonal;
use crate::neural_network::{ParamId, ParamView, Parameter};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Ix1, Ix2, s};
use rand::Rng;

/// Default number of trailing timesteps whose predictions are averaged
pub const DEFAULT_HEAD_WINDOW: usize = 4;

/// Softmax classifier over a hidden-state sequence.
///
/// Every timestep is projected to class logits with one shared weight matrix and bias
/// and normalized with a softmax. The final prediction is the mean of the softmax outputs
/// of the last `window` timesteps, or of all of them when the sequence is shorter.
///
/// # Fields
///
/// - `units` - Hidden size of the incoming sequence
/// - `num_classes` - Number of output classes
/// - `window` - Number of trailing timesteps averaged into the prediction
/// - `weight` - Projection matrix with shape (units, num_classes)
/// - `bias` - Bias vector with shape (num_classes)
#[derive(Debug, Clone)]
pub struct ClassificationHead {
    units: usize,
    num_classes: usize,
    window: usize,
    weight: Parameter<Ix2>,
    bias: Parameter<Ix1>,
}

/// Result of [`ClassificationHead::forward`]
///
/// # Fields
///
/// - `probabilities` - Per-timestep softmax outputs with shape (timesteps, num_classes)
/// - `prediction` - Average of the softmax outputs inside the window
/// - `window_start` - First timestep included in the average
#[derive(Debug, Clone)]
pub struct HeadOutput {
    pub probabilities: Array2<f32>,
    pub prediction: Array1<f32>,
    pub window_start: usize,
}

impl ClassificationHead {
    /// Creates a new head.
    ///
    /// The weight is the first `num_classes` columns of a `units x units` orthogonal
    /// matrix, so the initial class directions are mutually orthogonal. The bias starts at 0.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If any of `units`, `num_classes` or `window` is 0
    pub fn new<R: Rng + ?Sized>(
        units: usize,
        num_classes: usize,
        window: usize,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        if window == 0 {
            return Err(ModelError::InputValidationError(
                "head window must be greater than 0".to_string(),
            ));
        }
        let weight = truncated_orthogonal(units, num_classes, rng)?;

        Ok(Self {
            units,
            num_classes,
            window,
            weight: Parameter::new(weight),
            bias: Parameter::new(Array1::zeros(num_classes)),
        })
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn weight(&self) -> &Array2<f32> {
        &self.weight.value
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias.value
    }

    /// Projects, normalizes and averages the trailing timesteps.
    ///
    /// # Parameters
    ///
    /// - `hidden` - Hidden states with shape (timesteps, units)
    ///
    /// # Returns
    ///
    /// - `Result<HeadOutput, ModelError>` - Per-timestep probabilities and the averaged prediction
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `hidden` is empty or its width is not `units`
    pub fn forward(&self, hidden: ArrayView2<f32>) -> Result<HeadOutput, ModelError> {
        if hidden.nrows() == 0 || hidden.ncols() != self.units {
            return Err(ModelError::InputValidationError(format!(
                "classification head expects (timesteps > 0, {}), got {:?}",
                self.units,
                hidden.dim()
            )));
        }

        let logits = hidden.dot(&self.weight.value) + &self.bias.value;
        let probabilities = softmax_rows(&logits);

        let timesteps = hidden.nrows();
        let window_start = timesteps - self.window.min(timesteps);
        let prediction = probabilities
            .slice(s![window_start.., ..])
            .mean_axis(Axis(0))
            .ok_or_else(|| {
                ModelError::ProcessingError("Failed to average head window".to_string())
            })?;

        Ok(HeadOutput {
            probabilities,
            prediction,
            window_start,
        })
    }

    /// Backpropagates from the averaged prediction.
    ///
    /// Stores the weight and bias gradients and returns the gradient with respect to every
    /// hidden state. Timesteps before the window receive zeros.
    ///
    /// # Parameters
    ///
    /// - `hidden` - The hidden states passed to [`ClassificationHead::forward`]
    /// - `output` - The value returned by that call
    /// - `grad_prediction` - Gradient of the loss with respect to `output.prediction`
    ///
    /// # Returns
    ///
    /// - `Result<Array2<f32>, ModelError>` - Gradient with shape (timesteps, units)
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the shapes disagree with the forward pass
    pub fn backward(
        &mut self,
        hidden: ArrayView2<f32>,
        output: &HeadOutput,
        grad_prediction: ArrayView1<f32>,
    ) -> Result<Array2<f32>, ModelError> {
        let timesteps = hidden.nrows();
        if output.probabilities.nrows() != timesteps || grad_prediction.len() != self.num_classes
        {
            return Err(ModelError::InputValidationError(
                "head backward called with mismatched forward output".to_string(),
            ));
        }

        let averaged = (timesteps - output.window_start) as f32;
        let grad_probs = grad_prediction.mapv(|g| g / averaged);

        let mut grad_weight = Array2::<f32>::zeros((self.units, self.num_classes));
        let mut grad_bias = Array1::<f32>::zeros(self.num_classes);
        let mut grad_hidden = Array2::<f32>::zeros((timesteps, self.units));

        for t in output.window_start..timesteps {
            let grad_logits = softmax_backward(output.probabilities.row(t), grad_probs.view());
            let grad_row = grad_logits.view().insert_axis(Axis(0));
            grad_weight += &hidden.row(t).insert_axis(Axis(1)).dot(&grad_row);
            grad_bias += &grad_logits;
            grad_hidden
                .row_mut(t)
                .assign(&grad_logits.dot(&self.weight.value.t()));
        }

        self.weight.set_grad(grad_weight);
        self.bias.set_grad(grad_bias);

        Ok(grad_hidden)
    }

    /// Mutable views of the projection weight and bias
    pub fn parameters_mut(&mut self, scope: &str) -> Vec<(ParamId, ParamView<'_>)> {
        vec![
            (ParamId::new(&[scope, "weight"]), self.weight.view_mut()),
            (ParamId::new(&[scope, "bias"]), self.bias.view_mut()),
        ]
    }

    pub fn param_count(&self) -> usize {
        self.weight.len() + self.bias.len()
    }
}
