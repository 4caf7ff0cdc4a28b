use crate::neural_network::{ParamId, ParamView};
use ndarray::{Array1, ArrayView1};

/// Defines the interface for models whose parameters can be updated by an [`Optimizer`].
///
/// Implementors expose every trainable tensor together with the gradient computed by
/// their most recent backward pass. The optimizer identifies parameters through their
/// [`ParamId`], so ids must be stable for the lifetime of the model.
pub trait Trainable {
    /// Returns mutable views of all trainable parameters and their gradients.
    ///
    /// # Returns
    ///
    /// * `Vec<(ParamId, ParamView<'_>)>` - One entry per parameter tensor, in a fixed order
    fn parameters_mut(&mut self) -> Vec<(ParamId, ParamView<'_>)>;

    /// Returns the total number of trainable scalar parameters.
    ///
    /// # Returns
    ///
    /// The count of parameters as an usize
    fn param_count(&self) -> usize;
}

/// Defines the interface for optimization algorithms.
pub trait Optimizer {
    /// Applies one update step to all parameters of a model.
    ///
    /// Gradients must already be stored in the model; every parameter is updated from
    /// its own pre-update value and gradient.
    ///
    /// # Parameters
    ///
    /// * `model` - The model whose parameters will be updated
    fn update(&mut self, model: &mut dyn Trainable);
}

/// Defines the interface for loss functions used to train the classifier.
pub trait LossFunction {
    /// Computes the loss between a one-hot target and a predicted probability vector.
    ///
    /// # Parameters
    ///
    /// - `y_true` - One-hot target vector
    /// - `y_pred` - Predicted probabilities
    ///
    /// # Returns
    ///
    /// * `f32` - The scalar loss
    fn compute_loss(&self, y_true: ArrayView1<f32>, y_pred: ArrayView1<f32>) -> f32;

    /// Computes the gradient of the loss with respect to the predictions.
    ///
    /// # Parameters
    ///
    /// - `y_true` - One-hot target vector
    /// - `y_pred` - Predicted probabilities
    ///
    /// # Returns
    ///
    /// * `Array1<f32>` - Gradient with the same length as `y_pred`
    fn compute_grad(&self, y_true: ArrayView1<f32>, y_pred: ArrayView1<f32>) -> Array1<f32>;
}
