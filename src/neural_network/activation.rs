use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Inputs are clamped to this magnitude before `exp`/`tanh` to keep results finite
const ACTIVATION_CLIP: f32 = 500.0;

/// Threshold (number of rows) above which the row-wise softmax runs in parallel
const SOFTMAX_PARALLEL_THRESHOLD: usize = 8;

/// Elementwise activation functions used by the recurrent cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Tanh,
    Sigmoid,
}

impl Activation {
    /// Applies an activation elementwise
    ///
    /// # Parameters
    ///
    /// - `z` - Pre-activation values
    ///
    /// # Returns
    ///
    /// * `Array1<f32>` - Activated values with the same length as `z`
    pub fn apply(&self, z: &Array1<f32>) -> Array1<f32> {
        match self {
            Activation::Sigmoid => z.mapv(sigmoid),
            Activation::Tanh => z.mapv(tanh),
        }
    }

    /// Derivative of the activation expressed through its output
    ///
    /// # Parameters
    ///
    /// - `activation_output` - The value returned by [`Activation::apply`]
    ///
    /// # Returns
    ///
    /// * `Array1<f32>` - Elementwise derivative
    pub fn derivative(&self, activation_output: &Array1<f32>) -> Array1<f32> {
        match self {
            Activation::Sigmoid => activation_output.mapv(|a| a * (1.0 - a)),
            Activation::Tanh => activation_output.mapv(|a| 1.0 - a * a),
        }
    }
}

/// Logistic sigmoid with clamped input
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    let clipped_x = x.clamp(-ACTIVATION_CLIP, ACTIVATION_CLIP);
    1.0 / (1.0 + (-clipped_x).exp())
}

/// Hyperbolic tangent with clamped input
#[inline]
pub fn tanh(x: f32) -> f32 {
    x.clamp(-ACTIVATION_CLIP, ACTIVATION_CLIP).tanh()
}

/// Numerically stable softmax of one vector
pub fn softmax(z: ArrayView1<f32>) -> Array1<f32> {
    let max_val = z.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut out = z.mapv(|x| (x - max_val).exp());
    let sum = out.sum();
    out.mapv_inplace(|x| x / sum);
    out
}

/// Applies softmax independently to every row of a matrix
///
/// # Parameters
///
/// - `z` - Logits with shape (rows, classes)
///
/// # Returns
///
/// * `Array2<f32>` - Row-normalized probabilities with the same shape
pub fn softmax_rows(z: &Array2<f32>) -> Array2<f32> {
    use rayon::prelude::*;

    let mut out = z.clone();
    if out.nrows() > SOFTMAX_PARALLEL_THRESHOLD {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut row| {
                let max_val = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                row.mapv_inplace(|x| (x - max_val).exp());
                let sum = row.sum();
                row.mapv_inplace(|x| x / sum);
            });
    } else {
        for (mut row, logits) in out.outer_iter_mut().zip(z.outer_iter()) {
            row.assign(&softmax(logits));
        }
    }
    out
}

/// Backpropagates through a softmax given its output
///
/// Computes `p * (g - <g, p>)`, the product of the softmax Jacobian with `grad_output`.
///
/// # Parameters
///
/// - `probs` - Softmax output
/// - `grad_output` - Gradient of the loss with respect to `probs`
///
/// # Returns
///
/// * `Array1<f32>` - Gradient with respect to the logits
pub fn softmax_backward(probs: ArrayView1<f32>, grad_output: ArrayView1<f32>) -> Array1<f32> {
    let dot = probs.dot(&grad_output);
    &probs * &grad_output.mapv(|g| g - dot)
}
