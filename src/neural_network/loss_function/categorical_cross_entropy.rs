use crate::neural_network::LossFunction;
use ndarray::{Array1, ArrayView1};

/// Predictions are clipped into `[PROB_CLIP, 1 - PROB_CLIP]` before taking logs
const PROB_CLIP: f32 = 1e-7;

/// Categorical Cross Entropy loss function for multi-class classification
///
/// Computes `-Σ y_true * ln(y_pred)` for a one-hot target. The classifier trains on one
/// sample per step, so the mean over samples is the loss itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalCrossEntropy;

impl CategoricalCrossEntropy {
    /// Creates a new instance of CategoricalCrossEntropy
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for CategoricalCrossEntropy {
    fn compute_loss(&self, y_true: ArrayView1<f32>, y_pred: ArrayView1<f32>) -> f32 {
        // Ensure predictions are in a numerically stable range to avoid log(0) issues
        let y_pred_clipped = y_pred.mapv(|x| x.clamp(PROB_CLIP, 1.0 - PROB_CLIP));

        -(&y_true * &y_pred_clipped.mapv(f32::ln)).sum()
    }

    fn compute_grad(&self, y_true: ArrayView1<f32>, y_pred: ArrayView1<f32>) -> Array1<f32> {
        let y_pred_clipped = y_pred.mapv(|x| x.clamp(PROB_CLIP, 1.0 - PROB_CLIP));

        // d/dp of -Σ y ln p
        -(&y_true / &y_pred_clipped)
    }
}
