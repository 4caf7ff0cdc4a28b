use ndarray::{Array, ArrayViewMutD, Dimension};
use std::fmt;

/// Stable identity of a trainable tensor, e.g. `lstm_1.forget_gate.recurrent_kernel`.
///
/// Optimizers key their per-parameter state on this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(String);

impl ParamId {
    /// Builds an id by joining the given path segments with `.`
    pub fn new(segments: &[&str]) -> Self {
        Self(segments.join("."))
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trainable tensor together with the gradient from the latest backward pass.
///
/// The gradient always has the same shape as the value and starts at zero.
#[derive(Debug, Clone)]
pub struct Parameter<D: Dimension> {
    pub value: Array<f32, D>,
    pub grad: Array<f32, D>,
}

impl<D: Dimension> Parameter<D> {
    /// Wraps an initial value, allocating a zero gradient of the same shape
    pub fn new(value: Array<f32, D>) -> Self {
        let grad = Array::zeros(value.raw_dim());
        Self { value, grad }
    }

    /// Replaces the stored gradient
    ///
    /// # Panics
    ///
    /// - If `grad` does not have the shape of the value
    pub fn set_grad(&mut self, grad: Array<f32, D>) {
        assert_eq!(
            grad.shape(),
            self.value.shape(),
            "gradient shape must match parameter shape"
        );
        self.grad = grad;
    }

    /// Number of scalar entries
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Borrows the value and the gradient as dynamic-dimensional views
    pub fn view_mut(&mut self) -> ParamView<'_> {
        ParamView {
            value: self.value.view_mut().into_dyn(),
            grad: self.grad.view_mut().into_dyn(),
        }
    }
}

/// Mutable view of one parameter handed to an optimizer.
///
/// # Fields
///
/// - `value` - The parameter tensor, updated in place
/// - `grad` - Gradient of the loss with respect to `value`
pub struct ParamView<'a> {
    pub value: ArrayViewMutD<'a, f32>,
    pub grad: ArrayViewMutD<'a, f32>,
}
