use super::*;

/// Gate parameters for the recurrent cell.
///
/// # Fields
///
/// - `kernel` - Weight matrix for input connections with shape (input_dim, units)
/// - `recurrent_kernel` - Weight matrix for recurrent connections with shape (units, units)
/// - `bias` - Bias vector with shape (units)
#[derive(Debug, Clone)]
pub struct Gate {
    pub kernel: Parameter<Ix2>,
    pub recurrent_kernel: Parameter<Ix2>,
    pub bias: Parameter<Ix1>,
}

impl Gate {
    /// Creates a gate with orthogonally initialized weights and a zero bias.
    ///
    /// The input kernel is the first `input_dim` rows of a `units x units` orthogonal
    /// matrix when `input_dim < units`; the recurrent kernel is a full orthogonal matrix.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Dimensionality of the input features
    /// - `units` - Number of units (neurons) in this gate
    /// - `rng` - Random number generator for the orthogonal draws
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - A new gate instance with initialized parameters
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `units` is 0
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        units: usize,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, units)?;

        let kernel = truncated_orthogonal(input_dim, units, rng)?;
        let recurrent_kernel = orthogonal_matrix(units, rng)?;

        Ok(Self {
            kernel: Parameter::new(kernel),
            recurrent_kernel: Parameter::new(recurrent_kernel),
            bias: Parameter::new(Array1::zeros(units)),
        })
    }

    /// Computes the gate pre-activation: `x_t @ kernel + h_prev @ recurrent_kernel + bias`
    ///
    /// # Parameters
    ///
    /// - `x_t` - Input at the current timestep with shape (input_dim)
    /// - `h_prev` - Previous hidden state with shape (units)
    ///
    /// # Returns
    ///
    /// - `Array1<f32>` - Pre-activation gate values with shape (units)
    #[inline]
    pub fn pre_activation(&self, x_t: ArrayView1<f32>, h_prev: ArrayView1<f32>) -> Array1<f32> {
        x_t.dot(&self.kernel.value) + h_prev.dot(&self.recurrent_kernel.value) + &self.bias.value
    }

    /// Stores the gradients accumulated over one backward pass
    pub fn store_gradients(&mut self, grads: GateGradients) {
        self.kernel.set_grad(grads.kernel);
        self.recurrent_kernel.set_grad(grads.recurrent_kernel);
        self.bias.set_grad(grads.bias);
    }

    /// Mutable views of the three gate tensors, named below `scope`
    pub fn parameters_mut(&mut self, scope: &str) -> Vec<(ParamId, ParamView<'_>)> {
        vec![
            (ParamId::new(&[scope, "kernel"]), self.kernel.view_mut()),
            (
                ParamId::new(&[scope, "recurrent_kernel"]),
                self.recurrent_kernel.view_mut(),
            ),
            (ParamId::new(&[scope, "bias"]), self.bias.view_mut()),
        ]
    }

    pub fn param_count(&self) -> usize {
        self.kernel.len() + self.recurrent_kernel.len() + self.bias.len()
    }
}

/// Gradient accumulators for one gate over a whole sequence
#[derive(Debug, Clone)]
pub struct GateGradients {
    pub kernel: Array2<f32>,
    pub recurrent_kernel: Array2<f32>,
    pub bias: Array1<f32>,
}

impl GateGradients {
    pub fn zeros(input_dim: usize, units: usize) -> Self {
        Self {
            kernel: Array2::zeros((input_dim, units)),
            recurrent_kernel: Array2::zeros((units, units)),
            bias: Array1::zeros(units),
        }
    }

    /// Adds the contribution of one timestep given the gate's pre-activation gradient
    ///
    /// # Parameters
    ///
    /// - `x_t` - Input at this timestep
    /// - `h_prev` - Hidden state fed into this timestep
    /// - `grad_raw` - Gradient with respect to the gate pre-activation
    #[inline]
    pub fn accumulate(
        &mut self,
        x_t: ArrayView1<f32>,
        h_prev: ArrayView1<f32>,
        grad_raw: &Array1<f32>,
    ) {
        let grad_row = grad_raw.view().insert_axis(Axis(0));
        self.kernel += &x_t.insert_axis(Axis(1)).dot(&grad_row);
        self.recurrent_kernel += &h_prev.insert_axis(Axis(1)).dot(&grad_row);
        self.bias += grad_raw;
    }
}
