use super::*;

/// Threshold on the number of units above which the four gate pre-activations of one
/// timestep are computed in parallel.
///
/// Below this size rayon's scheduling overhead outweighs the matrix-vector products.
const LSTM_PARALLEL_THRESHOLD: usize = 1024;

/// The four gates of an LSTM cell.
///
/// Calling [`LSTMGates::step`] is the cell's transition function. It holds no state
/// between calls.
#[derive(Debug, Clone)]
pub struct LSTMGates {
    pub input: Gate,
    pub forget: Gate,
    pub cell: Gate,
    pub output: Gate,
}

/// Everything one cell transition produces.
///
/// `c` and `h` are the new memory and hidden states; the gate activations are kept
/// for backpropagation through time.
///
/// # Fields
///
/// - `i` - Input gate activation, in (0, 1)
/// - `f` - Forget gate activation, in (0, 1)
/// - `g` - Candidate memory, in (-1, 1)
/// - `o` - Output gate activation, in (0, 1)
/// - `c` - New memory state
/// - `c_activated` - `tanh(c)`
/// - `h` - New hidden state, `o * tanh(c)`
#[derive(Debug, Clone)]
pub struct CellStep {
    pub i: Array1<f32>,
    pub f: Array1<f32>,
    pub g: Array1<f32>,
    pub o: Array1<f32>,
    pub c: Array1<f32>,
    pub c_activated: Array1<f32>,
    pub h: Array1<f32>,
}

impl LSTMGates {
    /// Creates the four gates with orthogonal kernels and zero biases
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `units` is 0
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        units: usize,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            input: Gate::new(input_dim, units, rng)?,
            forget: Gate::new(input_dim, units, rng)?,
            cell: Gate::new(input_dim, units, rng)?,
            output: Gate::new(input_dim, units, rng)?,
        })
    }

    /// Runs one cell transition.
    ///
    /// For input `x`, hidden `h` and memory `c`:
    /// 1. i = σ(x·Wi + h·Ui + bi)
    /// 2. g = tanh(x·Wc + h·Uc + bc)
    /// 3. f = σ(x·Wf + h·Uf + bf)
    /// 4. c' = g ⊙ i + c ⊙ f
    /// 5. o = σ(x·Wo + h·Uo + bo)
    /// 6. h' = o ⊙ tanh(c')
    ///
    /// # Parameters
    ///
    /// - `x_t` - Input vector with shape (input_dim)
    /// - `h_prev` - Previous hidden state with shape (units)
    /// - `c_prev` - Previous memory state with shape (units)
    ///
    /// # Returns
    ///
    /// * `CellStep` - The new states and the gate activations
    ///
    /// # Panics
    ///
    /// - If the vector lengths do not match the gate shapes
    pub fn step(
        &self,
        x_t: ArrayView1<f32>,
        h_prev: ArrayView1<f32>,
        c_prev: ArrayView1<f32>,
    ) -> CellStep {
        let use_parallel = self.input.bias.len() >= LSTM_PARALLEL_THRESHOLD;

        let (i_raw, f_raw, g_raw, o_raw) = if use_parallel {
            let ((i_raw, f_raw), (g_raw, o_raw)) = rayon::join(
                || {
                    rayon::join(
                        || self.input.pre_activation(x_t, h_prev),
                        || self.forget.pre_activation(x_t, h_prev),
                    )
                },
                || {
                    rayon::join(
                        || self.cell.pre_activation(x_t, h_prev),
                        || self.output.pre_activation(x_t, h_prev),
                    )
                },
            );
            (i_raw, f_raw, g_raw, o_raw)
        } else {
            (
                self.input.pre_activation(x_t, h_prev),
                self.forget.pre_activation(x_t, h_prev),
                self.cell.pre_activation(x_t, h_prev),
                self.output.pre_activation(x_t, h_prev),
            )
        };

        let i = Activation::Sigmoid.apply(&i_raw);
        let g = Activation::Tanh.apply(&g_raw);
        let f = Activation::Sigmoid.apply(&f_raw);
        let c = &g * &i + &(&c_prev * &f);
        let o = Activation::Sigmoid.apply(&o_raw);
        let c_activated = Activation::Tanh.apply(&c);
        let h = &o * &c_activated;

        CellStep {
            i,
            f,
            g,
            o,
            c,
            c_activated,
            h,
        }
    }
}

/// Forward-pass record of one LSTM layer over one sequence.
///
/// Produced by [`LSTM::forward`] and consumed by [`LSTM::backward`]. Keeping it outside
/// the layer lets inference run on a shared reference.
#[derive(Debug, Clone)]
pub struct LSTMTrace {
    input: Array2<f32>,
    hidden: Array2<f32>,
    steps: Vec<CellStep>,
}

impl LSTMTrace {
    /// Hidden state of every timestep with shape (timesteps, units)
    pub fn hidden_states(&self) -> &Array2<f32> {
        &self.hidden
    }

    /// Per-timestep cell records
    pub fn steps(&self) -> &[CellStep] {
        &self.steps
    }

    pub fn timesteps(&self) -> usize {
        self.steps.len()
    }
}

/// Long Short-Term Memory (LSTM) layer that returns the hidden state of every timestep.
///
/// The running hidden and memory states start from the learnable vectors `h0` and `c0`.
/// Timestep `t` depends on timestep `t - 1`, so the fold over time is sequential.
///
/// # Fields
///
/// - `name` - Prefix for parameter ids, e.g. `lstm_1`
/// - `input_dim` - Dimensionality of input features
/// - `units` - Number of LSTM units (hidden size)
/// - `gates` - Input, forget, cell and output gates
/// - `h0` - Learnable initial hidden state
/// - `c0` - Learnable initial memory state
///
/// # Example
/// ```rust
/// use har_lstm::neural_network::LSTM;
/// use ndarray::Array2;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let layer = LSTM::new("lstm", 3, 8, &mut rng).unwrap();
/// let trace = layer.forward(Array2::ones((5, 3)).view()).unwrap();
/// assert_eq!(trace.hidden_states().shape(), &[5, 8]);
/// ```
#[derive(Debug, Clone)]
pub struct LSTM {
    name: String,
    input_dim: usize,
    units: usize,
    gates: LSTMGates,
    h0: Parameter<Ix1>,
    c0: Parameter<Ix1>,
}

impl LSTM {
    /// Creates a new LSTM layer
    ///
    /// # Parameters
    ///
    /// - `name` - Prefix used for the ids of this layer's parameters
    /// - `input_dim` - Number of features per timestep
    /// - `units` - Hidden size
    /// - `rng` - Random number generator for weight initialization
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - A layer with orthogonal kernels and zero biases and initial states
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `units` is 0
    pub fn new<R: Rng + ?Sized>(
        name: &str,
        input_dim: usize,
        units: usize,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, units)?;

        Ok(Self {
            name: name.to_string(),
            input_dim,
            units,
            gates: LSTMGates::new(input_dim, units, rng)?,
            h0: Parameter::new(Array1::zeros(units)),
            c0: Parameter::new(Array1::zeros(units)),
        })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn gates(&self) -> &LSTMGates {
        &self.gates
    }

    /// Learnable initial (hidden, memory) states
    pub fn initial_state(&self) -> (&Array1<f32>, &Array1<f32>) {
        (&self.h0.value, &self.c0.value)
    }

    /// Applies the cell over the whole sequence.
    ///
    /// # Parameters
    ///
    /// - `sequence` - Input with shape (timesteps, input_dim)
    ///
    /// # Returns
    ///
    /// - `Result<LSTMTrace, ModelError>` - Hidden states of every timestep plus the cached activations
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the sequence is empty or has the wrong feature count
    pub fn forward(&self, sequence: ArrayView2<f32>) -> Result<LSTMTrace, ModelError> {
        validate_sequence(sequence, self.input_dim)?;

        let timesteps = sequence.nrows();
        let mut hidden = Array2::<f32>::zeros((timesteps, self.units));
        let mut steps = Vec::with_capacity(timesteps);

        let mut h_prev = self.h0.value.clone();
        let mut c_prev = self.c0.value.clone();

        for (t, x_t) in sequence.outer_iter().enumerate() {
            let step = self.gates.step(x_t, h_prev.view(), c_prev.view());
            hidden.row_mut(t).assign(&step.h);
            h_prev = step.h.clone();
            c_prev = step.c.clone();
            steps.push(step);
        }

        Ok(LSTMTrace {
            input: sequence.to_owned(),
            hidden,
            steps,
        })
    }

    /// Backpropagation through time.
    ///
    /// Stores gradients for all gate tensors and for `h0`/`c0`, replacing the gradients of
    /// any earlier call.
    ///
    /// # Parameters
    ///
    /// - `trace` - Record returned by [`LSTM::forward`] on this layer
    /// - `grad_hidden` - Gradient of the loss with respect to every hidden output, shape (timesteps, units)
    ///
    /// # Returns
    ///
    /// - `Result<Array2<f32>, ModelError>` - Gradient with respect to the input sequence, shape (timesteps, input_dim)
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `trace` or `grad_hidden` do not match this layer
    pub fn backward(
        &mut self,
        trace: &LSTMTrace,
        grad_hidden: ArrayView2<f32>,
    ) -> Result<Array2<f32>, ModelError> {
        let timesteps = trace.timesteps();
        if trace.input.ncols() != self.input_dim || trace.hidden.ncols() != self.units {
            return Err(ModelError::InputValidationError(format!(
                "trace was not produced by layer {}",
                self.name
            )));
        }
        if grad_hidden.dim() != (timesteps, self.units) {
            return Err(ModelError::InputValidationError(format!(
                "expected hidden gradient of shape ({}, {}), got {:?}",
                timesteps,
                self.units,
                grad_hidden.dim()
            )));
        }

        let mut grad_input_gate = GateGradients::zeros(self.input_dim, self.units);
        let mut grad_forget_gate = GateGradients::zeros(self.input_dim, self.units);
        let mut grad_cell_gate = GateGradients::zeros(self.input_dim, self.units);
        let mut grad_output_gate = GateGradients::zeros(self.input_dim, self.units);

        let mut grad_input = Array2::<f32>::zeros((timesteps, self.input_dim));

        // Gradients flowing back from timestep t + 1
        let mut grad_h = Array1::<f32>::zeros(self.units);
        let mut grad_c = Array1::<f32>::zeros(self.units);

        for t in (0..timesteps).rev() {
            let step = &trace.steps[t];
            let (h_prev, c_prev) = if t == 0 {
                (self.h0.value.view(), self.c0.value.view())
            } else {
                (trace.steps[t - 1].h.view(), trace.steps[t - 1].c.view())
            };

            // h_t = o_t * tanh(c_t)
            let grad_h_t = &grad_h + &grad_hidden.row(t);
            let grad_o = &grad_h_t * &step.c_activated;
            grad_c = grad_c
                + &(&grad_h_t * &step.o * &Activation::Tanh.derivative(&step.c_activated));

            // c_t = g_t * i_t + c_prev * f_t
            let grad_f = &grad_c * &c_prev;
            let grad_i = &grad_c * &step.g;
            let grad_g = &grad_c * &step.i;
            let grad_c_prev = &grad_c * &step.f;

            let grad_i_raw = grad_i * &Activation::Sigmoid.derivative(&step.i);
            let grad_f_raw = grad_f * &Activation::Sigmoid.derivative(&step.f);
            let grad_g_raw = grad_g * &Activation::Tanh.derivative(&step.g);
            let grad_o_raw = grad_o * &Activation::Sigmoid.derivative(&step.o);

            let x_t = trace.input.row(t);
            grad_input_gate.accumulate(x_t, h_prev, &grad_i_raw);
            grad_forget_gate.accumulate(x_t, h_prev, &grad_f_raw);
            grad_cell_gate.accumulate(x_t, h_prev, &grad_g_raw);
            grad_output_gate.accumulate(x_t, h_prev, &grad_o_raw);

            let dx = grad_i_raw.dot(&self.gates.input.kernel.value.t())
                + grad_f_raw.dot(&self.gates.forget.kernel.value.t())
                + grad_g_raw.dot(&self.gates.cell.kernel.value.t())
                + grad_o_raw.dot(&self.gates.output.kernel.value.t());
            grad_input.row_mut(t).assign(&dx);

            grad_h = grad_i_raw.dot(&self.gates.input.recurrent_kernel.value.t())
                + grad_f_raw.dot(&self.gates.forget.recurrent_kernel.value.t())
                + grad_g_raw.dot(&self.gates.cell.recurrent_kernel.value.t())
                + grad_o_raw.dot(&self.gates.output.recurrent_kernel.value.t());
            grad_c = grad_c_prev;
        }

        self.gates.input.store_gradients(grad_input_gate);
        self.gates.forget.store_gradients(grad_forget_gate);
        self.gates.cell.store_gradients(grad_cell_gate);
        self.gates.output.store_gradients(grad_output_gate);

        // What is left after t = 0 flows into the initial states
        self.h0.set_grad(grad_h);
        self.c0.set_grad(grad_c);

        Ok(grad_input)
    }

    /// Mutable views of the 12 gate tensors followed by `h0` and `c0`
    pub fn parameters_mut(&mut self) -> Vec<(ParamId, ParamView<'_>)> {
        let name = self.name.as_str();
        let mut params = Vec::with_capacity(14);
        params.extend(
            self.gates
                .input
                .parameters_mut(&format!("{}.input_gate", name)),
        );
        params.extend(
            self.gates
                .forget
                .parameters_mut(&format!("{}.forget_gate", name)),
        );
        params.extend(self.gates.cell.parameters_mut(&format!("{}.cell_gate", name)));
        params.extend(
            self.gates
                .output
                .parameters_mut(&format!("{}.output_gate", name)),
        );
        params.push((ParamId::new(&[name, "h0"]), self.h0.view_mut()));
        params.push((ParamId::new(&[name, "c0"]), self.c0.view_mut()));
        params
    }

    pub fn param_count(&self) -> usize {
        self.gates.input.param_count()
            + self.gates.forget.param_count()
            + self.gates.cell.param_count()
            + self.gates.output.param_count()
            + self.h0.len()
            + self.c0.len()
    }
}
