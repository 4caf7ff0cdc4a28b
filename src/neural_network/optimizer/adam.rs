use super::input_validation_function::*;
use crate::ModelError;
use crate::neural_network::{Optimizer, ParamId, ParamView, Trainable};
use ahash::AHashMap;
use ndarray::{ArrayD, ArrayViewD, IxDyn, Zip};

/// Default learning rate
pub const DEFAULT_LEARNING_RATE: f32 = 0.0002;
/// Default weight of the newest gradient in the first moment
pub const DEFAULT_BETA1: f32 = 0.1;
/// Default weight of the newest squared gradient in the second moment
pub const DEFAULT_BETA2: f32 = 0.01;
/// Default stability constant
pub const DEFAULT_EPSILON: f32 = 1e-8;

/// Adam optimizer implementation.
///
/// Keeps exponential moving averages of every parameter's gradient and squared gradient
/// and scales each step by their ratio. `beta1` and `beta2` are the weights given to the
/// *newest* gradient, so the defaults `0.1` / `0.01` correspond to decay rates of
/// `0.9` / `0.99` in the more common parameterization.
///
/// For each call, with one shared step counter `t`:
/// - `fix1 = 1 - (1 - beta1)^t`, `fix2 = 1 - (1 - beta2)^t`
/// - `lr_t = lr * sqrt(fix2) / fix1`
/// - `m = beta1 * g + (1 - beta1) * m`
/// - `v = beta2 * g^2 + (1 - beta2) * v`
/// - `p = p - lr_t * m / (sqrt(v) + epsilon)`
///
/// Moment buffers are created lazily, zero-filled, the first time a [`ParamId`] is seen
/// and are never reset.
///
/// # Example
/// ```rust
/// use har_lstm::neural_network::{Adam, ParamId, Parameter};
/// use ndarray::array;
///
/// let mut adam = Adam::default();
/// let mut p = Parameter::new(array![1.0_f32, -2.0]);
/// p.set_grad(array![2.0, -4.0]);
/// adam.step([(ParamId::new(&["p"]), p.view_mut())]);
/// assert_eq!(adam.t(), 1);
/// assert!(p.value[0] < 1.0 && p.value[1] > -2.0);
/// ```
#[derive(Debug, Clone)]
pub struct Adam {
    /// Learning rate controlling the size of parameter updates.
    learning_rate: f32,
    /// Weight of the newest gradient in the first moment estimate.
    beta1: f32,
    /// Weight of the newest squared gradient in the second moment estimate.
    beta2: f32,
    /// Small constant added for numerical stability.
    epsilon: f32,
    /// Current timestep, incremented once per update call.
    t: u64,
    /// Moment estimates keyed by parameter id.
    states: AHashMap<ParamId, AdamStates>,
}

impl Adam {
    /// Creates a new Adam optimizer with the specified parameters.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size for parameter updates
    /// - `beta1` - Weight of the newest gradient in the first moment (default 0.1)
    /// - `beta2` - Weight of the newest squared gradient in the second moment (default 0.01)
    /// - `epsilon` - Small constant for numerical stability (default 1e-8)
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new Adam optimizer instance
    /// - `Err(ModelError::InputValidationError)` - If any hyper-parameter is out of range
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        validate_moment_weight(beta1, "beta1")?;
        validate_moment_weight(beta2, "beta2")?;
        validate_epsilon(epsilon)?;

        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            t: 0,
            states: AHashMap::new(),
        })
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Number of update calls made so far
    pub fn t(&self) -> u64 {
        self.t
    }

    /// Moment estimates of one parameter, if it has been updated at least once
    pub fn state(&self, id: &ParamId) -> Option<&AdamStates> {
        self.states.get(id)
    }

    /// Number of parameters with moment estimates
    pub fn tracked_parameters(&self) -> usize {
        self.states.len()
    }

    /// Bias-corrected step size used at step `t`: `lr * sqrt(fix2) / fix1`
    ///
    /// # Parameters
    ///
    /// - `t` - Step number, starting at 1
    pub fn effective_learning_rate(&self, t: u64) -> f32 {
        let t = t as f64;
        let fix1 = 1.0 - (1.0 - self.beta1 as f64).powf(t);
        let fix2 = 1.0 - (1.0 - self.beta2 as f64).powf(t);
        (self.learning_rate as f64 * fix2.sqrt() / fix1) as f32
    }

    /// Performs one optimizer step over the given parameters.
    ///
    /// The step counter is incremented once for the whole call. Each parameter's update
    /// reads only its own value, gradient and moments, so the order of `params` does not
    /// affect the result.
    ///
    /// # Parameters
    ///
    /// - `params` - Parameters paired with their ids
    ///
    /// # Panics
    ///
    /// - If a known id is passed with a shape different from the one it was first seen with
    pub fn step<'a, I>(&mut self, params: I)
    where
        I: IntoIterator<Item = (ParamId, ParamView<'a>)>,
    {
        self.t += 1;
        let lr_t = self.effective_learning_rate(self.t);
        let epsilon = self.epsilon;

        for (id, param) in params {
            let ParamView { mut value, grad } = param;
            let dim = value.raw_dim();
            let state = self
                .states
                .entry(id)
                .or_insert_with(|| AdamStates::new(dim.clone()));
            assert_eq!(
                state.m.raw_dim(),
                dim,
                "parameter shape changed between optimizer steps"
            );

            state.update_moments(grad.view(), self.beta1, self.beta2);

            Zip::from(&mut value)
                .and(&state.m)
                .and(&state.v)
                .for_each(|p, &m, &v| *p -= lr_t * m / (v.sqrt() + epsilon));
        }
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            beta1: DEFAULT_BETA1,
            beta2: DEFAULT_BETA2,
            epsilon: DEFAULT_EPSILON,
            t: 0,
            states: AHashMap::new(),
        }
    }
}

impl Optimizer for Adam {
    fn update(&mut self, model: &mut dyn Trainable) {
        self.step(model.parameters_mut());
    }
}

/// First and second moment estimates of one parameter.
///
/// # Fields
///
/// - `m` - Moving average of gradients
/// - `v` - Moving average of squared gradients
#[derive(Debug, Clone)]
pub struct AdamStates {
    pub m: ArrayD<f32>,
    pub v: ArrayD<f32>,
}

impl AdamStates {
    /// Creates zero-initialized moments of the given shape
    pub fn new(dim: IxDyn) -> Self {
        Self {
            m: ArrayD::zeros(dim.clone()),
            v: ArrayD::zeros(dim),
        }
    }

    /// Folds one gradient into the moments
    ///
    /// - `m = beta1 * g + (1 - beta1) * m`
    /// - `v = beta2 * g^2 + (1 - beta2) * v`
    fn update_moments(&mut self, g: ArrayViewD<f32>, beta1: f32, beta2: f32) {
        Zip::from(&mut self.m)
            .and(&mut self.v)
            .and(&g)
            .for_each(|m, v, &grad| {
                *m = beta1 * grad + (1.0 - beta1) * *m;
                *v = beta2 * grad * grad + (1.0 - beta2) * *v;
            });
    }
}
