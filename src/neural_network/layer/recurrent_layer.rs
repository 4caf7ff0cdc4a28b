use crate::ModelError;
use crate::neural_network::activation::Activation;
use crate::neural_network::initializer::{orthogonal_matrix, truncated_orthogonal};
use crate::neural_network::{ParamId, ParamView, Parameter};
use input_validation_function::*;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Ix1, Ix2};
use rand::Rng;

/// Gate structure for the recurrent cell
pub mod gate;
/// Input validation functions for recurrent layers
mod input_validation_function;
/// The LSTM cell and the layer that folds it over a sequence
pub mod lstm;

pub use gate::{Gate, GateGradients};
pub use lstm::{CellStep, LSTM, LSTMGates, LSTMTrace};
