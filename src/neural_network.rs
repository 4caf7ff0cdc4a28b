/// Module that contains activation function implementations
pub mod activation;
/// Module that contains orthogonal weight initializers
pub mod initializer;
/// Module that contains neural network layer implementations
pub mod layer;
/// Module that contains loss function implementations
pub mod loss_function;
/// Module that contains optimization algorithms for neural network training
pub mod optimizer;
/// Module that contains trainable parameter storage
pub mod parameter;
/// Module that contains the two-layer LSTM sequence classifier
pub mod sequence_classifier;

pub use activation::*;
pub use layer::*;
pub use loss_function::*;
pub use optimizer::*;
pub use parameter::*;
pub use sequence_classifier::*;

pub use crate::traits::LossFunction;
pub use crate::traits::Optimizer;
pub use crate::traits::Trainable;
