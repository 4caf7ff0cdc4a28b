/// Adam-style optimizer with per-parameter moment estimates
pub mod adam;
/// Hyper-parameter validation shared by optimizers
mod input_validation_function;

pub use adam::*;
