/// Softmax projection head that averages the last few timesteps
pub mod classification_head;
/// Recurrent layers: gates, the LSTM cell and the sequence fold
pub mod recurrent_layer;

pub use classification_head::*;
pub use recurrent_layer::*;
