pub use crate::dataset::*;
pub use crate::error::{IoError, ModelError};
pub use crate::neural_network::*;
pub use crate::training::*;
pub use crate::utility::*;
