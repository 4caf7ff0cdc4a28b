use thiserror::Error;

/// Error types that can occur during model operations
///
/// # Variants
///
/// - `InputValidationError` - indicates the input data provided does not meet the expected format, shape, or validation rules
/// - `ProcessingError` - indicates that there is something wrong while processing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Input validation error: {0}")]
    InputValidationError(String),
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

/// Input/Output error types that can occur while loading the activity dataset
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations
/// - `NpyError` - Wraps errors raised while decoding a `.npy` array
/// - `Model` - The loaded arrays do not satisfy the dataset's shape rules
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),
    #[error("NPY error: {0}")]
    NpyError(#[from] ndarray_npy::ReadNpyError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
