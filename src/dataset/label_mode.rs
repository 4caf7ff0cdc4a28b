use crate::ModelError;

/// Usage line printed when the mode argument is missing or invalid
pub const USAGE: &str = "Usage: har-lstm <1 for 2-category labels, 0 for 5-category labels>";

/// Which label set the dataset uses.
///
/// - `Binary` - ambulatory / non-ambulatory, 2 classes
/// - `MultiClass` - non-ambulatory / walking / running / upstairs / downstairs, 5 classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    Binary,
    MultiClass,
}

impl LabelMode {
    /// Parses the command-line mode flag: `"1"` selects [`LabelMode::Binary`], `"0"`
    /// selects [`LabelMode::MultiClass`].
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - For any other value
    ///
    /// # Example
    /// ```rust
    /// use har_lstm::dataset::LabelMode;
    ///
    /// assert_eq!(LabelMode::from_arg("1").unwrap(), LabelMode::Binary);
    /// assert_eq!(LabelMode::from_arg("0").unwrap().num_classes(), 5);
    /// assert!(LabelMode::from_arg("2").is_err());
    /// ```
    pub fn from_arg(arg: &str) -> Result<Self, ModelError> {
        match arg {
            "1" => Ok(LabelMode::Binary),
            "0" => Ok(LabelMode::MultiClass),
            other => Err(ModelError::InputValidationError(format!(
                "invalid label mode {:?}, expected \"1\" or \"0\"",
                other
            ))),
        }
    }

    /// Number of classes for this mode
    pub fn num_classes(&self) -> usize {
        match self {
            LabelMode::Binary => 2,
            LabelMode::MultiClass => 5,
        }
    }
}
