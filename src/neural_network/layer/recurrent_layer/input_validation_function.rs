use super::*;

/// Validates that a dimension value is greater than 0
///
/// # Parameters
///
/// - `value` - The dimension value to validate
/// - `name` - The name of the dimension for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_dimension_greater_than_zero(
    value: usize,
    name: &str,
) -> Result<(), ModelError> {
    if value == 0 {
        return Err(ModelError::InputValidationError(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// Validates input dimensions for recurrent layers
pub(super) fn validate_recurrent_dimensions(
    input_dim: usize,
    units: usize,
) -> Result<(), ModelError> {
    validate_dimension_greater_than_zero(input_dim, "input_dim")?;
    validate_dimension_greater_than_zero(units, "units")?;
    Ok(())
}

/// Validates that a sequence has at least one timestep and `input_dim` features
///
/// # Parameters
///
/// - `sequence` - Input sequence with shape (timesteps, features)
/// - `input_dim` - Expected feature count
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_sequence(
    sequence: ArrayView2<f32>,
    input_dim: usize,
) -> Result<(), ModelError> {
    if sequence.nrows() == 0 {
        return Err(ModelError::InputValidationError(
            "input sequence has no timesteps".to_string(),
        ));
    }
    if sequence.ncols() != input_dim {
        return Err(ModelError::InputValidationError(format!(
            "expected {} features per timestep, got {}",
            input_dim,
            sequence.ncols()
        )));
    }
    Ok(())
}
