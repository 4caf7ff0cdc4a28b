use crate::ModelError;
use ndarray::{Array2, s};
use rand::Rng;
use rand_distr::StandardNormal;

/// Creates a random square orthogonal matrix.
///
/// Entries are drawn from a standard normal distribution scaled by `1/sqrt(n)`, then the
/// left singular vectors of that matrix are returned. Rows and columns of the result are
/// pairwise orthonormal and all singular values are 1.
///
/// The decomposition runs in `f64`; only the returned matrix is narrowed to `f32`.
///
/// # Parameters
///
/// - `n` - Number of rows and columns
/// - `rng` - Random number generator used for the Gaussian draw
///
/// # Returns
///
/// - `Result<Array2<f32>, ModelError>` - An `n x n` orthogonal matrix
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If `n` is 0
/// - `ModelError::ProcessingError` - If the SVD did not produce left singular vectors
///
/// # Example
/// ```rust
/// use har_lstm::neural_network::initializer::orthogonal_matrix;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let q = orthogonal_matrix(8, &mut rng).unwrap();
/// assert_eq!(q.shape(), &[8, 8]);
/// ```
pub fn orthogonal_matrix<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Array2<f32>, ModelError> {
    if n == 0 {
        return Err(ModelError::InputValidationError(
            "orthogonal matrix size must be greater than 0".to_string(),
        ));
    }

    let bound = (1.0 / n as f64).sqrt();
    let w = nalgebra::DMatrix::<f64>::from_fn(n, n, |_, _| {
        rng.sample::<f64, _>(StandardNormal) * bound
    });

    let svd = nalgebra::SVD::new(w, true, false);
    let u = svd
        .u
        .ok_or_else(|| ModelError::ProcessingError("SVD did not compute U".to_string()))?;

    Ok(Array2::from_shape_fn((n, n), |(i, j)| u[(i, j)] as f32))
}

/// Creates a `rows x cols` slice of a square orthogonal matrix.
///
/// The square matrix has size `max(rows, cols)` and its top-left block is kept. With
/// `rows < cols` the rows stay orthonormal; with `cols < rows` the columns do.
///
/// # Parameters
///
/// - `rows` - Number of rows to keep
/// - `cols` - Number of columns to keep
/// - `rng` - Random number generator used for the Gaussian draw
///
/// # Returns
///
/// - `Result<Array2<f32>, ModelError>` - A `rows x cols` matrix
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If `rows` or `cols` is 0
pub fn truncated_orthogonal<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Array2<f32>, ModelError> {
    if rows == 0 || cols == 0 {
        return Err(ModelError::InputValidationError(format!(
            "truncated orthogonal shape must be non-empty, got ({}, {})",
            rows, cols
        )));
    }

    let square = orthogonal_matrix(rows.max(cols), rng)?;
    Ok(square.slice(s![..rows, ..cols]).to_owned())
}
