use crate::ModelError;
use crate::dataset::ActivityDataset;
use rand::Rng;
use rand::seq::SliceRandom;

/// Splits a dataset into shuffled training and test sets
///
/// # Parameters
///
/// - `dataset` - Samples to split
/// - `test_size` - Fraction of samples placed in the test set, in (0, 1); the count is rounded up
/// - `rng` - Random number generator used for the shuffle
///
/// # Returns
///
/// - `Result<(ActivityDataset, ActivityDataset), ModelError>` - `(train, test)`
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If the dataset has fewer than 2 samples or `test_size` is not between 0 and 1
///
/// # Example
/// ```rust
/// use har_lstm::dataset::ActivityDataset;
/// use har_lstm::utility::train_test_split;
/// use ndarray::{Array2, Array3};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut labels = Array2::<f32>::zeros((10, 2));
/// labels.column_mut(0).fill(1.0);
/// let dataset = ActivityDataset::new(Array3::zeros((10, 5, 3)), labels).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// // 10 * 0.25 = 2.5 test samples, rounded up
/// let (train, test) = train_test_split(&dataset, 0.25, &mut rng).unwrap();
/// assert_eq!((train.len(), test.len()), (7, 3));
/// ```
pub fn train_test_split<R: Rng + ?Sized>(
    dataset: &ActivityDataset,
    test_size: f64,
    rng: &mut R,
) -> Result<(ActivityDataset, ActivityDataset), ModelError> {
    let n_samples = dataset.len();

    if test_size <= 0.0 || test_size >= 1.0 {
        return Err(ModelError::InputValidationError(format!(
            "test_size must be between 0 and 1 (exclusive), got {}",
            test_size
        )));
    }

    if n_samples < 2 {
        return Err(ModelError::InputValidationError(format!(
            "cannot split a dataset with {} samples into train and test sets",
            n_samples
        )));
    }

    // rounded up, both sides keep at least one sample
    let n_test = ((n_samples as f64 * test_size).ceil() as usize).clamp(1, n_samples - 1);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(rng);

    let (test_indices, train_indices) = indices.split_at(n_test);

    Ok((dataset.select(train_indices), dataset.select(test_indices)))
}
