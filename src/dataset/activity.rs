use crate::neural_network::{ModelConfig, argmax};
use crate::{IoError, ModelError};
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};
use ndarray_npy::read_npy;
use std::path::Path;

/// Labeled activity episodes.
///
/// Every sample is a `(timesteps, features)` sequence of summary statistics; every label
/// is a one-hot row.
///
/// # Fields
///
/// - `features` - Array with shape (samples, timesteps, features)
/// - `labels` - One-hot array with shape (samples, classes)
#[derive(Debug, Clone)]
pub struct ActivityDataset {
    features: Array3<f32>,
    labels: Array2<f32>,
}

impl ActivityDataset {
    /// Wraps feature and label arrays
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the sample counts differ
    pub fn new(features: Array3<f32>, labels: Array2<f32>) -> Result<Self, ModelError> {
        if features.len_of(Axis(0)) != labels.nrows() {
            return Err(ModelError::InputValidationError(format!(
                "features and labels must have the same number of samples, features: {}, labels: {}",
                features.len_of(Axis(0)),
                labels.nrows()
            )));
        }
        Ok(Self { features, labels })
    }

    /// Loads `X` and `y` from two `.npy` files.
    ///
    /// Both `float32` and `float64` arrays are accepted; `float64` data is narrowed to `f32`.
    ///
    /// # Parameters
    ///
    /// - `x_path` - Path of the (samples, timesteps, features) array
    /// - `y_path` - Path of the (samples, classes) one-hot array
    ///
    /// # Errors
    ///
    /// - `IoError::NpyError` - If a file cannot be read or has the wrong dimensionality
    /// - `IoError::Model` - If the sample counts differ
    pub fn load_npy<P: AsRef<Path>, Q: AsRef<Path>>(x_path: P, y_path: Q) -> Result<Self, IoError> {
        let features: Array3<f32> = match read_npy::<_, Array3<f32>>(x_path.as_ref()) {
            Ok(x) => x,
            Err(err) => match read_npy::<_, Array3<f64>>(x_path.as_ref()) {
                Ok(x) => x.mapv(|v| v as f32),
                Err(_) => return Err(err.into()),
            },
        };
        let labels: Array2<f32> = match read_npy::<_, Array2<f32>>(y_path.as_ref()) {
            Ok(y) => y,
            Err(err) => match read_npy::<_, Array2<f64>>(y_path.as_ref()) {
                Ok(y) => y.mapv(|v| v as f32),
                Err(_) => return Err(err.into()),
            },
        };

        Ok(Self::new(features, labels)?)
    }

    pub fn len(&self) -> usize {
        self.labels.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn timesteps(&self) -> usize {
        self.features.len_of(Axis(1))
    }

    pub fn input_dim(&self) -> usize {
        self.features.len_of(Axis(2))
    }

    pub fn num_classes(&self) -> usize {
        self.labels.ncols()
    }

    pub fn features(&self) -> &Array3<f32> {
        &self.features
    }

    pub fn labels(&self) -> &Array2<f32> {
        &self.labels
    }

    /// Sequence and one-hot label of sample `index`
    ///
    /// # Panics
    ///
    /// - If `index >= self.len()`
    pub fn sample(&self, index: usize) -> (ArrayView2<'_, f32>, ArrayView1<'_, f32>) {
        (
            self.features.index_axis(Axis(0), index),
            self.labels.row(index),
        )
    }

    /// Class index (argmax of the one-hot row) of sample `index`
    pub fn class_of(&self, index: usize) -> usize {
        argmax(self.labels.row(index))
    }

    /// Checks that the dataset fits a model architecture
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the feature width or class count differ from `config`
    pub fn validate(&self, config: &ModelConfig) -> Result<(), ModelError> {
        if self.input_dim() != config.input_dim {
            return Err(ModelError::InputValidationError(format!(
                "dataset has {} features per timestep, model expects {}",
                self.input_dim(),
                config.input_dim
            )));
        }
        if self.num_classes() != config.num_classes {
            return Err(ModelError::InputValidationError(format!(
                "dataset labels have {} classes, model expects {}",
                self.num_classes(),
                config.num_classes
            )));
        }
        Ok(())
    }

    /// Keeps the samples at `indices`, in that order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }
}
