use crate::ModelError;
use crate::dataset::ActivityDataset;
use rand::Rng;
use tracing::warn;

/// Training sample indices grouped by class.
///
/// Sampling is two-stage: a class is drawn uniformly among the non-empty classes, then a
/// sample is drawn uniformly within that class. Rare classes are therefore seen as often
/// as common ones.
#[derive(Debug, Clone)]
pub struct ClassBuckets {
    buckets: Vec<Vec<usize>>,
    non_empty: Vec<usize>,
}

impl ClassBuckets {
    /// Groups every sample of `dataset` by the argmax of its one-hot label
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the dataset has no samples
    pub fn from_dataset(dataset: &ActivityDataset) -> Result<Self, ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::InputValidationError(
                "cannot bucket an empty training set".to_string(),
            ));
        }

        let mut buckets = vec![Vec::new(); dataset.num_classes()];
        for i in 0..dataset.len() {
            buckets[dataset.class_of(i)].push(i);
        }

        let mut non_empty = Vec::with_capacity(buckets.len());
        for (class, bucket) in buckets.iter().enumerate() {
            if bucket.is_empty() {
                warn!(class, "class has no training samples, skipping it during sampling");
            } else {
                non_empty.push(class);
            }
        }

        Ok(Self { buckets, non_empty })
    }

    /// Draws one sample index with class-balanced probability
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        // from_dataset guarantees at least one non-empty class
        let class = self.non_empty[rng.random_range(0..self.non_empty.len())];
        let bucket = &self.buckets[class];
        bucket[rng.random_range(0..bucket.len())]
    }

    /// Number of samples per class, indexed by class
    pub fn class_counts(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Classes that have at least one sample
    pub fn non_empty_classes(&self) -> &[usize] {
        &self.non_empty
    }
}
