use crate::ModelError;
use crate::dataset::{ActivityDataset, ClassBuckets};
use crate::neural_network::{Adam, SequenceClassifier, Trainable, argmax};
use crate::utility::train_test_split;
use rand::Rng;
use tracing::{debug, info};

/// Default number of training steps
pub const DEFAULT_STEPS: usize = 1_000_000;
/// Default number of steps between two held-out evaluations
pub const DEFAULT_EVAL_EVERY: usize = 10_000;
/// Default number of steps between two loss log lines
pub const DEFAULT_LOG_EVERY: usize = 1;
/// Default fraction of samples held out for evaluation
pub const DEFAULT_TEST_SIZE: f64 = 0.1;

/// Schedule of a training run
///
/// # Fields
///
/// - `steps` - Total number of single-sample updates
/// - `eval_every` - Held-out accuracy is measured after every multiple of this step
/// - `log_every` - Training loss is logged after every multiple of this step
/// - `test_size` - Fraction of the dataset held out for evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerConfig {
    pub steps: usize,
    pub eval_every: usize,
    pub log_every: usize,
    pub test_size: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            eval_every: DEFAULT_EVAL_EVERY,
            log_every: DEFAULT_LOG_EVERY,
            test_size: DEFAULT_TEST_SIZE,
        }
    }
}

impl TrainerConfig {
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `steps`, `eval_every` or `log_every` is 0, or `test_size` is not between 0 and 1
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.steps == 0 {
            return Err(ModelError::InputValidationError(
                "steps must be greater than 0".to_string(),
            ));
        }
        if self.eval_every == 0 {
            return Err(ModelError::InputValidationError(
                "eval_every must be greater than 0".to_string(),
            ));
        }
        if self.log_every == 0 {
            return Err(ModelError::InputValidationError(
                "log_every must be greater than 0".to_string(),
            ));
        }
        if self.test_size <= 0.0 || self.test_size >= 1.0 {
            return Err(ModelError::InputValidationError(format!(
                "test_size must be between 0 and 1 (exclusive), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

/// Outcome of [`Trainer::fit`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    /// Loss of the last training step
    pub final_loss: f32,
    /// `(step, accuracy %)` for every evaluation, in step order
    pub evaluations: Vec<(usize, f32)>,
}

impl TrainingReport {
    /// Accuracy of the last evaluation, if any ran
    pub fn final_accuracy(&self) -> Option<f32> {
        self.evaluations.last().map(|&(_, accuracy)| accuracy)
    }
}

/// Single-sample training loop with periodic held-out evaluation
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
    optimizer: Adam,
}

impl Trainer {
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `config` is invalid
    pub fn new(config: TrainerConfig, optimizer: Adam) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config, optimizer })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn optimizer(&self) -> &Adam {
        &self.optimizer
    }

    /// Splits `dataset` into `(train, test)` holding out `config.test_size` of the samples
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the dataset has fewer than 2 samples
    pub fn split<R: Rng + ?Sized>(
        &self,
        dataset: &ActivityDataset,
        rng: &mut R,
    ) -> Result<(ActivityDataset, ActivityDataset), ModelError> {
        train_test_split(dataset, self.config.test_size, rng)
    }

    /// Trains `model` for `config.steps` class-balanced single-sample steps.
    ///
    /// # Parameters
    ///
    /// - `model` - Classifier updated in place
    /// - `train` - Samples drawn from for updates
    /// - `test` - Samples used for the periodic accuracy measurement
    /// - `rng` - Random number generator for sampling
    ///
    /// # Returns
    ///
    /// - `Result<TrainingReport, ModelError>` - The last loss and every evaluation
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `train` is empty or a sample does not fit the model
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        model: &mut SequenceClassifier,
        train: &ActivityDataset,
        test: &ActivityDataset,
        rng: &mut R,
    ) -> Result<TrainingReport, ModelError> {
        let buckets = ClassBuckets::from_dataset(train)?;
        debug!(class_counts = ?buckets.class_counts(), "bucketed training samples");
        info!(
            steps = self.config.steps,
            train_samples = train.len(),
            test_samples = test.len(),
            parameters = model.param_count(),
            "starting training"
        );

        let mut report = TrainingReport::default();

        for step in 1..=self.config.steps {
            let index = buckets.sample(rng);
            let (x, y) = train.sample(index);
            let loss = model.train_step(x, y, &mut self.optimizer)?;
            report.final_loss = loss;

            if step % self.config.log_every == 0 {
                info!(step, loss, "training loss");
            }

            if step % self.config.eval_every == 0 {
                let accuracy = evaluate(model, test)?;
                info!(step, accuracy, "test accuracy");
                report.evaluations.push((step, accuracy));
            }
        }

        Ok(report)
    }
}

/// Percentage of samples whose predicted class equals the label's class.
///
/// Runs forward passes only. An empty dataset scores 0.
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If a sample does not fit the model
pub fn evaluate(model: &SequenceClassifier, dataset: &ActivityDataset) -> Result<f32, ModelError> {
    if dataset.is_empty() {
        return Ok(0.0);
    }

    let mut correct = 0usize;
    for i in 0..dataset.len() {
        let (x, y) = dataset.sample(i);
        if model.predict_class(x)? == argmax(y) {
            correct += 1;
        }
    }

    Ok(correct as f32 / dataset.len() as f32 * 100.0)
}
