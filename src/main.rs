//! Command-line trainer for the two-layer LSTM activity classifier.
//!
//! ```text
//! har-lstm 1 --x-path X.npy --y-path y.npy
//! ```

use anyhow::Context;
use clap::Parser;
use har_lstm::dataset::{ActivityDataset, LabelMode, USAGE};
use har_lstm::neural_network::{
    Adam, DEFAULT_BETA1, DEFAULT_BETA2, DEFAULT_EPSILON, DEFAULT_LEARNING_RATE, ModelConfig,
    SequenceClassifier,
};
use har_lstm::training::{
    DEFAULT_EVAL_EVERY, DEFAULT_LOG_EVERY, DEFAULT_STEPS, DEFAULT_TEST_SIZE, Trainer,
    TrainerConfig,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "har-lstm")]
#[command(about = "Train a two-layer LSTM human activity classifier")]
#[command(version)]
struct Args {
    /// 1 for 2-category labels, 0 for 5-category labels
    mode: Option<String>,

    /// Feature array with shape (samples, timesteps, features)
    #[arg(long, default_value = "X.npy")]
    x_path: PathBuf,

    /// One-hot label array with shape (samples, classes)
    #[arg(long, default_value = "y.npy")]
    y_path: PathBuf,

    /// Number of single-sample training steps
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// Steps between two held-out accuracy evaluations
    #[arg(long, default_value_t = DEFAULT_EVAL_EVERY)]
    eval_every: usize,

    /// Steps between two training loss lines
    #[arg(long, default_value_t = DEFAULT_LOG_EVERY)]
    log_every: usize,

    /// Fraction of samples held out for evaluation
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    test_size: f64,

    /// Seed for initialization, splitting and sampling (random when absent)
    #[arg(long)]
    seed: Option<u64>,

    /// Adam learning rate
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let Some(mode) = args.mode.as_deref().and_then(|m| LabelMode::from_arg(m).ok()) else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let trainer_config = TrainerConfig {
        steps: args.steps,
        eval_every: args.eval_every,
        log_every: args.log_every,
        test_size: args.test_size,
    };
    let optimizer = Adam::new(
        args.learning_rate,
        DEFAULT_BETA1,
        DEFAULT_BETA2,
        DEFAULT_EPSILON,
    )?;
    let mut trainer = Trainer::new(trainer_config, optimizer)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let dataset = ActivityDataset::load_npy(&args.x_path, &args.y_path).with_context(|| {
        format!(
            "failed to load dataset from {} and {}",
            args.x_path.display(),
            args.y_path.display()
        )
    })?;
    info!(
        samples = dataset.len(),
        timesteps = dataset.timesteps(),
        features = dataset.input_dim(),
        classes = dataset.num_classes(),
        "loaded dataset"
    );

    let model_config = ModelConfig {
        input_dim: dataset.input_dim(),
        ..ModelConfig::new(mode)
    };
    dataset.validate(&model_config)?;

    let (train, test) = trainer.split(&dataset, &mut rng)?;
    let mut model = SequenceClassifier::new(model_config, &mut rng)?;

    let report = trainer.fit(&mut model, &train, &test, &mut rng)?;
    info!(
        final_loss = report.final_loss,
        final_accuracy = ?report.final_accuracy(),
        "training finished"
    );

    Ok(())
}
