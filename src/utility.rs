/// This module provides the shuffled train/test split of a dataset
pub mod train_test_split;

pub use train_test_split::*;
