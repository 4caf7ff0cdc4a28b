/// This module provides the activity recognition dataset and its `.npy` loader
pub mod activity;
/// This module groups training samples by class for balanced sampling
pub mod class_buckets;
/// This module provides the label arity selection (2 or 5 classes)
pub mod label_mode;

pub use activity::ActivityDataset;
pub use class_buckets::ClassBuckets;
pub use label_mode::{LabelMode, USAGE};
