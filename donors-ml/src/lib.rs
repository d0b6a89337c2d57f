//! # donors-ml: evaluation toolkit for census income classifiers
//!
//! Scores binary classifiers that predict whether an individual earns more
//! than $50,000, and benchmarks them across training-set sizes.
//!
//! ## Layout
//!
//! - [`metrics`]: confusion counts, accuracy, precision, recall, F-beta, naive baseline
//! - [`training`]: the [`Trainable`] capability, benchmark harness, grid search
//! - [`data`]: labeled datasets, feature preparation, train/test split
//! - [`eval`]: final model comparison
//! - [`interpretability`]: feature importance ranking and reduction
//!
//! Classifiers themselves live outside this crate: anything implementing
//! [`Trainable`] can be benchmarked.

pub mod config;
pub mod error;
pub mod telemetry;

pub mod data;
pub mod eval;
pub mod interpretability;
pub mod metrics;
pub mod training;

// Re-exports
pub use config::{DonorsConfig, load_config};
pub use data::LabeledDataset;
pub use error::MlError;
pub use metrics::{ConfusionCounts, MetricReport, naive_baseline};
pub use training::{BenchmarkHarness, BenchmarkMatrix, BenchmarkResult, Trainable};
