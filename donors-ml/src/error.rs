//! Error types for the donors-ml crate.

use thiserror::Error;

/// Top-level error type for evaluation, benchmarking and data preparation.
///
/// No operation in this crate recovers locally: every failure surfaces to
/// the caller exactly as produced.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    #[error("Invalid sample size {sample_size}: must be in 1..={available}")]
    InvalidSampleSize { sample_size: usize, available: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl MlError {
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn undefined_metric(msg: impl Into<String>) -> Self {
        Self::UndefinedMetric(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
