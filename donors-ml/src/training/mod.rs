//! Training infrastructure: the classifier capability, benchmark harness, grid search.

pub mod harness;
pub mod sweep;

pub use harness::{
    BenchmarkHarness, BenchmarkMatrix, BenchmarkReport, BenchmarkResult, CollectedMatrix,
    tiers_from_fractions,
};
pub use sweep::{GridSearch, GridSearchOutcome, HyperparamSweep, ParamGrid, SweepTrial};

use crate::error::MlError;

/// A binary classifier that can be fitted and queried.
///
/// Implementations wrap an external learning library; this crate never
/// looks inside. `fit` replaces any previously trained state.
pub trait Trainable {
    /// Identifier used to key benchmark results.
    fn name(&self) -> &str;

    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<(), MlError>;

    /// One label (0 or 1) per input row.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, MlError>;

    /// Per-feature importance weights of the trained model, if it exposes any.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }
}

impl<T: Trainable + ?Sized> Trainable for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<(), MlError> {
        (**self).fit(features, labels)
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, MlError> {
        (**self).predict(features)
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        (**self).feature_importances()
    }
}

/// Ignores its input and always predicts the same label.
#[derive(Debug, Clone)]
pub struct ConstantClassifier {
    name: String,
    label: u8,
}

impl ConstantClassifier {
    pub fn new(label: u8) -> Result<Self, MlError> {
        if label > 1 {
            return Err(MlError::invalid_input(format!(
                "constant label must be 0 or 1, got {label}"
            )));
        }
        Ok(Self {
            name: format!("NaivePredictor({label})"),
            label,
        })
    }

    pub fn label(&self) -> u8 {
        self.label
    }
}

impl Trainable for ConstantClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&mut self, _features: &[Vec<f64>], _labels: &[u8]) -> Result<(), MlError> {
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, MlError> {
        Ok(vec![self.label; features.len()])
    }
}
