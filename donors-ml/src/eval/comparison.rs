//! Side-by-side test scores of unoptimized, optimized and reduced models.

use crate::data::LabeledDataset;
use crate::error::MlError;
use crate::metrics::MetricReport;
use crate::training::Trainable;
use serde::{Deserialize, Serialize};

/// Test-set accuracy and F-beta of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub accuracy: f64,
    pub fscore: f64,
}

impl ModelScore {
    pub fn evaluate<C: Trainable + ?Sized>(
        classifier: &C,
        test: &LabeledDataset,
        beta: f64,
    ) -> Result<Self, MlError> {
        let predicted = classifier.predict(test.features())?;
        let report = MetricReport::evaluate(test.labels(), &predicted, beta)?;
        Ok(Self {
            accuracy: report.accuracy,
            fscore: report.fbeta,
        })
    }
}

/// Final model comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelComparison {
    pub unoptimized: ModelScore,
    pub optimized: ModelScore,
    /// The optimized model retrained on only the top-ranked features.
    pub reduced: Option<ModelScore>,
}

impl ModelComparison {
    pub fn new(unoptimized: ModelScore, optimized: ModelScore) -> Self {
        Self {
            unoptimized,
            optimized,
            reduced: None,
        }
    }

    pub fn with_reduced(mut self, reduced: ModelScore) -> Self {
        self.reduced = Some(reduced);
        self
    }

    /// `(accuracy, fscore)` gained by tuning.
    pub fn improvement(&self) -> (f64, f64) {
        (
            self.optimized.accuracy - self.unoptimized.accuracy,
            self.optimized.fscore - self.unoptimized.fscore,
        )
    }

    /// `(accuracy, fscore)` lost by dropping to the reduced feature set.
    pub fn reduction_cost(&self) -> Option<(f64, f64)> {
        self.reduced.map(|r| {
            (
                self.optimized.accuracy - r.accuracy,
                self.optimized.fscore - r.fscore,
            )
        })
    }
}
