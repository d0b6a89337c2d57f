//! Classification metrics: confusion counts, accuracy, precision, recall, F-beta.
//!
//! Everything here is a pure function of label sequences: the same inputs
//! always give the same outputs and nothing is cached.

pub mod confusion;
pub mod score;

pub use confusion::{ConfusionCounts, confusion};
pub use score::{accuracy, fbeta, precision, recall};

use crate::error::MlError;
use serde::{Deserialize, Serialize};

/// The benchmark's standard operating point (precision-weighted).
pub const DEFAULT_BETA: f64 = 0.5;

/// Every scalar metric for one (actual, predicted) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub fbeta: f64,
    pub beta: f64,
    pub counts: ConfusionCounts,
}

impl MetricReport {
    /// Derive all metrics from `counts`. Fails if any of them is undefined.
    pub fn from_counts(counts: ConfusionCounts, beta: f64) -> Result<Self, MlError> {
        score::check_beta(beta)?;
        let accuracy = accuracy(&counts)?;
        let precision = precision(&counts)?;
        let recall = recall(&counts)?;
        let fbeta = score::fbeta_from(precision, recall, beta)?;
        Ok(Self {
            accuracy,
            precision,
            recall,
            fbeta,
            beta,
            counts,
        })
    }

    /// Tally and score `predicted` against `actual`.
    pub fn evaluate(actual: &[u8], predicted: &[u8], beta: f64) -> Result<Self, MlError> {
        Self::from_counts(confusion(actual, predicted)?, beta)
    }
}

/// Score a predictor that ignores its input and always emits `constant`.
///
/// `constant = 1` on a dataset without positives leaves recall undefined,
/// and `constant = 0` always leaves precision undefined; both are reported
/// as [`MlError::UndefinedMetric`].
pub fn naive_baseline(actual: &[u8], constant: u8, beta: f64) -> Result<MetricReport, MlError> {
    if constant > 1 {
        return Err(MlError::invalid_input(format!(
            "naive baseline constant must be 0 or 1, got {constant}"
        )));
    }
    if actual.is_empty() {
        return Err(MlError::empty_input("naive baseline over zero labels"));
    }
    if constant == 1 && !actual.contains(&1) {
        return Err(MlError::undefined_metric(
            "naive baseline: dataset has no positive labels, recall is undefined",
        ));
    }

    let predicted = vec![constant; actual.len()];
    let report = MetricReport::evaluate(actual, &predicted, beta)?;
    tracing::debug!(
        constant,
        accuracy = report.accuracy,
        fbeta = report.fbeta,
        "Naive predictor scored"
    );
    Ok(report)
}

/// An F-beta scorer used to rank candidate models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FBetaScorer {
    pub beta: f64,
}

impl Default for FBetaScorer {
    fn default() -> Self {
        Self { beta: DEFAULT_BETA }
    }
}

impl FBetaScorer {
    pub fn new(beta: f64) -> Result<Self, MlError> {
        score::check_beta(beta)?;
        Ok(Self { beta })
    }

    pub fn score(&self, actual: &[u8], predicted: &[u8]) -> Result<f64, MlError> {
        fbeta(&confusion(actual, predicted)?, self.beta)
    }
}
