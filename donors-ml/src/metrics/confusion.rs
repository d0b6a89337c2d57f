//! Confusion counts for binary labels.

use crate::error::MlError;
use serde::{Deserialize, Serialize};

/// Four-way tally of prediction outcomes. The fields always sum to the
/// length of the label sequences they were built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Rows whose actual label is 1.
    pub fn actual_positives(&self) -> usize {
        self.tp + self.fn_
    }

    /// Rows predicted as 1.
    pub fn predicted_positives(&self) -> usize {
        self.tp + self.fp
    }

    /// `[[tn, fp], [fn, tp]]`, rows indexed by the actual label.
    pub fn as_matrix(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

/// Tally `actual` against `predicted`.
///
/// Both sequences must have the same length and hold only 0 or 1.
pub fn confusion(actual: &[u8], predicted: &[u8]) -> Result<ConfusionCounts, MlError> {
    if actual.len() != predicted.len() {
        return Err(MlError::shape_mismatch(format!(
            "actual has {} labels, predicted has {}",
            actual.len(),
            predicted.len()
        )));
    }

    let mut counts = ConfusionCounts::default();
    for (i, (&a, &p)) in actual.iter().zip(predicted).enumerate() {
        match (a, p) {
            (1, 1) => counts.tp += 1,
            (0, 1) => counts.fp += 1,
            (0, 0) => counts.tn += 1,
            (1, 0) => counts.fn_ += 1,
            _ => {
                return Err(MlError::shape_mismatch(format!(
                    "label at index {i} is outside {{0, 1}} (actual={a}, predicted={p})"
                )));
            }
        }
    }
    Ok(counts)
}
