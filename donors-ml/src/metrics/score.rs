//! Scalar scores derived from confusion counts.
//!
//! Zero denominators are errors, never a silent 0.0: an undefined precision
//! usually means a degenerate dataset or a misconfigured baseline.

use super::confusion::ConfusionCounts;
use crate::error::MlError;

/// `(tp + tn) / total`.
pub fn accuracy(c: &ConfusionCounts) -> Result<f64, MlError> {
    let total = c.total();
    if total == 0 {
        return Err(MlError::empty_input("accuracy of zero labels"));
    }
    Ok((c.tp + c.tn) as f64 / total as f64)
}

/// `tp / (tp + fp)`.
pub fn precision(c: &ConfusionCounts) -> Result<f64, MlError> {
    let denom = c.predicted_positives();
    if denom == 0 {
        return Err(MlError::undefined_metric(
            "precision: no positive predictions (tp + fp = 0)",
        ));
    }
    Ok(c.tp as f64 / denom as f64)
}

/// `tp / (tp + fn)`.
pub fn recall(c: &ConfusionCounts) -> Result<f64, MlError> {
    let denom = c.actual_positives();
    if denom == 0 {
        return Err(MlError::undefined_metric(
            "recall: no positive actuals (tp + fn = 0)",
        ));
    }
    Ok(c.tp as f64 / denom as f64)
}

/// Weighted harmonic mean of precision and recall.
///
/// `(1 + b^2) * p * r / (b^2 * p + r)`. `beta < 1` favours precision.
pub fn fbeta(c: &ConfusionCounts, beta: f64) -> Result<f64, MlError> {
    check_beta(beta)?;
    let p = precision(c)?;
    let r = recall(c)?;
    fbeta_from(p, r, beta)
}

pub(crate) fn fbeta_from(p: f64, r: f64, beta: f64) -> Result<f64, MlError> {
    let b2 = beta * beta;
    let denom = b2 * p + r;
    if denom == 0.0 {
        return Err(MlError::undefined_metric(
            "f-beta: precision and recall are both 0",
        ));
    }
    Ok((1.0 + b2) * (p * r) / denom)
}

pub(crate) fn check_beta(beta: f64) -> Result<(), MlError> {
    if !beta.is_finite() || beta <= 0.0 {
        return Err(MlError::invalid_input(format!(
            "beta must be a positive number, got {beta}"
        )));
    }
    Ok(())
}
