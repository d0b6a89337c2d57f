//! Feature importance ranking and top-k feature reduction.

use crate::data::LabeledDataset;
use crate::error::MlError;
use serde::{Deserialize, Serialize};

/// One feature's weight in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub index: usize,
    pub name: String,
    pub weight: f64,
}

/// Features sorted by descending weight; ties keep column order.
pub fn rank_features(
    importances: &[f64],
    names: &[String],
) -> Result<Vec<FeatureImportance>, MlError> {
    if importances.len() != names.len() {
        return Err(MlError::shape_mismatch(format!(
            "{} importances for {} feature names",
            importances.len(),
            names.len()
        )));
    }
    Ok(top_k_indices(importances, importances.len())
        .into_iter()
        .map(|index| FeatureImportance {
            index,
            name: names[index].clone(),
            weight: importances[index],
        })
        .collect())
}

/// Column indices of the `k` largest weights, largest first.
pub fn top_k_indices(importances: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..importances.len()).collect();
    // stable sort: equal weights keep column order
    order.sort_by(|&a, &b| {
        importances[b]
            .partial_cmp(&importances[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(k);
    order
}

/// Share of the total weight held by the first `k` ranked features.
pub fn cumulative_weight(ranking: &[FeatureImportance], k: usize) -> Result<f64, MlError> {
    let total: f64 = ranking.iter().map(|f| f.weight).sum();
    if total == 0.0 {
        return Err(MlError::undefined_metric(
            "cumulative weight: importances sum to 0",
        ));
    }
    Ok(ranking.iter().take(k).map(|f| f.weight).sum::<f64>() / total)
}

/// Train and test datasets restricted to the `k` most important columns.
pub fn reduce_to_top_features(
    train: &LabeledDataset,
    test: &LabeledDataset,
    importances: &[f64],
    k: usize,
) -> Result<(LabeledDataset, LabeledDataset), MlError> {
    if importances.len() != train.width() || train.width() != test.width() {
        return Err(MlError::shape_mismatch(format!(
            "{} importances, train width {}, test width {}",
            importances.len(),
            train.width(),
            test.width()
        )));
    }
    if k == 0 {
        return Err(MlError::invalid_input("cannot reduce to zero features"));
    }
    let keep = top_k_indices(importances, k);
    tracing::debug!(kept = ?keep, "Reducing to top features");
    Ok((train.select_columns(&keep)?, test.select_columns(&keep)?))
}
