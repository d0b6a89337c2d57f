//! Immutable labeled feature matrix.

use crate::error::MlError;
use serde::{Deserialize, Serialize};

/// Feature rows paired 1:1 with binary labels.
///
/// Invariants, checked on construction: one label per row, every row has
/// the same width, labels are 0 (income <= 50K) or 1 (income > 50K), and
/// feature names, when present, match the width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLabeledDataset")]
pub struct LabeledDataset {
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    labels: Vec<u8>,
}

/// Unchecked wire form; deserialization goes through [`LabeledDataset::new`].
#[derive(Deserialize)]
struct RawLabeledDataset {
    #[serde(default)]
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    labels: Vec<u8>,
}

impl TryFrom<RawLabeledDataset> for LabeledDataset {
    type Error = MlError;

    fn try_from(raw: RawLabeledDataset) -> Result<Self, Self::Error> {
        let dataset = Self::new(raw.features, raw.labels)?;
        if raw.feature_names.is_empty() {
            Ok(dataset)
        } else {
            dataset.with_feature_names(raw.feature_names)
        }
    }
}

/// A borrowed, order-preserving run of rows.
#[derive(Debug, Clone, Copy)]
pub struct DatasetView<'a> {
    pub features: &'a [Vec<f64>],
    pub labels: &'a [u8],
}

impl DatasetView<'_> {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl LabeledDataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<u8>) -> Result<Self, MlError> {
        if features.len() != labels.len() {
            return Err(MlError::shape_mismatch(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if let Some(first) = features.first() {
            let width = first.len();
            if let Some((i, row)) = features.iter().enumerate().find(|(_, r)| r.len() != width) {
                return Err(MlError::shape_mismatch(format!(
                    "row {i} has {} features, expected {width}",
                    row.len()
                )));
            }
        }
        if let Some((i, label)) = labels.iter().enumerate().find(|(_, l)| **l > 1) {
            return Err(MlError::dataset(format!(
                "label {label} at row {i} is outside {{0, 1}}"
            )));
        }
        Ok(Self {
            feature_names: Vec::new(),
            features,
            labels,
        })
    }

    /// Attach column names. Their count must equal the feature width.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self, MlError> {
        if !self.features.is_empty() && names.len() != self.width() {
            return Err(MlError::shape_mismatch(format!(
                "{} feature names for {} features",
                names.len(),
                self.width()
            )));
        }
        self.feature_names = names;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of features per row.
    pub fn width(&self) -> usize {
        self.features
            .first()
            .map(Vec::len)
            .unwrap_or(self.feature_names.len())
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn view(&self) -> DatasetView<'_> {
        self.head(self.len())
    }

    /// The first `min(n, len)` rows.
    pub fn head(&self, n: usize) -> DatasetView<'_> {
        let n = n.min(self.len());
        DatasetView {
            features: &self.features[..n],
            labels: &self.labels[..n],
        }
    }

    /// Copy the rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Result<Self, MlError> {
        let mut features = Vec::with_capacity(indices.len());
        let mut labels = Vec::with_capacity(indices.len());
        for &i in indices {
            let (row, label) = self
                .features
                .get(i)
                .zip(self.labels.get(i))
                .ok_or_else(|| {
                    MlError::invalid_input(format!("row {i} out of range ({} rows)", self.len()))
                })?;
            features.push(row.clone());
            labels.push(*label);
        }
        Ok(Self {
            feature_names: self.feature_names.clone(),
            features,
            labels,
        })
    }

    /// Keep only the columns at `indices`, in that order.
    pub fn select_columns(&self, indices: &[usize]) -> Result<Self, MlError> {
        let width = self.width();
        if let Some(bad) = indices.iter().find(|&&i| i >= width) {
            return Err(MlError::invalid_input(format!(
                "column {bad} out of range ({width} columns)"
            )));
        }
        let features = self
            .features
            .iter()
            .map(|row| indices.iter().map(|&i| row[i]).collect())
            .collect();
        let feature_names = if self.feature_names.is_empty() {
            Vec::new()
        } else {
            indices
                .iter()
                .map(|&i| self.feature_names[i].clone())
                .collect()
        };
        Ok(Self {
            feature_names,
            features,
            labels: self.labels.clone(),
        })
    }

    /// Number of rows labeled 1.
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }
}
