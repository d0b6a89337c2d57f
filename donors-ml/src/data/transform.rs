//! Feature transformation pipeline: skew correction, min-max scaling, one-hot encoding.

use crate::config::PreprocessingConfig;
use crate::data::dataset::LabeledDataset;
use crate::data::frame::{CensusFrame, encode_income};
use crate::error::MlError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A transformation step over numeric columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformStep {
    /// `x -> ln(x + 1)`.
    Log1p { columns: Vec<String> },
    /// Rescale to [0, 1] using the column's own min and max.
    MinMax { columns: Vec<String> },
}

/// A pipeline of transformation steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformPipeline {
    pub steps: Vec<TransformStep>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step(mut self, step: TransformStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Apply the pipeline to a frame.
    pub fn apply(&self, mut frame: CensusFrame) -> Result<CensusFrame, MlError> {
        for step in &self.steps {
            frame = apply_step(frame, step)?;
        }
        Ok(frame)
    }
}

fn apply_step(frame: CensusFrame, step: &TransformStep) -> Result<CensusFrame, MlError> {
    match step {
        TransformStep::Log1p { columns } => log1p_columns(frame, columns),
        TransformStep::MinMax { columns } => MinMaxScaler::fit(&frame, columns)?.transform(frame),
    }
}

/// Replace each value `x` of the named columns with `ln(x + 1)`.
pub fn log1p_columns(mut frame: CensusFrame, columns: &[String]) -> Result<CensusFrame, MlError> {
    for name in columns {
        let values = frame
            .numeric_column_mut(name)
            .ok_or_else(|| MlError::dataset(format!("no numeric column '{name}'")))?;
        if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| **v < -1.0) {
            return Err(MlError::dataset(format!(
                "log1p of {v} at row {i} of '{name}' is undefined"
            )));
        }
        for v in values.iter_mut() {
            *v = v.ln_1p();
        }
        tracing::debug!(column = %name, "Applied log1p transform");
    }
    Ok(frame)
}

/// Observed range of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    fn scale(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 { 0.0 } else { (v - self.min) / span }
    }
}

/// Min-max scaler fitted on named numeric columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub ranges: Vec<(String, ColumnRange)>,
}

impl MinMaxScaler {
    pub fn fit(frame: &CensusFrame, columns: &[String]) -> Result<Self, MlError> {
        let mut ranges = Vec::with_capacity(columns.len());
        for name in columns {
            let values = frame
                .numeric_column(name)
                .ok_or_else(|| MlError::dataset(format!("no numeric column '{name}'")))?;
            if values.is_empty() {
                return Err(MlError::empty_input(format!(
                    "cannot fit scaler on empty column '{name}'"
                )));
            }
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            ranges.push((name.clone(), ColumnRange { min, max }));
        }
        Ok(Self { ranges })
    }

    pub fn transform(&self, mut frame: CensusFrame) -> Result<CensusFrame, MlError> {
        for (name, range) in &self.ranges {
            let values = frame
                .numeric_column_mut(name)
                .ok_or_else(|| MlError::dataset(format!("no numeric column '{name}'")))?;
            for v in values.iter_mut() {
                *v = range.scale(*v);
            }
        }
        Ok(frame)
    }
}

/// Expand categorical columns into 0/1 indicator columns.
///
/// Numeric columns come first in frame order, followed by one
/// `<column>_<value>` column per distinct value, values sorted per column.
pub fn one_hot(frame: &CensusFrame) -> Result<(Vec<String>, Vec<Vec<f64>>), MlError> {
    frame.validate()?;
    let rows = frame.len();

    let mut names: Vec<String> = frame.numeric.iter().map(|(n, _)| n.clone()).collect();
    let vocabularies: Vec<Vec<&str>> = frame
        .categorical
        .iter()
        .map(|(_, values)| {
            values
                .iter()
                .map(|v| v.trim())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
        .collect();
    for ((column, _), vocab) in frame.categorical.iter().zip(&vocabularies) {
        names.extend(vocab.iter().map(|value| format!("{column}_{value}")));
    }

    let mut matrix = Vec::with_capacity(rows);
    for r in 0..rows {
        let mut row = Vec::with_capacity(names.len());
        row.extend(frame.numeric.iter().map(|(_, values)| values[r]));
        for ((_, values), vocab) in frame.categorical.iter().zip(&vocabularies) {
            let cell = values[r].trim();
            row.extend(vocab.iter().map(|v| if *v == cell { 1.0 } else { 0.0 }));
        }
        matrix.push(row);
    }

    tracing::debug!(features = names.len(), "One-hot encoded features");
    Ok((names, matrix))
}

/// The full preparation stage: log transform, scaling, encoding, labels.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    pub pipeline: TransformPipeline,
}

impl Preprocessor {
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        let pipeline = TransformPipeline::new()
            .add_step(TransformStep::Log1p {
                columns: config.skewed.clone(),
            })
            .add_step(TransformStep::MinMax {
                columns: config.numerical.clone(),
            });
        Self { pipeline }
    }

    pub fn prepare(&self, frame: CensusFrame) -> Result<LabeledDataset, MlError> {
        frame.validate()?;
        let labels = encode_income(&frame.income)?;
        let frame = self.pipeline.apply(frame)?;
        let (names, features) = one_hot(&frame)?;
        tracing::info!(
            "{} total features after one-hot encoding, {} records",
            names.len(),
            labels.len()
        );
        LabeledDataset::new(features, labels)?.with_feature_names(names)
    }
}
