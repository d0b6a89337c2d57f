//! Raw census columns before encoding, and the income summary.

use crate::error::MlError;
use serde::{Deserialize, Serialize};

/// Income label for "at most $50,000".
pub const INCOME_AT_MOST_50K: &str = "<=50K";
/// Income label for "more than $50,000".
pub const INCOME_GREATER_50K: &str = ">50K";

/// Column-oriented census records with the income target split out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CensusFrame {
    pub numeric: Vec<(String, Vec<f64>)>,
    pub categorical: Vec<(String, Vec<String>)>,
    pub income: Vec<String>,
}

impl CensusFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric(mut self, name: &str, values: Vec<f64>) -> Self {
        self.numeric.push((name.to_string(), values));
        self
    }

    pub fn with_categorical(mut self, name: &str, values: Vec<String>) -> Self {
        self.categorical.push((name.to_string(), values));
        self
    }

    pub fn with_income(mut self, income: Vec<String>) -> Self {
        self.income = income;
        self
    }

    pub fn len(&self) -> usize {
        self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
    }

    /// Every column must have one value per income entry, and names must be unique.
    pub fn validate(&self) -> Result<(), MlError> {
        let rows = self.len();
        let mut seen = std::collections::HashSet::new();
        let lengths = self
            .numeric
            .iter()
            .map(|(n, v)| (n, v.len()))
            .chain(self.categorical.iter().map(|(n, v)| (n, v.len())));
        for (name, len) in lengths {
            if !seen.insert(name.as_str()) {
                return Err(MlError::dataset(format!("duplicate column '{name}'")));
            }
            if len != rows {
                return Err(MlError::shape_mismatch(format!(
                    "column '{name}' has {len} values, expected {rows}"
                )));
            }
        }
        Ok(())
    }

    pub fn numeric_column_mut(&mut self, name: &str) -> Option<&mut Vec<f64>> {
        self.numeric
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        self.numeric
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }
}

/// Map raw income strings to labels: `<=50K` -> 0, `>50K` -> 1.
pub fn encode_income(raw: &[String]) -> Result<Vec<u8>, MlError> {
    raw.iter()
        .enumerate()
        .map(|(i, value)| match value.trim() {
            INCOME_AT_MOST_50K => Ok(0),
            INCOME_GREATER_50K => Ok(1),
            other => Err(MlError::dataset(format!(
                "unrecognized income value '{other}' at row {i}"
            ))),
        })
        .collect()
}

/// Class balance of the income target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub n_records: usize,
    pub n_greater_50k: usize,
    pub n_at_most_50k: usize,
    /// Share of records above $50,000, in [0, 1].
    pub greater_percent: f64,
}

impl IncomeSummary {
    pub fn from_labels(labels: &[u8]) -> Result<Self, MlError> {
        if labels.is_empty() {
            return Err(MlError::empty_input("income summary of zero records"));
        }
        let n_greater_50k = labels.iter().filter(|&&l| l == 1).count();
        let n_records = labels.len();
        Ok(Self {
            n_records,
            n_greater_50k,
            n_at_most_50k: n_records - n_greater_50k,
            greater_percent: n_greater_50k as f64 / n_records as f64,
        })
    }
}
