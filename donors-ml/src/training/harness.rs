//! Benchmark harness: timed fit/predict at training-set tiers.

use crate::config::DonorsConfig;
use crate::data::LabeledDataset;
use crate::error::MlError;
use crate::metrics::{self, MetricReport};
use crate::training::Trainable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

/// Outcome of one (classifier, tier) run. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub sample_size: usize,
    pub train_time_secs: f64,
    pub pred_time_secs: f64,
    /// Accuracy on the leading training rows.
    pub acc_train: f64,
    /// F-beta on the leading training rows.
    pub f_train: f64,
    pub acc_test: f64,
    pub f_test: f64,
}

/// Results keyed by classifier name, then tier index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkMatrix(pub BTreeMap<String, BTreeMap<usize, BenchmarkResult>>);

impl BenchmarkMatrix {
    pub fn get(&self, classifier: &str, tier: usize) -> Option<&BenchmarkResult> {
        self.0.get(classifier).and_then(|tiers| tiers.get(&tier))
    }

    /// Total number of (classifier, tier) entries.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn classifiers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Classifier with the highest test F-beta at `tier`.
    pub fn best_by_test_fscore(&self, tier: usize) -> Option<(&str, &BenchmarkResult)> {
        self.0
            .iter()
            .filter_map(|(name, tiers)| tiers.get(&tier).map(|r| (name.as_str(), r)))
            .max_by(|a, b| {
                a.1.f_test
                    .partial_cmp(&b.1.f_test)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Per-pair outcomes when failures are collected instead of aborting.
pub type CollectedMatrix = BTreeMap<String, BTreeMap<usize, Result<BenchmarkResult, MlError>>>;

/// Training-set sizes for each fraction: `floor(n * fraction)`.
///
/// Fractions are expected in (0, 1], as enforced by
/// [`DonorsConfig::validate`]. Anything else truncates to a meaningless tier.
pub fn tiers_from_fractions(n: usize, fractions: &[f64]) -> Vec<usize> {
    fractions.iter().map(|f| (n as f64 * f) as usize).collect()
}

/// Drives classifiers through fit/predict cycles and scores them.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    beta: f64,
    train_eval_rows: usize,
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self {
            beta: metrics::DEFAULT_BETA,
            train_eval_rows: 300,
        }
    }
}

impl BenchmarkHarness {
    pub fn new(beta: f64, train_eval_rows: usize) -> Result<Self, MlError> {
        metrics::score::check_beta(beta)?;
        if train_eval_rows == 0 {
            return Err(MlError::invalid_input("train_eval_rows must be > 0"));
        }
        Ok(Self {
            beta,
            train_eval_rows,
        })
    }

    /// Validates the whole config before building the harness.
    pub fn from_config(config: &DonorsConfig) -> Result<Self, MlError> {
        config.validate()?;
        Self::new(config.evaluation.beta, config.benchmark.train_eval_rows)
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn train_eval_rows(&self) -> usize {
        self.train_eval_rows
    }

    /// Fit on the first `sample_size` training rows, then score on the full
    /// test set and on the first `min(train_eval_rows, len(train))` training rows.
    ///
    /// Classifier and metric errors are returned unchanged.
    pub fn run<C: Trainable + ?Sized>(
        &self,
        classifier: &mut C,
        sample_size: usize,
        train: &LabeledDataset,
        test: &LabeledDataset,
    ) -> Result<BenchmarkResult, MlError> {
        if sample_size == 0 || sample_size > train.len() {
            return Err(MlError::InvalidSampleSize {
                sample_size,
                available: train.len(),
            });
        }

        let fit_rows = train.head(sample_size);
        let start = Instant::now();
        classifier.fit(fit_rows.features, fit_rows.labels)?;
        let train_time_secs = start.elapsed().as_secs_f64();

        let eval_rows = train.head(self.train_eval_rows);
        let start = Instant::now();
        let predictions_test = classifier.predict(test.features())?;
        let predictions_train = classifier.predict(eval_rows.features)?;
        let pred_time_secs = start.elapsed().as_secs_f64();

        let train_report = MetricReport::evaluate(eval_rows.labels, &predictions_train, self.beta)?;
        let test_report = MetricReport::evaluate(test.labels(), &predictions_test, self.beta)?;

        tracing::info!("{} trained on {} samples.", classifier.name(), sample_size);
        tracing::debug!(
            classifier = classifier.name(),
            train_time_secs,
            pred_time_secs,
            f_test = test_report.fbeta,
            "Benchmark run complete"
        );

        Ok(BenchmarkResult {
            sample_size,
            train_time_secs,
            pred_time_secs,
            acc_train: train_report.accuracy,
            f_train: train_report.fbeta,
            acc_test: test_report.accuracy,
            f_test: test_report.fbeta,
        })
    }

    /// Run every classifier at every tier, classifiers in the given order and
    /// tiers in the given order. The same instance is re-fitted per tier.
    ///
    /// Aborts on the first failing pair.
    pub fn run_matrix(
        &self,
        classifiers: &mut [Box<dyn Trainable>],
        tiers: &[usize],
        train: &LabeledDataset,
        test: &LabeledDataset,
    ) -> Result<BenchmarkMatrix, MlError> {
        check_unique_names(classifiers)?;
        let mut matrix = BTreeMap::new();
        for classifier in classifiers.iter_mut() {
            let mut by_tier = BTreeMap::new();
            for (i, &samples) in tiers.iter().enumerate() {
                by_tier.insert(i, self.run(&mut **classifier, samples, train, test)?);
            }
            matrix.insert(classifier.name().to_string(), by_tier);
        }
        Ok(BenchmarkMatrix(matrix))
    }

    /// Like [`run_matrix`](Self::run_matrix), but records each pair's
    /// outcome and keeps going after a failure.
    pub fn run_matrix_collecting(
        &self,
        classifiers: &mut [Box<dyn Trainable>],
        tiers: &[usize],
        train: &LabeledDataset,
        test: &LabeledDataset,
    ) -> Result<CollectedMatrix, MlError> {
        check_unique_names(classifiers)?;
        let mut matrix = BTreeMap::new();
        for classifier in classifiers.iter_mut() {
            let mut by_tier = BTreeMap::new();
            for (i, &samples) in tiers.iter().enumerate() {
                let outcome = self.run(&mut **classifier, samples, train, test);
                if let Err(e) = &outcome {
                    tracing::warn!(
                        classifier = classifier.name(),
                        tier = i,
                        error = %e,
                        "Benchmark pair failed"
                    );
                }
                by_tier.insert(i, outcome);
            }
            matrix.insert(classifier.name().to_string(), by_tier);
        }
        Ok(matrix)
    }
}

fn check_unique_names(classifiers: &[Box<dyn Trainable>]) -> Result<(), MlError> {
    let mut seen = HashSet::new();
    for c in classifiers {
        if !seen.insert(c.name()) {
            return Err(MlError::invalid_input(format!(
                "duplicate classifier name '{}'",
                c.name()
            )));
        }
    }
    Ok(())
}

/// Everything handed to a reporting sink after a benchmark session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_at: DateTime<Utc>,
    pub beta: f64,
    pub train_eval_rows: usize,
    pub tiers: Vec<usize>,
    pub naive: Option<MetricReport>,
    pub matrix: BenchmarkMatrix,
}

impl BenchmarkReport {
    pub fn new(harness: &BenchmarkHarness, tiers: Vec<usize>, matrix: BenchmarkMatrix) -> Self {
        Self {
            generated_at: Utc::now(),
            beta: harness.beta,
            train_eval_rows: harness.train_eval_rows,
            tiers,
            naive: None,
            matrix,
        }
    }

    pub fn with_naive(mut self, naive: MetricReport) -> Self {
        self.naive = Some(naive);
        self
    }

    pub fn to_json(&self) -> Result<String, MlError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
