//! Exhaustive grid search over classifier parameters.

use crate::data::{LabeledDataset, train_test_split};
use crate::error::MlError;
use crate::metrics::FBetaScorer;
use crate::training::Trainable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parameter combination.
pub type ParamSet = BTreeMap<String, serde_json::Value>;

/// Named parameter axes. Axes expand in name order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamGrid {
    pub params: BTreeMap<String, Vec<serde_json::Value>>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, name: &str, values: Vec<serde_json::Value>) -> Self {
        self.params.insert(name.to_string(), values);
        self
    }

    /// Cartesian product of all axes. The last axis varies fastest.
    /// An empty grid yields one empty combination.
    pub fn expand(&self) -> Vec<ParamSet> {
        let mut configs = vec![ParamSet::new()];
        for (key, values) in &self.params {
            let mut new_configs = Vec::with_capacity(configs.len() * values.len());
            for config in &configs {
                for value in values {
                    let mut c = config.clone();
                    c.insert(key.clone(), value.clone());
                    new_configs.push(c);
                }
            }
            configs = new_configs;
        }
        configs
    }
}

/// A single scored candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepTrial {
    pub trial_number: usize,
    pub params: ParamSet,
    pub score: f64,
}

/// Record of a completed sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HyperparamSweep {
    pub id: String,
    pub classifier: String,
    pub scorer: FBetaScorer,
    pub trials: Vec<SweepTrial>,
    pub best_trial: Option<usize>,
}

impl HyperparamSweep {
    pub fn new(classifier: &str, scorer: FBetaScorer) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            classifier: classifier.to_string(),
            scorer,
            trials: Vec::new(),
            best_trial: None,
        }
    }

    pub fn best(&self) -> Option<&SweepTrial> {
        self.best_trial.and_then(|i| self.trials.get(i))
    }
}

/// The winning classifier, already fitted, plus the sweep record.
pub struct GridSearchOutcome<C> {
    pub best_estimator: C,
    pub sweep: HyperparamSweep,
}

/// Fits one candidate per grid point and keeps the best scorer.
#[derive(Debug, Clone)]
pub struct GridSearch {
    pub grid: ParamGrid,
    pub scorer: FBetaScorer,
}

impl GridSearch {
    pub fn new(grid: ParamGrid, scorer: FBetaScorer) -> Self {
        Self { grid, scorer }
    }

    /// Build each candidate with `factory`, fit on `train`, score on
    /// `validation`. Ties keep the earlier candidate. Any failure aborts.
    pub fn fit<C, F>(
        &self,
        mut factory: F,
        train: &LabeledDataset,
        validation: &LabeledDataset,
    ) -> Result<GridSearchOutcome<C>, MlError>
    where
        C: Trainable,
        F: FnMut(&ParamSet) -> Result<C, MlError>,
    {
        let candidates = self.grid.expand();
        let mut best: Option<(f64, C)> = None;
        let mut sweep: Option<HyperparamSweep> = None;

        for (trial_number, params) in candidates.into_iter().enumerate() {
            let mut candidate = factory(&params)?;
            candidate.fit(train.features(), train.labels())?;
            let predicted = candidate.predict(validation.features())?;
            let score = self.scorer.score(validation.labels(), &predicted)?;
            tracing::debug!(trial_number, score, params = ?params, "Grid candidate scored");

            let sweep =
                sweep.get_or_insert_with(|| HyperparamSweep::new(candidate.name(), self.scorer));
            sweep.trials.push(SweepTrial {
                trial_number,
                params,
                score,
            });
            if best.as_ref().is_none_or(|(s, _)| score > *s) {
                sweep.best_trial = Some(trial_number);
                best = Some((score, candidate));
            }
        }

        match (best, sweep) {
            (Some((score, best_estimator)), Some(sweep)) => {
                tracing::info!(
                    classifier = %sweep.classifier,
                    trials = sweep.trials.len(),
                    score,
                    "Grid search complete"
                );
                Ok(GridSearchOutcome {
                    best_estimator,
                    sweep,
                })
            }
            _ => Err(MlError::empty_input("grid search produced no candidates")),
        }
    }

    /// Hold out `validation_size` of `train` (seeded shuffle) for scoring,
    /// then search as in [`fit`](Self::fit). The best estimator is fitted on
    /// the remaining rows only.
    pub fn fit_holdout<C, F>(
        &self,
        factory: F,
        train: &LabeledDataset,
        validation_size: f64,
        seed: u64,
    ) -> Result<GridSearchOutcome<C>, MlError>
    where
        C: Trainable,
        F: FnMut(&ParamSet) -> Result<C, MlError>,
    {
        let (fit_rows, validation) = train_test_split(train, validation_size, seed)?;
        self.fit(factory, &fit_rows, &validation)
    }
}
