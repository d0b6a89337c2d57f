//! End-to-end tests: preparation, benchmark matrix, grid search, feature reduction.

use std::cell::RefCell;

use pretty_assertions::assert_eq;

use donors_ml::config::DonorsConfig;
use donors_ml::data::{CensusFrame, IncomeSummary, LabeledDataset, Preprocessor, train_test_split};
use donors_ml::eval::{ModelComparison, ModelScore};
use donors_ml::interpretability::{rank_features, reduce_to_top_features};
use donors_ml::metrics::{DEFAULT_BETA, FBetaScorer, naive_baseline};
use donors_ml::training::{
    BenchmarkHarness, BenchmarkReport, ConstantClassifier, GridSearch, ParamGrid,
    tiers_from_fractions,
};
use donors_ml::{MlError, Trainable};
use serde_json::json;

/// Splits one column at the midpoint between the two class means.
struct MeanThreshold {
    name: String,
    column: usize,
    width: usize,
    threshold: Option<f64>,
}

impl MeanThreshold {
    fn new(name: &str, column: usize) -> Self {
        Self {
            name: name.to_string(),
            column,
            width: 0,
            threshold: None,
        }
    }
}

impl Trainable for MeanThreshold {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<(), MlError> {
        let mean = |class: u8| {
            let values: Vec<f64> = features
                .iter()
                .zip(labels)
                .filter(|(_, l)| **l == class)
                .map(|(row, _)| row[self.column])
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        };
        match (mean(0), mean(1)) {
            (Some(neg), Some(pos)) => {
                self.threshold = Some((neg + pos) / 2.0);
                self.width = features[0].len();
                Ok(())
            }
            _ => Err(MlError::classifier("training data holds a single class")),
        }
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, MlError> {
        let t = self
            .threshold
            .ok_or_else(|| MlError::classifier("predict before fit"))?;
        Ok(features
            .iter()
            .map(|row| u8::from(row[self.column] >= t))
            .collect())
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.threshold.map(|_| {
            let mut weights = vec![0.0; self.width];
            weights[self.column] = 1.0;
            weights
        })
    }
}

/// Records the row counts it is fitted and queried with.
struct Recorder {
    fitted: Vec<usize>,
    predicted: RefCell<Vec<usize>>,
}

impl Trainable for Recorder {
    fn name(&self) -> &str {
        "Recorder"
    }

    fn fit(&mut self, features: &[Vec<f64>], _labels: &[u8]) -> Result<(), MlError> {
        self.fitted.push(features.len());
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, MlError> {
        self.predicted.borrow_mut().push(features.len());
        Ok(vec![1; features.len()])
    }
}

struct Broken;

impl Trainable for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn fit(&mut self, _features: &[Vec<f64>], _labels: &[u8]) -> Result<(), MlError> {
        Err(MlError::classifier("solver did not converge"))
    }

    fn predict(&self, _features: &[Vec<f64>]) -> Result<Vec<u8>, MlError> {
        Ok(Vec::new())
    }
}

/// `x` values interleaved from both ends so every prefix of 2+ rows holds both classes.
fn interleaved_train(n: usize) -> LabeledDataset {
    let mut xs = Vec::with_capacity(n);
    let (mut lo, mut hi) = (0usize, n - 1);
    while xs.len() < n {
        xs.push(lo as f64);
        if xs.len() < n {
            xs.push(hi as f64);
        }
        lo += 1;
        hi -= 1;
    }
    let half = (n / 2) as f64;
    let labels = xs.iter().map(|&x| u8::from(x >= half)).collect();
    LabeledDataset::new(xs.into_iter().map(|x| vec![x]).collect(), labels).unwrap()
}

fn linear_test(n: usize) -> LabeledDataset {
    let half = (n / 2) as f64;
    LabeledDataset::new(
        (0..n).map(|i| vec![i as f64 + 0.25]).collect(),
        (0..n).map(|i| u8::from(i as f64 + 0.25 >= half)).collect(),
    )
    .unwrap()
}

#[test]
fn run_fits_prefix_and_scores_capped_train_slice() {
    let train = interleaved_train(10);
    let test = linear_test(6);
    let mut recorder = Recorder {
        fitted: Vec::new(),
        predicted: RefCell::new(Vec::new()),
    };
    BenchmarkHarness::default()
        .run(&mut recorder, 3, &train, &test)
        .unwrap();
    assert_eq!(recorder.fitted, vec![3]);
    // test set first, then min(300, 10) training rows
    assert_eq!(*recorder.predicted.borrow(), vec![6, 10]);
}

#[test]
fn run_scores_at_most_train_eval_rows() {
    let train = interleaved_train(500);
    let test = linear_test(60);
    let mut recorder = Recorder {
        fitted: Vec::new(),
        predicted: RefCell::new(Vec::new()),
    };
    let harness = BenchmarkHarness::default();
    harness.run(&mut recorder, 5, &train, &test).unwrap();
    harness.run(&mut recorder, 500, &train, &test).unwrap();
    assert_eq!(recorder.fitted, vec![5, 500]);
    assert_eq!(*recorder.predicted.borrow(), vec![60, 300, 60, 300]);

    recorder.predicted.borrow_mut().clear();
    BenchmarkHarness::new(DEFAULT_BETA, 50)
        .unwrap()
        .run(&mut recorder, 5, &train, &test)
        .unwrap();
    assert_eq!(*recorder.predicted.borrow(), vec![60, 50]);
}

#[test]
fn matrix_covers_every_classifier_and_tier() {
    let train = interleaved_train(20);
    let test = linear_test(20);
    let tiers = tiers_from_fractions(train.len(), &[0.2, 0.5, 1.0]);
    assert_eq!(tiers, vec![4, 10, 20]);

    let mut classifiers: Vec<Box<dyn Trainable>> = vec![
        Box::new(MeanThreshold::new("MeanThreshold", 0)),
        Box::new(ConstantClassifier::new(1).unwrap()),
    ];
    let harness = BenchmarkHarness::default();
    let matrix = harness
        .run_matrix(&mut classifiers, &tiers, &train, &test)
        .unwrap();

    assert_eq!(matrix.len(), 6);
    for tier in 0..3 {
        let threshold = matrix.get("MeanThreshold", tier).unwrap();
        assert_eq!(threshold.sample_size, tiers[tier]);
        assert_eq!(threshold.acc_test, 1.0);
        assert_eq!(threshold.f_test, 1.0);
        let naive = matrix.get("NaivePredictor(1)", tier).unwrap();
        assert_eq!(naive.acc_test, 0.5);
    }
    let (best, _) = matrix.best_by_test_fscore(2).unwrap();
    assert_eq!(best, "MeanThreshold");

    let naive = naive_baseline(test.labels(), 1, DEFAULT_BETA).unwrap();
    let report = BenchmarkReport::new(&harness, tiers, matrix).with_naive(naive);
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["matrix"]["MeanThreshold"]["2"]["f_test"], json!(1.0));
    assert_eq!(json["naive"]["recall"], json!(1.0));
}

#[test]
fn matrix_aborts_on_first_failure() {
    let train = interleaved_train(10);
    let mut classifiers: Vec<Box<dyn Trainable>> = vec![
        Box::new(ConstantClassifier::new(1).unwrap()),
        Box::new(Broken),
    ];
    let err = BenchmarkHarness::default()
        .run_matrix(&mut classifiers, &[5, 10], &train, &train)
        .unwrap_err();
    assert!(matches!(err, MlError::Classifier(m) if m == "solver did not converge"));
}

#[test]
fn collecting_matrix_keeps_going() {
    let train = interleaved_train(10);
    let mut classifiers: Vec<Box<dyn Trainable>> = vec![
        Box::new(Broken),
        Box::new(ConstantClassifier::new(1).unwrap()),
    ];
    let collected = BenchmarkHarness::default()
        .run_matrix_collecting(&mut classifiers, &[0, 10], &train, &train)
        .unwrap();
    assert!(matches!(
        collected["Broken"][&1],
        Err(MlError::Classifier(_))
    ));
    assert!(matches!(
        collected["NaivePredictor(1)"][&0],
        Err(MlError::InvalidSampleSize { .. })
    ));
    assert!(collected["NaivePredictor(1)"][&1].is_ok());
}

#[test]
fn grid_search_picks_best_threshold() {
    struct Fixed {
        threshold: f64,
    }

    impl Trainable for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn fit(&mut self, _features: &[Vec<f64>], _labels: &[u8]) -> Result<(), MlError> {
            Ok(())
        }

        fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, MlError> {
            Ok(features
                .iter()
                .map(|r| u8::from(r[0] >= self.threshold))
                .collect())
        }
    }

    let train = interleaved_train(20);
    let validation = linear_test(20);
    let grid = ParamGrid::new().with_axis("threshold", vec![json!(5.0), json!(10.0), json!(15.0)]);
    let search = GridSearch::new(grid, FBetaScorer::default());
    let outcome = search
        .fit(
            |params| {
                let threshold = params["threshold"]
                    .as_f64()
                    .ok_or_else(|| MlError::invalid_input("threshold must be a number"))?;
                Ok(Fixed { threshold })
            },
            &train,
            &validation,
        )
        .unwrap();

    assert_eq!(outcome.best_estimator.threshold, 10.0);
    assert_eq!(outcome.sweep.trials.len(), 3);
    assert_eq!(outcome.sweep.best_trial, Some(1));
    assert_eq!(outcome.sweep.best().unwrap().score, 1.0);
    assert_eq!(outcome.sweep.classifier, "Fixed");
}

#[test]
fn grid_search_holdout_uses_configured_fraction() {
    let config = DonorsConfig::default();
    let train = interleaved_train(40);
    let grid = ParamGrid::new().with_axis("label", vec![json!(1)]);
    let outcome = GridSearch::new(grid, FBetaScorer::default())
        .fit_holdout(
            |_| ConstantClassifier::new(1),
            &train,
            config.tuning.validation_size,
            config.preprocessing.split_seed,
        )
        .unwrap();
    assert_eq!(outcome.sweep.trials.len(), 1);
    assert_eq!(outcome.best_estimator.label(), 1);
    assert!(outcome.sweep.best().unwrap().score > 0.0);
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn census_frame(n: usize) -> CensusFrame {
    // two well separated age bands, the older band earns more
    let ages: Vec<f64> = (0..n)
        .map(|i| {
            let base = if i % 2 == 0 { 20.0 } else { 50.0 };
            base + (i % 11) as f64
        })
        .collect();
    let gains: Vec<f64> = (0..n)
        .map(|i| if i % 3 == 0 { 5000.0 } else { 0.0 })
        .collect();
    let income: Vec<String> = ages
        .iter()
        .map(|&a| if a >= 50.0 { ">50K" } else { "<=50K" }.to_string())
        .collect();
    let workclass: Vec<String> = (0..n)
        .map(|i| ["Private", "State-gov", "Self-emp"][i % 3].to_string())
        .collect();
    CensusFrame::new()
        .with_numeric("age", ages)
        .with_numeric("capital-gain", gains)
        .with_categorical("workclass", workclass)
        .with_income(income)
}

#[test]
fn prepared_census_flows_through_reduction_and_comparison() {
    let mut config = DonorsConfig::default();
    config.preprocessing.skewed = strings(&["capital-gain"]);
    config.preprocessing.numerical = strings(&["age", "capital-gain"]);
    config.importance.top_k = 1;
    config.validate().unwrap();

    let dataset = Preprocessor::from_config(&config.preprocessing)
        .prepare(census_frame(100))
        .unwrap();
    assert_eq!(dataset.width(), 5);
    assert_eq!(
        dataset.feature_names(),
        &strings(&[
            "age",
            "capital-gain",
            "workclass_Private",
            "workclass_Self-emp",
            "workclass_State-gov",
        ])
    );

    let summary = IncomeSummary::from_labels(dataset.labels()).unwrap();
    assert_eq!(summary.n_records, 100);
    assert_eq!(summary.n_greater_50k, 50);

    let (train, test) = train_test_split(
        &dataset,
        config.preprocessing.test_size,
        config.preprocessing.split_seed,
    )
    .unwrap();
    assert_eq!((train.len(), test.len()), (80, 20));

    let beta = config.evaluation.beta;
    let mut model = MeanThreshold::new("MeanThreshold", 0);
    model.fit(train.features(), train.labels()).unwrap();
    let optimized = ModelScore::evaluate(&model, &test, beta).unwrap();
    assert_eq!(optimized.accuracy, 1.0);

    let importances = model.feature_importances().unwrap();
    let ranking = rank_features(&importances, train.feature_names()).unwrap();
    assert_eq!(ranking[0].name, "age");

    let (rtrain, rtest) =
        reduce_to_top_features(&train, &test, &importances, config.importance.top_k).unwrap();
    assert_eq!(rtrain.width(), 1);
    let mut reduced_model = MeanThreshold::new("MeanThreshold", 0);
    reduced_model
        .fit(rtrain.features(), rtrain.labels())
        .unwrap();
    let reduced = ModelScore::evaluate(&reduced_model, &rtest, beta).unwrap();

    let unoptimized = ModelScore::evaluate(&ConstantClassifier::new(1).unwrap(), &test, beta).unwrap();
    let comparison = ModelComparison::new(unoptimized, optimized).with_reduced(reduced);
    assert!(comparison.improvement().1 > 0.0);
    assert_eq!(comparison.reduction_cost(), Some((0.0, 0.0)));
}
