//! Configuration for donors-ml.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment -> explicit overrides. The workspace
//! file lives at `.donors/config.toml`.

use crate::error::MlError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonorsConfig {
    /// Metric settings shared by every scorer.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Benchmark harness settings.
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    /// Feature preparation settings.
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,
    /// Grid search settings.
    #[serde(default)]
    pub tuning: TuningConfig,
    /// Feature importance settings.
    #[serde(default)]
    pub importance: ImportanceConfig,
}

/// Metric settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// F-beta weight. Values below 1 favour precision.
    #[serde(default = "default_beta")]
    pub beta: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            beta: default_beta(),
        }
    }
}

fn default_beta() -> f64 {
    0.5
}

/// Benchmark harness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Number of leading training rows scored after each fit.
    #[serde(default = "default_train_eval_rows")]
    pub train_eval_rows: usize,
    /// Training-set fractions that define the sample-size tiers.
    #[serde(default = "default_tier_fractions")]
    pub tier_fractions: Vec<f64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            train_eval_rows: default_train_eval_rows(),
            tier_fractions: default_tier_fractions(),
        }
    }
}

fn default_train_eval_rows() -> usize {
    300
}

fn default_tier_fractions() -> Vec<f64> {
    vec![0.01, 0.1, 1.0]
}

/// Feature preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Heavily skewed columns that receive `ln(x + 1)`.
    #[serde(default = "default_skewed")]
    pub skewed: Vec<String>,
    /// Numeric columns rescaled to [0, 1].
    #[serde(default = "default_numerical")]
    pub numerical: Vec<String>,
    /// Fraction of rows held out for testing.
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    /// Seed for the train/test shuffle.
    #[serde(default)]
    pub split_seed: u64,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            skewed: default_skewed(),
            numerical: default_numerical(),
            test_size: default_test_size(),
            split_seed: 0,
        }
    }
}

fn default_skewed() -> Vec<String> {
    vec!["capital-gain".to_string(), "capital-loss".to_string()]
}

fn default_numerical() -> Vec<String> {
    [
        "age",
        "education-num",
        "capital-gain",
        "capital-loss",
        "hours-per-week",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_test_size() -> f64 {
    0.2
}

/// Grid search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Fraction of the training set held back to score grid candidates.
    #[serde(default = "default_validation_size")]
    pub validation_size: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            validation_size: default_validation_size(),
        }
    }
}

fn default_validation_size() -> f64 {
    0.25
}

/// Feature importance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceConfig {
    /// How many top-ranked features the reduced model keeps.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ImportanceConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

impl DonorsConfig {
    /// Reject settings no operation can run with.
    pub fn validate(&self) -> Result<(), MlError> {
        let beta = self.evaluation.beta;
        if !beta.is_finite() || beta <= 0.0 {
            return Err(MlError::config(format!(
                "evaluation.beta must be a positive number, got {beta}"
            )));
        }
        if self.benchmark.train_eval_rows == 0 {
            return Err(MlError::config("benchmark.train_eval_rows must be > 0"));
        }
        if self.benchmark.tier_fractions.is_empty() {
            return Err(MlError::config("benchmark.tier_fractions is empty"));
        }
        if let Some(f) = self
            .benchmark
            .tier_fractions
            .iter()
            .find(|f| !(**f > 0.0 && **f <= 1.0))
        {
            return Err(MlError::config(format!(
                "benchmark.tier_fractions entries must be in (0, 1], got {f}"
            )));
        }
        for (name, value) in [
            ("preprocessing.test_size", self.preprocessing.test_size),
            ("tuning.validation_size", self.tuning.validation_size),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(MlError::config(format!(
                    "{name} must be in (0, 1), got {value}"
                )));
            }
        }
        if self.importance.top_k == 0 {
            return Err(MlError::config("importance.top_k must be > 0"));
        }
        Ok(())
    }
}

fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".donors").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `DONORS_`)
/// 3. Workspace-local config (`.donors/config.toml`)
/// 4. User config (`~/.config/donors-ml/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&DonorsConfig>,
) -> Result<DonorsConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(DonorsConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("org", "charityml", "donors-ml") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // DONORS_EVALUATION__BETA, DONORS_BENCHMARK__TRAIN_EVAL_ROWS, ...
    figment = figment.merge(Env::prefixed("DONORS_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Write `config` to `<workspace>/.donors/config.toml`, returning the path.
pub fn save_config(workspace: &Path, config: &DonorsConfig) -> Result<PathBuf, MlError> {
    let path = workspace_config_path(workspace);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| MlError::config(format!("failed to encode config: {e}")))?;
    std::fs::write(&path, content)?;
    Ok(path)
}
