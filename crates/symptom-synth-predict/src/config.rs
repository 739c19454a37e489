//! Predictor configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use symptom_synth_core::ConfigError;

use crate::explain::ExplainOptions;
use crate::training::TrainingOptions;

/// Where the model lives and how predictions are made.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictorConfig {
    /// Directory holding the model artifacts
    pub model_dir: PathBuf,
    /// Dataset used for training and for per-disease insights
    pub dataset_path: PathBuf,
    /// Labels returned per prediction
    pub top_k: usize,
    /// Language the model was trained on
    pub canonical_language: String,
    /// LibreTranslate-compatible endpoint; offline detection when unset
    pub translate_url: Option<String>,
    /// Seconds before a translation request is abandoned
    pub translate_timeout_secs: u64,
    /// Used only when training
    pub training: TrainingOptions,
    /// Word-weight explanations for the top prediction
    pub explain: ExplainOptions,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
            dataset_path: PathBuf::from("synthetic_data.csv"),
            top_k: 3,
            canonical_language: "en".into(),
            translate_url: None,
            translate_timeout_secs: 10,
            training: TrainingOptions::default(),
            explain: ExplainOptions::default(),
        }
    }
}

impl PredictorConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be >= 1".into()));
        }
        if self.canonical_language.trim().is_empty() {
            return Err(ConfigError::Invalid("canonical_language is empty".into()));
        }
        if self.explain.kernel_width <= 0.0 {
            return Err(ConfigError::Invalid("explain.kernel_width must be > 0".into()));
        }
        if self.explain.alpha <= 0.0 {
            return Err(ConfigError::Invalid("explain.alpha must be > 0".into()));
        }
        self.training.validate()
    }
}
