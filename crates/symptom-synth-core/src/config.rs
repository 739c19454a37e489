//! Generator configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::DEFAULT_DISEASES;
use crate::generator::OverlapMetric;
use crate::models::Language;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything that shapes a generation run.
///
/// Two runs with equal configs (and the same catalog) write byte-identical
/// datasets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Diseases to generate, in output order
    pub diseases: Vec<String>,
    /// Target accepted samples per disease
    pub per_disease: usize,
    /// Overlap ratio at or above which a candidate is a near-duplicate
    pub max_overlap: f64,
    /// Retry budget multiplier: a disease gives up after `per_disease * max_tries` attempts
    pub max_tries: usize,
    /// Seed for the pseudo-random source
    pub seed: u64,
    /// First sample identifier
    pub id_base: u64,
    /// Languages sampled uniformly per sample
    pub languages: Vec<Language>,
    /// How token overlap is measured
    pub overlap_metric: OverlapMetric,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            diseases: DEFAULT_DISEASES.iter().map(|d| d.to_string()).collect(),
            per_disease: 200,
            max_overlap: 0.8,
            max_tries: 50,
            seed: 42,
            id_base: 16914,
            languages: vec![Language::Bn],
            overlap_metric: OverlapMetric::PriorCoverage,
        }
    }
}

impl GeneratorConfig {
    /// Load from JSON; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a dataset.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.diseases.is_empty() {
            return Err(ConfigError::Invalid("disease list is empty".into()));
        }
        if self.languages.is_empty() {
            return Err(ConfigError::Invalid("language list is empty".into()));
        }
        if self.per_disease == 0 {
            return Err(ConfigError::Invalid("per_disease must be >= 1".into()));
        }
        if self.max_tries == 0 {
            return Err(ConfigError::Invalid("max_tries must be >= 1".into()));
        }
        if !(self.max_overlap > 0.0 && self.max_overlap <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "max_overlap must be in (0, 1], got {}",
                self.max_overlap
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for disease in &self.diseases {
            if !seen.insert(disease.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate disease: {}", disease)));
            }
        }
        Ok(())
    }

    /// Attempts allowed for one disease before giving up.
    pub fn retry_budget(&self) -> usize {
        self.per_disease.saturating_mul(self.max_tries)
    }
}
