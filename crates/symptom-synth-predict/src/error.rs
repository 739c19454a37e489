//! Prediction errors.

use symptom_synth_core::{ConfigError, DatasetError};
use thiserror::Error;

use crate::artifacts::ArtifactError;

/// Errors from embedding, scoring and training.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Input rejected: need at least {min} non-whitespace characters, got {got}")]
    InputRejected { min: usize, got: usize },

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Feature dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Class index {0} has no label")]
    UnknownClass(usize),

    #[error("No usable training rows")]
    NoTrainingData,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

pub type PredictResult<T> = Result<T, PredictError>;
