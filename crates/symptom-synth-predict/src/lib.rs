//! Embedding, classification and translation behind symptom predictions.
//!
//! This crate turns a free-text symptom description into ranked disease
//! predictions. The ML collaborators sit behind the [`Embedder`],
//! [`Classifier`] and [`Translator`] traits; the built-in implementations
//! are a feature-hashing embedder and a nearest-centroid classifier trained
//! from a generated dataset. Training and prediction both run text through
//! the canonical language first.
//!
//! Features:
//! - `http-translate` (on by default) adds [`HttpTranslator`] for
//!   LibreTranslate-compatible servers.
//! - `onnx-embeddings` adds `OnnxEmbedder`, a multilingual sentence-embedding
//!   model run with ONNX Runtime.

pub mod artifacts;
pub mod augment;
pub mod classifier;
pub mod config;
pub mod embedder;
pub mod error;
pub mod evaluation;
pub mod explain;
pub mod presentation;
pub mod service;
pub mod traits;
pub mod training;
pub mod translate;

pub use artifacts::{load_or_train, ArtifactError, ModelArtifacts};
pub use config::PredictorConfig;
pub use embedder::{EmbedderSpec, HashingEmbedder, ModelEmbedder};
pub use error::{PredictError, PredictResult};
pub use evaluation::{ClassScores, ClassificationReport};
pub use explain::{ExplainOptions, Explanation, TokenWeight};
pub use presentation::{build_report, render_page, validate_input, Report};
pub use service::{Prediction, PredictionService, RankedLabel};
pub use traits::{Classifier, Embedder, Translator};
pub use training::{train, TrainingMetrics, TrainingOptions};
pub use translate::{LexiconTranslator, TranslateError};

#[cfg(feature = "http-translate")]
pub use translate::HttpTranslator;

#[cfg(feature = "onnx-embeddings")]
pub use embedder::OnnxEmbedder;
