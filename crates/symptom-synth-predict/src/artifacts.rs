//! Model artifacts on disk.
//!
//! A model directory holds one JSON file per component. `metrics.json` is
//! optional; the other four must all be present for the model to load.
//! Alongside the metrics, `classification_report.csv` and
//! `confusion_matrix.csv` carry the per-class validation scores.
//! `embedder.json` records the embedder kind (`hashing` or `onnx`), so a
//! model is always scored with the embedder it was trained with.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use symptom_synth_core::dataset::read_csv_file;
use thiserror::Error;
use tracing::{info, warn};

use crate::classifier::{CentroidClassifier, FeatureScaler, LabelEncoder, ScaledClassifier};
use crate::config::PredictorConfig;
use crate::embedder::{EmbedderSpec, ModelEmbedder};
use crate::error::{PredictError, PredictResult};
use crate::traits::{Classifier, Embedder, Translator};
use crate::training::{train, TrainingMetrics};

pub const EMBEDDER_FILE: &str = "embedder.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const CLASS_REPORT_FILE: &str = "classification_report.csv";
pub const CONFUSION_FILE: &str = "confusion_matrix.csv";

const REQUIRED_FILES: [&str; 4] = [EMBEDDER_FILE, CLASSIFIER_FILE, LABEL_ENCODER_FILE, SCALER_FILE];

/// Artifact errors.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("Inconsistent artifacts: {0}")]
    Inconsistent(String),
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Everything needed to score text.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub embedder: EmbedderSpec,
    pub classifier: ScaledClassifier,
    pub labels: LabelEncoder,
    pub metrics: Option<TrainingMetrics>,
}

impl ModelArtifacts {
    /// Whether every required file exists in `dir`.
    pub fn exists(dir: &Path) -> bool {
        REQUIRED_FILES.iter().all(|f| dir.join(f).is_file())
    }

    pub fn load(dir: &Path) -> ArtifactResult<Self> {
        let embedder: EmbedderSpec = read_json(&dir.join(EMBEDDER_FILE))?;
        let model: CentroidClassifier = read_json(&dir.join(CLASSIFIER_FILE))?;
        let labels: LabelEncoder = read_json(&dir.join(LABEL_ENCODER_FILE))?;
        let scaler: FeatureScaler = read_json(&dir.join(SCALER_FILE))?;

        let metrics_path = dir.join(METRICS_FILE);
        let metrics = if metrics_path.is_file() {
            Some(read_json(&metrics_path)?)
        } else {
            None
        };

        let artifacts = Self {
            embedder,
            classifier: ScaledClassifier { scaler, model },
            labels,
            metrics,
        };
        artifacts.check()?;
        Ok(artifacts)
    }

    pub fn save(&self, dir: &Path) -> ArtifactResult<()> {
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        write_json(&dir.join(EMBEDDER_FILE), &self.embedder)?;
        write_json(&dir.join(CLASSIFIER_FILE), &self.classifier.model)?;
        write_json(&dir.join(LABEL_ENCODER_FILE), &self.labels)?;
        write_json(&dir.join(SCALER_FILE), &self.classifier.scaler)?;
        if let Some(metrics) = &self.metrics {
            write_json(&dir.join(METRICS_FILE), metrics)?;
            if !metrics.report.classes.is_empty() {
                let path = dir.join(CLASS_REPORT_FILE);
                write_file(&path)
                    .and_then(|file| metrics.report.write_csv(file).map_err(|source| csv_error(&path, source)))?;
                let path = dir.join(CONFUSION_FILE);
                write_file(&path).and_then(|file| {
                    metrics
                        .report
                        .write_confusion_csv(file)
                        .map_err(|source| csv_error(&path, source))
                })?;
            }
        }
        Ok(())
    }

    /// Instantiate the recorded embedder.
    pub fn load_embedder(&self) -> PredictResult<ModelEmbedder> {
        let embedder = self.embedder.load()?;
        let expected = self.classifier.model.dimension();
        if embedder.dimension() != expected {
            return Err(PredictError::DimensionMismatch {
                expected,
                got: embedder.dimension(),
            });
        }
        Ok(embedder)
    }

    /// Component shapes must agree with each other.
    fn check(&self) -> ArtifactResult<()> {
        let dim = self.embedder.dimension();
        if dim == 0 {
            return Err(ArtifactError::Inconsistent(format!(
                "{} embedder has dimension 0",
                self.embedder.kind()
            )));
        }
        if self.classifier.model.dimension() != dim || self.classifier.scaler.mean.len() != dim {
            return Err(ArtifactError::Inconsistent(format!(
                "embedder dimension {} but classifier {} and scaler {}",
                dim,
                self.classifier.model.dimension(),
                self.classifier.scaler.mean.len()
            )));
        }
        if self.labels.len() != self.classifier.num_classes() {
            return Err(ArtifactError::Inconsistent(format!(
                "{} labels but {} classes",
                self.labels.len(),
                self.classifier.num_classes()
            )));
        }
        Ok(())
    }
}

/// Load the model from `config.model_dir`, or train and save one when any
/// required artifact is missing. `translator` brings training text into
/// `config.canonical_language`.
pub fn load_or_train<T: Translator + ?Sized>(config: &PredictorConfig, translator: &T) -> PredictResult<ModelArtifacts> {
    let dir = config.model_dir.as_path();
    if ModelArtifacts::exists(dir) {
        let artifacts = ModelArtifacts::load(dir)?;
        info!(dir = %dir.display(), classes = artifacts.labels.len(), "Loaded model artifacts");
        return Ok(artifacts);
    }

    warn!(
        dir = %dir.display(),
        dataset = %config.dataset_path.display(),
        "Model artifacts missing, training from dataset"
    );
    let rows = read_csv_file(&config.dataset_path)?;
    let artifacts = train(&rows, &config.training, translator, &config.canonical_language)?;
    artifacts.save(dir)?;
    Ok(artifacts)
}

fn write_file(path: &Path) -> ArtifactResult<fs::File> {
    fs::File::create(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_error(path: &Path, source: csv::Error) -> ArtifactError {
    ArtifactError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ArtifactResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> ArtifactResult<()> {
    let json = serde_json::to_string(value).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashingEmbedder;
    use crate::evaluation::ClassificationReport;

    fn tiny_model() -> ModelArtifacts {
        let embedder = EmbedderSpec::Hashing(HashingEmbedder::new(4, 1));
        let scaler = FeatureScaler {
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        };
        let model = CentroidClassifier::fit(
            &[vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]],
            &[0, 1],
            2,
            0.1,
        )
        .unwrap();
        ModelArtifacts {
            embedder,
            classifier: ScaledClassifier { scaler, model },
            labels: LabelEncoder::fit(["Asthma", "Flu"]),
            metrics: None,
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let model = tiny_model();

        assert!(!ModelArtifacts::exists(dir.path()));
        model.save(dir.path()).unwrap();
        assert!(ModelArtifacts::exists(dir.path()));
        assert!(!dir.path().join(METRICS_FILE).exists());

        let loaded = ModelArtifacts::load(dir.path()).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_missing_file_is_not_complete() {
        let dir = tempfile::tempdir().unwrap();
        tiny_model().save(dir.path()).unwrap();
        fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();
        assert!(!ModelArtifacts::exists(dir.path()));
    }

    #[test]
    fn test_inconsistent_labels_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = tiny_model();
        model.labels = LabelEncoder::fit(["Asthma", "Flu", "Malaria"]);
        model.save(dir.path()).unwrap();

        assert!(matches!(
            ModelArtifacts::load(dir.path()),
            Err(ArtifactError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_zero_dimension_embedder_rejected() {
        let dir = tempfile::tempdir().unwrap();
        tiny_model().save(dir.path()).unwrap();
        fs::write(
            dir.path().join(EMBEDDER_FILE),
            r#"{"kind":"hashing","dimension":0,"seed":1,"char_ngrams":true}"#,
        )
        .unwrap();

        assert!(matches!(
            ModelArtifacts::load(dir.path()),
            Err(ArtifactError::Inconsistent(msg)) if msg.contains("dimension 0")
        ));
    }

    #[test]
    fn test_embedder_kind_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        tiny_model().save(dir.path()).unwrap();
        let raw = fs::read_to_string(dir.path().join(EMBEDDER_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["kind"], "hashing");

        let loaded = ModelArtifacts::load(dir.path()).unwrap();
        assert_eq!(loaded.load_embedder().unwrap().dimension(), 4);
    }

    #[test]
    fn test_metrics_written_with_class_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = tiny_model();
        model.metrics = Some(TrainingMetrics {
            accuracy: 0.5,
            validation_rows: 2,
            classes: 2,
            embedder: "hashing".into(),
            report: ClassificationReport::new(&[0, 1], &[0, 0], &model.labels),
            ..Default::default()
        });
        model.save(dir.path()).unwrap();

        let report = fs::read_to_string(dir.path().join(CLASS_REPORT_FILE)).unwrap();
        assert_eq!(report.lines().nth(1), Some("Asthma,0.5000,1.0000,0.6667,1"));
        let confusion = fs::read_to_string(dir.path().join(CONFUSION_FILE)).unwrap();
        assert_eq!(confusion.lines().nth(2), Some("Flu,1.0000,0.0000"));

        let loaded = ModelArtifacts::load(dir.path()).unwrap();
        let metrics = loaded.metrics.unwrap();
        assert_eq!(metrics.report.confusion, vec![vec![1.0, 0.0], vec![1.0, 0.0]]);
        assert_eq!(metrics.report.classes[1].support, 1);
    }
}
