//! Run manifest written next to a generated dataset.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::DatasetResult;
use crate::config::GeneratorConfig;
use crate::generator::{DiseaseOutcome, GenerationReport};

/// Record of a generation run: what was asked, what came out, and a digest
/// of the exact CSV bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub config: GeneratorConfig,
    /// Rows in the CSV
    pub rows: usize,
    pub outcomes: Vec<DiseaseOutcome>,
    /// Hex SHA-256 of the CSV file
    pub csv_sha256: String,
}

impl RunManifest {
    pub fn new(config: &GeneratorConfig, report: &GenerationReport, csv: &[u8]) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
            rows: report.samples.len(),
            outcomes: report.outcomes.clone(),
            csv_sha256: sha256_hex(csv),
        }
    }

    /// Whether `csv` is byte-identical to the dataset this manifest describes.
    pub fn matches(&self, csv: &[u8]) -> bool {
        self.csv_sha256 == sha256_hex(csv)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> DatasetResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// `data.csv` → `data.manifest.json`
pub fn manifest_path(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("manifest.json")
}

/// Hex-encoded SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
