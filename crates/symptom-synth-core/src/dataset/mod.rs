//! Dataset table I/O.
//!
//! The dataset is a flat CSV with every field quoted. Multi-valued columns
//! (`predicted_diseases`, `probabilities`) are comma-joined inside a single
//! quoted field.

mod balance;
mod manifest;

pub use balance::*;
pub use manifest::*;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::GeneratedSample;

/// Column order of the dataset CSV.
pub const CSV_HEADER: [&str; 9] = [
    "id",
    "input_text",
    "predicted_diseases",
    "probabilities",
    "lime_explainability",
    "reasoning_keywords",
    "recommendations",
    "uncertainty_score",
    "language",
];

/// Dataset errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset is empty")]
    Empty,

    #[error("Row {id}: {reason}")]
    InvalidRow { id: u64, reason: String },
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// One dataset row as stored on disk.
///
/// Fields are kept as strings so rows written by other tools (or by the
/// translation step) load without reformatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub id: u64,
    pub input_text: String,
    /// Comma-joined: primary disease first
    pub predicted_diseases: String,
    /// Comma-joined, aligned with `predicted_diseases`
    pub probabilities: String,
    pub lime_explainability: String,
    pub reasoning_keywords: String,
    pub recommendations: String,
    /// Written with two decimals ("0.70"). CSVs produced by pandas write the
    /// shortest form ("0.7"); compare through [`DatasetRow::uncertainty_value`].
    pub uncertainty_score: String,
    pub language: String,
}

impl From<&GeneratedSample> for DatasetRow {
    fn from(sample: &GeneratedSample) -> Self {
        Self {
            id: sample.id,
            input_text: sample.input_text.clone(),
            predicted_diseases: sample.predicted_diseases_field(),
            probabilities: sample.probabilities_field(),
            lime_explainability: sample.explainability.clone(),
            reasoning_keywords: sample.reasoning.clone(),
            recommendations: sample.recommendation.clone(),
            uncertainty_score: format!("{:.2}", sample.uncertainty),
            language: sample.language.tag().to_string(),
        }
    }
}

impl DatasetRow {
    /// Predicted disease names, trimmed.
    pub fn labels(&self) -> Vec<&str> {
        self.predicted_diseases
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// First predicted disease, used as the training label.
    pub fn primary_label(&self) -> Option<&str> {
        self.labels().into_iter().next()
    }

    /// Parsed probabilities.
    pub fn probability_values(&self) -> DatasetResult<Vec<f64>> {
        self.probabilities
            .split(',')
            .map(|p| {
                p.trim().parse::<f64>().map_err(|e| DatasetError::InvalidRow {
                    id: self.id,
                    reason: format!("bad probability {:?}: {}", p, e),
                })
            })
            .collect()
    }

    /// Parsed uncertainty, independent of how many decimals were written.
    pub fn uncertainty_value(&self) -> DatasetResult<f64> {
        let raw = self.uncertainty_score.trim();
        raw.parse::<f64>().map_err(|e| DatasetError::InvalidRow {
            id: self.id,
            reason: format!("bad uncertainty {:?}: {}", raw, e),
        })
    }
}

/// Convert accepted samples to rows, preserving order.
pub fn rows_from_samples(samples: &[GeneratedSample]) -> Vec<DatasetRow> {
    samples.iter().map(DatasetRow::from).collect()
}

/// Write rows as CSV with every field quoted.
///
/// Probabilities and uncertainty are fixed to two decimals, so a value pandas
/// would write as `0.7` appears here as `0.70`.
pub fn write_csv<W: Write>(writer: W, rows: &[DatasetRow]) -> DatasetResult<()> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    if rows.is_empty() {
        csv.write_record(CSV_HEADER)?;
    }
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Encode rows to CSV bytes.
pub fn csv_bytes(rows: &[DatasetRow]) -> DatasetResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows)?;
    Ok(buf)
}

/// Write rows to a CSV file, returning the bytes written.
pub fn write_csv_file<P: AsRef<Path>>(path: P, rows: &[DatasetRow]) -> DatasetResult<Vec<u8>> {
    let bytes = csv_bytes(rows)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(bytes)
}

/// Read rows from CSV.
pub fn read_csv<R: Read>(reader: R) -> DatasetResult<Vec<DatasetRow>> {
    let mut csv = ReaderBuilder::new().from_reader(reader);
    let rows = csv.deserialize().collect::<Result<Vec<DatasetRow>, _>>()?;
    Ok(rows)
}

/// Read rows from a CSV file.
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> DatasetResult<Vec<DatasetRow>> {
    read_csv(File::open(path)?)
}

/// First row whose primary label matches `disease`, ignoring case.
pub fn find_by_primary<'a>(rows: &'a [DatasetRow], disease: &str) -> Option<&'a DatasetRow> {
    let needle = disease.trim().to_lowercase();
    rows.iter()
        .find(|row| row.primary_label().is_some_and(|l| l.to_lowercase() == needle))
}

/// Largest id in `rows`, if any.
pub fn max_id(rows: &[DatasetRow]) -> Option<u64> {
    rows.iter().map(|r| r.id).max()
}
