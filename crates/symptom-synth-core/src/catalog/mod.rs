//! Seed catalog of diseases.
//!
//! Read-only lookup table from disease name to symptom vocabulary,
//! confounders, reasoning keywords and recommendations. Lookups never fail:
//! diseases missing from the catalog resolve to a generic entry.

mod seeds;

pub use seeds::DEFAULT_DISEASES;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::{CatalogEntry, DiseaseRecord};

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate disease in catalog: {0}")]
    DuplicateName(String),

    #[error("Disease {0} has no symptoms")]
    EmptySymptoms(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Disease lookup table.
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    records: BTreeMap<String, DiseaseRecord>,
}

impl SeedCatalog {
    /// Catalog with the curated diseases shipped in this crate.
    pub fn builtin() -> Self {
        let records = seeds::SEEDS
            .iter()
            .map(|seed| {
                let record = DiseaseRecord {
                    name: seed.name.to_string(),
                    symptoms: seed.symptoms.iter().map(|s| s.to_string()).collect(),
                    confounders: seed.confounders.iter().map(|s| s.to_string()).collect(),
                    reasoning: seed.reasoning.to_string(),
                    recommendation: seed.recommendation.to_string(),
                };
                (record.name.clone(), record)
            })
            .collect();
        Self { records }
    }

    /// Build a catalog from records, rejecting duplicates and empty vocabularies.
    pub fn from_records(records: Vec<DiseaseRecord>) -> CatalogResult<Self> {
        let mut catalog = Self::default();
        for record in records {
            if record.symptoms.is_empty() {
                return Err(CatalogError::EmptySymptoms(record.name));
            }
            if catalog.records.contains_key(&record.name) {
                return Err(CatalogError::DuplicateName(record.name));
            }
            catalog.records.insert(record.name.clone(), record);
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON array of records.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let raw = fs::read_to_string(path)?;
        let records: Vec<DiseaseRecord> = serde_json::from_str(&raw)?;
        Self::from_records(records)
    }

    /// Write the catalog as a pretty JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let records: Vec<&DiseaseRecord> = self.records.values().collect();
        serde_json::to_string_pretty(&records)
    }

    /// Look up a disease, falling back to the generic entry.
    pub fn lookup(&self, disease: &str) -> CatalogEntry<'_> {
        match self.records.get(disease) {
            Some(record) => CatalogEntry::Curated(record),
            None => CatalogEntry::Generic(DiseaseRecord::generic(disease)),
        }
    }

    /// Insert or replace a record.
    pub fn upsert(&mut self, record: DiseaseRecord) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn contains(&self, disease: &str) -> bool {
        self.records.contains_key(disease)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Curated disease names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_default_diseases() {
        let catalog = SeedCatalog::builtin();
        assert_eq!(catalog.len(), DEFAULT_DISEASES.len());
        for disease in DEFAULT_DISEASES {
            assert!(!catalog.lookup(disease).is_generic(), "{} missing", disease);
        }
    }

    #[test]
    fn test_lookup_curated() {
        let catalog = SeedCatalog::builtin();
        let entry = catalog.lookup("Dengue Fever");
        let record = entry.record();

        assert_eq!(record.symptoms.len(), 6);
        assert_eq!(record.symptoms[0], "fever");
        assert!(record.confounders.contains(&"Chikungunya".to_string()));
    }

    #[test]
    fn test_lookup_missing_is_generic() {
        let catalog = SeedCatalog::builtin();
        let entry = catalog.lookup("Viral Fever");

        assert!(entry.is_generic());
        assert_eq!(entry.record().name, "Viral Fever");
        assert_eq!(entry.record().symptoms, vec!["symptom1", "symptom2", "symptom3"]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = SeedCatalog::builtin();
        assert!(catalog.lookup("dengue fever").is_generic());
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let mut a = DiseaseRecord::new("Flu");
        a.symptoms = vec!["fever".into()];
        let b = a.clone();

        let err = SeedCatalog::from_records(vec![a, b]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(name) if name == "Flu"));
    }

    #[test]
    fn test_from_records_rejects_empty_symptoms() {
        let err = SeedCatalog::from_records(vec![DiseaseRecord::new("Nothing")]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptySymptoms(_)));
    }

    #[test]
    fn test_json_file_round_trip() {
        let catalog = SeedCatalog::builtin();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, catalog.to_json().unwrap()).unwrap();

        let loaded = SeedCatalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.len(), catalog.len());
        assert_eq!(
            loaded.lookup("Malaria").record(),
            catalog.lookup("Malaria").record()
        );
    }
}
