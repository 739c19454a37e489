//! Disease catalog models.

use serde::{Deserialize, Serialize};

/// A single curated disease in the seed catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseRecord {
    /// Disease name - unique key
    pub name: String,
    /// Symptom phrases in English, in catalog order
    pub symptoms: Vec<String>,
    /// Diseases plausible enough to be listed as secondary predictions
    pub confounders: Vec<String>,
    /// Semicolon-separated reasoning keywords
    pub reasoning: String,
    /// Semicolon-separated recommendation text
    pub recommendation: String,
}

impl DiseaseRecord {
    /// Create a record with no symptoms or confounders.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symptoms: Vec::new(),
            confounders: Vec::new(),
            reasoning: String::new(),
            recommendation: String::new(),
        }
    }

    /// Generic entry used for diseases absent from the curated catalog.
    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symptoms: vec!["symptom1".into(), "symptom2".into(), "symptom3".into()],
            confounders: vec![
                "Common Cold".into(),
                "Viral Infection".into(),
                "Gastroenteritis".into(),
            ],
            reasoning: "symptom1; symptom2".into(),
            recommendation: "Consult doctor; Rest; Symptomatic care".into(),
        }
    }

    /// Confounders with the disease itself and repeats removed, in catalog order.
    pub fn distinct_confounders(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.confounders.len());
        for c in &self.confounders {
            if c != &self.name && !out.contains(&c.as_str()) {
                out.push(c);
            }
        }
        out
    }
}

/// Result of a catalog lookup.
///
/// Curated diseases borrow from the catalog; anything else gets an owned
/// generic entry so callers never have to handle a miss.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry<'a> {
    Curated(&'a DiseaseRecord),
    Generic(DiseaseRecord),
}

impl CatalogEntry<'_> {
    /// The record behind this entry.
    pub fn record(&self) -> &DiseaseRecord {
        match self {
            CatalogEntry::Curated(record) => record,
            CatalogEntry::Generic(record) => record,
        }
    }

    /// Whether the lookup fell back to the generic entry.
    pub fn is_generic(&self) -> bool {
        matches!(self, CatalogEntry::Generic(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_record_shape() {
        let record = DiseaseRecord::generic("Mystery Fever");
        assert_eq!(record.name, "Mystery Fever");
        assert_eq!(record.symptoms.len(), 3);
        assert_eq!(record.confounders.len(), 3);
        assert!(record.recommendation.starts_with("Consult doctor"));
    }

    #[test]
    fn test_distinct_confounders_drops_self_and_repeats() {
        let mut record = DiseaseRecord::new("Malaria");
        record.confounders = vec![
            "Malaria".into(),
            "Dengue Fever".into(),
            "Dengue Fever".into(),
            "Typhoid Fever".into(),
        ];

        assert_eq!(
            record.distinct_confounders(),
            vec!["Dengue Fever", "Typhoid Fever"]
        );
    }

    #[test]
    fn test_catalog_entry_record() {
        let curated = DiseaseRecord::new("Asthma");
        let entry = CatalogEntry::Curated(&curated);
        assert_eq!(entry.record().name, "Asthma");
        assert!(!entry.is_generic());

        let entry = CatalogEntry::Generic(DiseaseRecord::generic("Unknown"));
        assert!(entry.is_generic());
    }
}
