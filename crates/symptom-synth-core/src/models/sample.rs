//! Generated sample models.

use serde::{Deserialize, Serialize};

use super::Language;

/// A labeled synthetic sample produced by the assembler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedSample {
    /// Globally unique, increasing identifier
    pub id: u64,
    /// Generated symptom description
    pub input_text: String,
    /// Primary disease followed by two confounders
    pub predicted_diseases: [String; 3],
    /// Probabilities aligned with `predicted_diseases`
    pub probabilities: [f64; 3],
    /// Comma-joined explanation tokens
    pub explainability: String,
    /// Reasoning keywords copied from the catalog
    pub reasoning: String,
    /// Recommendation copied from the catalog
    pub recommendation: String,
    /// Normalized entropy of `probabilities` (0.0 - 1.0)
    pub uncertainty: f64,
    /// Language the text was rendered in
    pub language: Language,
}

impl GeneratedSample {
    /// The disease whose vocabulary produced this sample.
    pub fn primary(&self) -> &str {
        &self.predicted_diseases[0]
    }

    /// `predicted_diseases` as written to the dataset.
    pub fn predicted_diseases_field(&self) -> String {
        self.predicted_diseases.join(",")
    }

    /// `probabilities` as written to the dataset, two decimals each.
    pub fn probabilities_field(&self) -> String {
        self.probabilities
            .iter()
            .map(|p| format!("{:.2}", p))
            .collect::<Vec<_>>()
            .join(",")
    }
}
