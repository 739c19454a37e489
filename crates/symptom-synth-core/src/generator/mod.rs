//! Synthetic dataset generation.
//!
//! Pipeline per disease: Catalog lookup → Template rendering → Duplicate filter → Labeling

mod dedupe;
mod labeling;
mod lexicon;
mod templating;

pub use dedupe::*;
pub use labeling::*;
pub use lexicon::*;
pub use templating::*;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::SeedCatalog;
use crate::config::{ConfigError, GeneratorConfig};
use crate::models::GeneratedSample;

/// Generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Not enough confounder candidates for: {0}")]
    InsufficientConfounders(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Mutable state threaded through a generation run.
///
/// Holds the next sample id and the accepted texts of every disease seen so
/// far. Ids keep increasing across diseases.
#[derive(Debug, Clone)]
pub struct GenerationState {
    next_id: u64,
    histories: BTreeMap<String, DuplicateFilter>,
}

impl GenerationState {
    pub fn new(id_base: u64) -> Self {
        Self {
            next_id: id_base,
            histories: BTreeMap::new(),
        }
    }

    /// Id the next accepted sample will get.
    pub fn peek_id(&self) -> u64 {
        self.next_id
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Accepted-text history for a disease, if it has been generated.
    pub fn history(&self, disease: &str) -> Option<&DuplicateFilter> {
        self.histories.get(disease)
    }

    /// Samples accepted across all diseases.
    pub fn total_accepted(&self) -> usize {
        self.histories.values().map(|h| h.len()).sum()
    }
}

/// Per-disease result of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseOutcome {
    pub disease: String,
    /// Samples accepted into the dataset
    pub accepted: usize,
    /// Templater calls made, accepted or not
    pub attempts: usize,
    /// Retry budget ran out before the target was reached
    pub exhausted: bool,
    /// The disease was missing from the catalog and used the generic entry
    pub generic: bool,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Accepted samples in id order
    pub samples: Vec<GeneratedSample>,
    /// One outcome per configured disease, in config order
    pub outcomes: Vec<DiseaseOutcome>,
}

impl GenerationReport {
    /// Diseases that stopped short of the target.
    pub fn exhausted(&self) -> impl Iterator<Item = &DiseaseOutcome> {
        self.outcomes.iter().filter(|o| o.exhausted)
    }
}

/// Builds labeled samples from the seed catalog.
pub struct DatasetGenerator {
    catalog: SeedCatalog,
    config: GeneratorConfig,
    templater: TextTemplater,
}

impl DatasetGenerator {
    /// Create a generator; the config is validated up front.
    pub fn new(catalog: SeedCatalog, config: GeneratorConfig) -> GenerationResult<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            templater: TextTemplater::default(),
        })
    }

    /// Replace the templater (e.g. to use a custom lexicon).
    pub fn with_templater(mut self, templater: TextTemplater) -> Self {
        self.templater = templater;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SeedCatalog {
        &self.catalog
    }

    /// Run with an RNG seeded from the config.
    pub fn generate_seeded(&self) -> GenerationResult<GenerationReport> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.generate(&mut rng)
    }

    /// Generate every configured disease in order.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> GenerationResult<GenerationReport> {
        let mut state = GenerationState::new(self.config.id_base);
        let mut report = GenerationReport::default();

        for disease in &self.config.diseases {
            let outcome = self.generate_disease(disease, &mut state, rng, &mut report.samples)?;
            report.outcomes.push(outcome);
        }

        info!(
            samples = report.samples.len(),
            diseases = report.outcomes.len(),
            exhausted = report.exhausted().count(),
            "Generation finished"
        );
        Ok(report)
    }

    /// Generate samples for one disease, appending accepted ones to `out`.
    pub fn generate_disease<R: Rng + ?Sized>(
        &self,
        disease: &str,
        state: &mut GenerationState,
        rng: &mut R,
        out: &mut Vec<GeneratedSample>,
    ) -> GenerationResult<DiseaseOutcome> {
        let entry = self.catalog.lookup(disease);
        if entry.is_generic() {
            debug!(disease, "No curated entry, using generic symptoms");
        }
        let record = entry.record();
        let budget = self.config.retry_budget();
        let languages = &self.config.languages;

        let mut history = state
            .histories
            .remove(disease)
            .unwrap_or_else(|| DuplicateFilter::new(self.config.max_overlap, self.config.overlap_metric));

        let mut accepted = 0;
        let mut attempts = 0;
        let mut failure = None;

        while accepted < self.config.per_disease && attempts < budget {
            attempts += 1;

            let language = languages[rng.gen_range(0..languages.len())];
            let rendered = self.templater.render(record, language, rng);
            if !history.try_accept(&rendered.text) {
                continue;
            }

            let labels = match pick_confounders(record, &self.config.diseases, rng) {
                Ok(labels) => labels,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            };
            let probabilities = sample_probabilities(rng);
            let matched = symptoms_in_text(record, &rendered.text, language, self.templater.lexicon());
            let explainability = explainability_tokens(record, &matched, rng);

            out.push(GeneratedSample {
                id: state.take_id(),
                input_text: rendered.text,
                predicted_diseases: labels,
                probabilities,
                explainability,
                reasoning: record.reasoning.clone(),
                recommendation: record.recommendation.clone(),
                uncertainty: uncertainty(&probabilities),
                language,
            });
            accepted += 1;
        }

        state.histories.insert(disease.to_string(), history);
        if let Some(err) = failure {
            return Err(err);
        }

        let exhausted = accepted < self.config.per_disease;
        if exhausted {
            warn!(
                disease,
                accepted,
                target = self.config.per_disease,
                attempts,
                "Retry budget exhausted before reaching target"
            );
        } else {
            debug!(disease, accepted, attempts, "Disease complete");
        }

        Ok(DiseaseOutcome {
            disease: disease.to_string(),
            accepted,
            attempts,
            exhausted,
            generic: entry.is_generic(),
        })
    }
}
