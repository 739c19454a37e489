//! Symptom-Synth Core Library
//!
//! Synthetic multilingual symptom dataset generation for disease classifiers.
//!
//! # Architecture
//!
//! ```text
//! GeneratorConfig ──► DatasetGenerator
//!                          │
//!                          │  for each disease
//!                          ▼
//!                   SeedCatalog.lookup ──► Curated | Generic
//!                          │
//!                          ▼
//!                   TextTemplater.render (en / bn / banglish / mixed)
//!                          │
//!                          ▼
//!                   DuplicateFilter ── near-duplicate? ──► retry
//!                          │
//!                          ▼
//!                   Labeling: confounders, probabilities,
//!                             uncertainty, explainability
//!                          │
//!                          ▼
//!          ┌───────────────┴───────────────┐
//!          │                               │
//!          ▼                               ▼
//!     Dataset CSV                    Run manifest
//!   (all fields quoted)        (counts + SHA-256 of CSV)
//! ```
//!
//! # Determinism
//!
//! Every sampling step takes an explicit `rand::Rng`. The same config and
//! seed produce a byte-identical CSV.
//!
//! # Modules
//!
//! - [`catalog`]: Curated disease table with generic fallback
//! - [`config`]: Generator configuration
//! - [`generator`]: Templating, duplicate filtering, labeling and assembly
//! - [`dataset`]: CSV I/O, class balancing and run manifests
//! - [`metrics`]: Entropy-based uncertainty
//! - [`models`]: Domain types (DiseaseRecord, GeneratedSample, Language)

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use catalog::{CatalogError, SeedCatalog, DEFAULT_DISEASES};
pub use config::{ConfigError, GeneratorConfig};
pub use dataset::{DatasetError, DatasetRow, RunManifest};
pub use generator::{
    DatasetGenerator, DiseaseOutcome, GenerationError, GenerationReport, GenerationState,
    OverlapMetric,
};
pub use models::{CatalogEntry, DiseaseRecord, GeneratedSample, Language};
