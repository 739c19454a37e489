//! Prediction service.
//!
//! Pipeline: Detect language → Translate to canonical → Clean → Embed → Score → Top-k

use serde::{Deserialize, Serialize};
use symptom_synth_core::metrics::{normalized_entropy, round_to};
use tracing::{debug, warn};

use crate::artifacts::ModelArtifacts;
use crate::classifier::{LabelEncoder, ScaledClassifier};
use crate::embedder::ModelEmbedder;
use crate::error::{PredictError, PredictResult};
use crate::explain::{explain, ExplainOptions, Explanation};
use crate::traits::{Classifier, Embedder, Translator};
use crate::training::clean_text;

/// One ranked disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLabel {
    pub disease: String,
    pub probability: f64,
}

/// Result of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Highest probability first
    pub top_k: Vec<RankedLabel>,
    /// Normalized entropy of the full distribution, three decimals
    pub uncertainty: f64,
    /// Language reported by the detector, or the canonical one on failure
    pub detected_language: String,
    /// Text that was actually embedded (after translation and cleaning)
    pub model_input: String,
}

/// Couples an embedder, a classifier and a translator.
pub struct PredictionService<E, C, T> {
    embedder: E,
    classifier: C,
    labels: LabelEncoder,
    translator: T,
    top_k: usize,
    canonical_language: String,
    explain: ExplainOptions,
}

impl<T: Translator> PredictionService<ModelEmbedder, ScaledClassifier, T> {
    /// Service over a trained model, loading the embedder its artifacts name.
    pub fn from_artifacts(artifacts: ModelArtifacts, translator: T) -> PredictResult<Self> {
        let embedder = artifacts.load_embedder()?;
        Ok(Self::new(embedder, artifacts.classifier, artifacts.labels, translator))
    }
}

impl<E: Embedder, C: Classifier, T: Translator> PredictionService<E, C, T> {
    pub fn new(embedder: E, classifier: C, labels: LabelEncoder, translator: T) -> Self {
        Self {
            embedder,
            classifier,
            labels,
            translator,
            top_k: 3,
            canonical_language: "en".into(),
            explain: ExplainOptions::default(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_canonical_language(mut self, language: impl Into<String>) -> Self {
        self.canonical_language = language.into();
        self
    }

    pub fn with_explain_options(mut self, options: ExplainOptions) -> Self {
        self.explain = options;
        self
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    /// Detected language and the text to feed the model.
    ///
    /// Neither detection nor translation failures propagate: they fall back
    /// to the canonical language and the original text.
    fn to_canonical(&self, raw_text: &str) -> (String, String) {
        let detected = match self.translator.detect(raw_text) {
            Ok(lang) => lang,
            Err(err) => {
                warn!(error = %err, "Language detection failed, assuming canonical");
                self.canonical_language.clone()
            }
        };

        if detected == self.canonical_language {
            return (detected, raw_text.to_string());
        }

        match self
            .translator
            .translate(raw_text, &detected, &self.canonical_language)
        {
            Ok(text) => (detected, text),
            Err(err) => {
                warn!(error = %err, from = %detected, "Translation failed, using original text");
                (detected, raw_text.to_string())
            }
        }
    }

    /// Score `raw_text` and return the top-k diseases.
    pub fn predict(&self, raw_text: &str) -> PredictResult<Prediction> {
        let (detected_language, text) = self.to_canonical(raw_text);
        let model_input = clean_text(&text);

        let features = self.embedder.embed(&model_input)?;
        let probs = self.classifier.predict_proba(&features)?;
        if probs.len() != self.labels.len() {
            return Err(PredictError::Classifier(format!(
                "{} probabilities for {} labels",
                probs.len(),
                self.labels.len()
            )));
        }

        let mut ranked: Vec<(usize, f64)> = probs.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let top_k = ranked
            .into_iter()
            .take(self.top_k)
            .map(|(idx, probability)| {
                self.labels
                    .inverse_transform(idx)
                    .map(|disease| RankedLabel {
                        disease: disease.to_string(),
                        probability,
                    })
                    .ok_or(PredictError::UnknownClass(idx))
            })
            .collect::<PredictResult<Vec<_>>>()?;

        let uncertainty = round_to(normalized_entropy(&probs), 3);
        debug!(
            language = %detected_language,
            top = top_k.first().map(|r| r.disease.as_str()).unwrap_or(""),
            uncertainty,
            "Prediction"
        );

        Ok(Prediction {
            top_k,
            uncertainty,
            detected_language,
            model_input,
        })
    }

    /// Word weights behind the top-ranked disease of `prediction`.
    ///
    /// `None` when explanations are turned off or nothing was ranked.
    pub fn explain_top(&self, prediction: &Prediction) -> PredictResult<Option<Explanation>> {
        let Some(top) = prediction.top_k.first() else {
            return Ok(None);
        };
        if self.explain.num_samples == 0 {
            return Ok(None);
        }
        let class = self
            .labels
            .transform(&top.disease)
            .ok_or_else(|| PredictError::Classifier(format!("{} is not a known label", top.disease)))?;

        let tokens = explain(
            &self.embedder,
            &self.classifier,
            &prediction.model_input,
            class,
            &self.explain,
        )?;
        Ok(Some(Explanation {
            disease: top.disease.clone(),
            probability: top.probability,
            tokens,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashingEmbedder;
    use crate::translate::{LexiconTranslator, TranslateError, TranslateResult};

    struct FixedClassifier(Vec<f64>);

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _features: &[f32]) -> PredictResult<Vec<f64>> {
            Ok(self.0.clone())
        }

        fn num_classes(&self) -> usize {
            self.0.len()
        }
    }

    struct BrokenTranslator;

    impl Translator for BrokenTranslator {
        fn detect(&self, _text: &str) -> TranslateResult<String> {
            Err(TranslateError::Http("offline".into()))
        }

        fn translate(&self, _text: &str, _s: &str, _t: &str) -> TranslateResult<String> {
            Err(TranslateError::Http("offline".into()))
        }
    }

    fn labels() -> LabelEncoder {
        LabelEncoder::fit(["Asthma", "Flu", "Malaria", "Typhoid Fever"])
    }

    #[test]
    fn test_top_k_sorted() {
        let service = PredictionService::new(
            HashingEmbedder::new(8, 1),
            FixedClassifier(vec![0.1, 0.5, 0.3, 0.1]),
            labels(),
            LexiconTranslator::default(),
        );

        let prediction = service.predict("fever and chills").unwrap();
        let names: Vec<&str> = prediction.top_k.iter().map(|r| r.disease.as_str()).collect();
        assert_eq!(names, vec!["Flu", "Malaria", "Asthma"]);
        assert_eq!(prediction.detected_language, "en");
    }

    #[test]
    fn test_uncertainty_over_full_distribution() {
        let service = PredictionService::new(
            HashingEmbedder::new(8, 1),
            FixedClassifier(vec![0.25; 4]),
            labels(),
            LexiconTranslator::default(),
        )
        .with_top_k(2);

        let prediction = service.predict("anything").unwrap();
        assert_eq!(prediction.top_k.len(), 2);
        assert_eq!(prediction.uncertainty, 1.0);
    }

    #[test]
    fn test_translator_failures_fall_back() {
        let service = PredictionService::new(
            HashingEmbedder::new(8, 1),
            FixedClassifier(vec![0.7, 0.1, 0.1, 0.1]),
            labels(),
            BrokenTranslator,
        );

        let prediction = service.predict("Wheezing, at night!").unwrap();
        assert_eq!(prediction.detected_language, "en");
        assert_eq!(prediction.model_input, "wheezing at night");
        assert_eq!(prediction.top_k[0].disease, "Asthma");
    }

    #[test]
    fn test_bangla_input_translated_before_embedding() {
        let service = PredictionService::new(
            HashingEmbedder::new(8, 1),
            FixedClassifier(vec![0.7, 0.1, 0.1, 0.1]),
            labels(),
            LexiconTranslator::default(),
        );

        let prediction = service.predict("আমার জ্বর").unwrap();
        assert_eq!(prediction.detected_language, "bn");
        assert_eq!(prediction.model_input, "আমার fever");

        // Words outside the lexicon pass through unchanged
        let prediction = service.predict("আমার পেট খারাপ").unwrap();
        assert_eq!(prediction.model_input, "আমার পেট খারাপ");
    }

    /// Class 0 gets all the mass when "wheezing" is present.
    struct WheezeClassifier;

    impl Classifier for WheezeClassifier {
        fn predict_proba(&self, features: &[f32]) -> PredictResult<Vec<f64>> {
            let p = if features[0] > 0.0 { 0.9 } else { 0.1 };
            Ok(vec![p, (1.0 - p) / 3.0, (1.0 - p) / 3.0, (1.0 - p) / 3.0])
        }

        fn num_classes(&self) -> usize {
            4
        }
    }

    struct WheezeEmbedder;

    impl Embedder for WheezeEmbedder {
        fn embed(&self, text: &str) -> PredictResult<Vec<f32>> {
            Ok(vec![if text.contains("wheezing") { 1.0 } else { 0.0 }])
        }

        fn dimension(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_explain_top() {
        let service = PredictionService::new(WheezeEmbedder, WheezeClassifier, labels(), LexiconTranslator::default());
        let prediction = service.predict("wheezing at night").unwrap();
        assert_eq!(prediction.top_k[0].disease, "Asthma");

        let explanation = service.explain_top(&prediction).unwrap().unwrap();
        assert_eq!(explanation.disease, "Asthma");
        assert_eq!(explanation.tokens[0].token, "wheezing");
        assert!(explanation.tokens[0].weight > 0.5);

        let quiet = PredictionService::new(WheezeEmbedder, WheezeClassifier, labels(), LexiconTranslator::default())
            .with_explain_options(ExplainOptions {
                num_samples: 0,
                ..Default::default()
            });
        assert_eq!(quiet.explain_top(&prediction).unwrap(), None);
    }

    #[test]
    fn test_label_count_mismatch() {
        let service = PredictionService::new(
            HashingEmbedder::new(8, 1),
            FixedClassifier(vec![0.5, 0.5]),
            labels(),
            LexiconTranslator::default(),
        );
        assert!(matches!(service.predict("cough"), Err(PredictError::Classifier(_))));
    }
}
