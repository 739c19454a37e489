//! Training path: canonicalize, clean, balance, encode, embed, scale, fit,
//! evaluate.

use std::path::PathBuf;
use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use symptom_synth_core::dataset::balance;
use symptom_synth_core::metrics::round_to;
use symptom_synth_core::{ConfigError, DatasetRow};
use tracing::{debug, info, warn};

use crate::artifacts::ModelArtifacts;
use crate::classifier::{CentroidClassifier, FeatureScaler, LabelEncoder, ScaledClassifier};
use crate::embedder::{EmbedderSpec, HashingEmbedder};
use crate::error::{PredictError, PredictResult};
use crate::evaluation::{argmax, log_loss, ClassificationReport};
use crate::traits::{Classifier, Embedder, Translator};

/// Rows whose trimmed text has this many characters or fewer are dropped.
const MIN_TRAINING_TEXT: usize = 3;

/// Knobs for [`train`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingOptions {
    pub seed: u64,
    /// Share of each class held out for validation
    pub validation_fraction: f64,
    /// Hashing embedder dimension; ignored for ONNX models
    pub dimension: usize,
    /// Softmax temperature of the centroid classifier
    pub temperature: f32,
    /// Resample classes to equal size before splitting
    pub balance: bool,
    /// Sentence encoder directory (`model.onnx` + `tokenizer.json`). The
    /// hashing embedder is used when unset.
    pub onnx_model_dir: Option<PathBuf>,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            validation_fraction: 0.15,
            dimension: 512,
            temperature: 0.1,
            balance: true,
            onnx_model_dir: None,
        }
    }
}

impl TrainingOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.validation_fraction) {
            return Err(ConfigError::Invalid(format!(
                "validation_fraction must be in [0, 1), got {}",
                self.validation_fraction
            )));
        }
        if self.dimension == 0 {
            return Err(ConfigError::Invalid("dimension must be >= 1".into()));
        }
        if self.temperature <= 0.0 {
            return Err(ConfigError::Invalid("temperature must be > 0".into()));
        }
        Ok(())
    }

    /// Embedder to train with. ONNX dimensions are filled in once loaded.
    pub fn embedder_spec(&self) -> EmbedderSpec {
        match &self.onnx_model_dir {
            Some(dir) => EmbedderSpec::Onnx {
                model_dir: dir.clone(),
                dimension: 0,
            },
            None => EmbedderSpec::Hashing(HashingEmbedder::new(self.dimension, self.seed)),
        }
    }
}

/// Validation scores saved next to the model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub f1_weighted: f64,
    pub log_loss: f64,
    pub train_rows: usize,
    pub validation_rows: usize,
    pub classes: usize,
    /// Embedder kind, `hashing` or `onnx`
    #[serde(default)]
    pub embedder: String,
    /// Rows translated into the canonical language before training
    #[serde(default)]
    pub translated_rows: usize,
    /// Rows kept in their own language because translation failed
    #[serde(default)]
    pub untranslated_rows: usize,
    #[serde(default)]
    pub report: ClassificationReport,
}

/// Lowercase, drop URLs, turn punctuation into spaces and collapse whitespace.
///
/// Letters, combining marks and digits of any script are kept.
pub fn clean_text(text: &str) -> String {
    static URL: OnceLock<Regex> = OnceLock::new();
    static PUNCT: OnceLock<Regex> = OnceLock::new();
    static SPACE: OnceLock<Regex> = OnceLock::new();

    let url = URL.get_or_init(|| Regex::new(r"http\S+|www\S+").expect("valid regex"));
    let punct = PUNCT.get_or_init(|| Regex::new(r"[^\p{L}\p{M}\p{N}\s]").expect("valid regex"));
    let space = SPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let lower = text.to_lowercase();
    let no_urls = url.replace_all(&lower, "");
    let no_punct = punct.replace_all(&no_urls, " ");
    space.replace_all(&no_punct, " ").trim().to_string()
}

/// Split indices per class so each class keeps the same train/validation
/// proportion. Every class keeps at least one training row.
pub fn stratified_split<R: Rng + ?Sized>(
    labels: &[usize],
    validation_fraction: f64,
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let num_classes = labels.iter().max().map(|m| m + 1).unwrap_or(0);
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); num_classes];
    for (i, &label) in labels.iter().enumerate() {
        by_class[label].push(i);
    }

    let mut train = Vec::new();
    let mut validation = Vec::new();
    for mut indices in by_class {
        if indices.is_empty() {
            continue;
        }
        indices.shuffle(rng);
        let n_val = ((indices.len() as f64) * validation_fraction).round() as usize;
        let n_val = n_val.min(indices.len() - 1);
        validation.extend_from_slice(&indices[..n_val]);
        train.extend_from_slice(&indices[n_val..]);
    }
    train.sort_unstable();
    validation.sort_unstable();
    (train, validation)
}

/// Row text in `canonical`, or `None` when it could not be translated.
///
/// Rows without a language tag are run through the detector first.
pub fn canonical_text<T: Translator + ?Sized>(row: &DatasetRow, translator: &T, canonical: &str) -> Option<String> {
    let source = match row.language.trim() {
        "" => translator
            .detect(&row.input_text)
            .unwrap_or_else(|_| canonical.to_string()),
        tag => tag.to_string(),
    };
    if source == canonical {
        return Some(row.input_text.clone());
    }
    match translator.translate(&row.input_text, &source, canonical) {
        Ok(text) => Some(text),
        Err(err) => {
            debug!(id = row.id, error = %err, "Row translation failed");
            None
        }
    }
}

/// Train a model from dataset rows.
///
/// Text is first brought into `canonical_language` through `translator`, the
/// language queries are translated into at prediction time. Rows that fail
/// to translate are kept as written.
pub fn train<T: Translator + ?Sized>(
    rows: &[DatasetRow],
    options: &TrainingOptions,
    translator: &T,
    canonical_language: &str,
) -> PredictResult<ModelArtifacts> {
    options.validate()?;
    let mut rng = StdRng::seed_from_u64(options.seed);

    // Step 1: drop unusable rows
    let usable: Vec<&DatasetRow> = rows
        .iter()
        .filter(|r| r.input_text.trim().chars().count() > MIN_TRAINING_TEXT && r.primary_label().is_some())
        .collect();
    if usable.is_empty() {
        return Err(PredictError::NoTrainingData);
    }

    // Step 2: canonical language
    let mut translated_rows = 0;
    let mut untranslated_rows = 0;
    let canonical: Vec<DatasetRow> = usable
        .into_iter()
        .map(|row| {
            let mut row = row.clone();
            let in_canonical = row.language.trim() == canonical_language;
            match canonical_text(&row, translator, canonical_language) {
                Some(text) => {
                    if !in_canonical && text != row.input_text {
                        translated_rows += 1;
                    }
                    row.input_text = text;
                }
                None => untranslated_rows += 1,
            }
            row
        })
        .collect();
    if untranslated_rows > 0 {
        warn!(
            untranslated_rows,
            canonical = canonical_language,
            "Some rows could not be translated and were kept as written"
        );
    }

    // Step 3: balance classes
    let prepared = if options.balance {
        balance(&canonical, &mut rng)
    } else {
        canonical
    };

    // Step 4: encode labels and clean text
    let labels = LabelEncoder::fit(prepared.iter().filter_map(|r| r.primary_label()));
    let mut texts = Vec::with_capacity(prepared.len());
    let mut targets = Vec::with_capacity(prepared.len());
    for row in &prepared {
        let label = row.primary_label().and_then(|l| labels.transform(l));
        if let Some(label) = label {
            texts.push(clean_text(&row.input_text));
            targets.push(label);
        }
    }

    // Step 5: embed and split
    let embedder = options.embedder_spec().load()?;
    let spec = match options.embedder_spec() {
        EmbedderSpec::Onnx { model_dir, .. } => EmbedderSpec::Onnx {
            model_dir,
            dimension: embedder.dimension(),
        },
        hashing => hashing,
    };
    let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
    let features = embedder.embed_batch(&refs)?;
    let (train_idx, val_idx) = stratified_split(&targets, options.validation_fraction, &mut rng);

    let train_x: Vec<Vec<f32>> = train_idx.iter().map(|&i| features[i].clone()).collect();
    let train_y: Vec<usize> = train_idx.iter().map(|&i| targets[i]).collect();

    // Step 6: scale and fit
    let scaler = FeatureScaler::fit(&train_x)?;
    let scaled: Vec<Vec<f32>> = train_x
        .iter()
        .map(|x| scaler.transform(x))
        .collect::<PredictResult<_>>()?;
    let model = CentroidClassifier::fit(&scaled, &train_y, labels.len(), options.temperature)?;
    let classifier = ScaledClassifier { scaler, model };

    // Step 7: evaluate
    let eval_idx = if val_idx.is_empty() {
        warn!("No validation rows, reporting metrics on the training set");
        &train_idx
    } else {
        &val_idx
    };
    let eval_y: Vec<usize> = eval_idx.iter().map(|&i| targets[i]).collect();
    let probas: Vec<Vec<f64>> = eval_idx
        .iter()
        .map(|&i| classifier.predict_proba(&features[i]))
        .collect::<PredictResult<_>>()?;
    let preds: Vec<usize> = probas.iter().map(|p| argmax(p)).collect();
    let report = ClassificationReport::new(&eval_y, &preds, &labels);

    let metrics = TrainingMetrics {
        accuracy: round_to(report.accuracy, 4),
        f1_weighted: round_to(report.weighted_f1, 4),
        log_loss: round_to(log_loss(&eval_y, &probas), 4),
        train_rows: train_idx.len(),
        validation_rows: val_idx.len(),
        classes: labels.len(),
        embedder: spec.kind().to_string(),
        translated_rows,
        untranslated_rows,
        report,
    };
    info!(
        accuracy = metrics.accuracy,
        f1 = metrics.f1_weighted,
        log_loss = metrics.log_loss,
        classes = metrics.classes,
        embedder = %metrics.embedder,
        translated = metrics.translated_rows,
        "Training finished"
    );

    Ok(ModelArtifacts {
        embedder: spec,
        classifier,
        labels,
        metrics: Some(metrics),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{LexiconTranslator, TranslateError, TranslateResult};

    fn row(id: u64, text: &str, disease: &str, language: &str) -> DatasetRow {
        DatasetRow {
            id,
            input_text: text.into(),
            predicted_diseases: format!("{},Flu,Asthma", disease),
            probabilities: "0.70,0.20,0.10".into(),
            lime_explainability: String::new(),
            reasoning_keywords: String::new(),
            recommendations: String::new(),
            uncertainty_score: "0.73".into(),
            language: language.into(),
        }
    }

    /// Translates nothing.
    struct Offline;

    impl Translator for Offline {
        fn detect(&self, _text: &str) -> TranslateResult<String> {
            Ok("bn".into())
        }

        fn translate(&self, _text: &str, source: &str, target: &str) -> TranslateResult<String> {
            Err(TranslateError::Unsupported {
                source_lang: source.into(),
                target_lang: target.into(),
            })
        }
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("Fever!!  see https://example.com/x and www.foo.org, ok"),
            "fever see and ok"
        );
        assert_eq!(clean_text("  Joint-pain;   rash "), "joint pain rash");
    }

    #[test]
    fn test_clean_text_keeps_bangla() {
        assert_eq!(clean_text("আমার জ্বর, মাথা ব্যথা।"), "আমার জ্বর মাথা ব্যথা");
    }

    #[test]
    fn test_stratified_split_keeps_proportions() {
        let labels: Vec<usize> = (0..40).map(|i| i % 2).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let (train, val) = stratified_split(&labels, 0.15, &mut rng);

        assert_eq!(train.len() + val.len(), 40);
        assert_eq!(val.len(), 6);
        assert_eq!(val.iter().filter(|&&i| labels[i] == 0).count(), 3);
    }

    #[test]
    fn test_single_row_class_stays_in_train() {
        let mut rng = StdRng::seed_from_u64(1);
        let (train, val) = stratified_split(&[0, 1, 1, 1, 1, 1, 1, 1], 0.5, &mut rng);
        assert!(train.contains(&0));
        assert!(!val.contains(&0));
    }

    #[test]
    fn test_train_rejects_empty() {
        assert!(matches!(
            train(&[], &TrainingOptions::default(), &LexiconTranslator::default(), "en"),
            Err(PredictError::NoTrainingData)
        ));
    }

    #[test]
    fn test_canonical_text() {
        let lexicon = LexiconTranslator::default();
        let bn = row(1, "আমার জ্বর আর কাঁপুনি", "Malaria", "bn");
        assert_eq!(canonical_text(&bn, &lexicon, "en").as_deref(), Some("আমার fever আর chills"));

        let en = row(2, "fever and chills", "Malaria", "en");
        assert_eq!(canonical_text(&en, &Offline, "en").as_deref(), Some("fever and chills"));
        assert_eq!(canonical_text(&bn, &Offline, "en"), None);

        // Untagged rows go through detection
        let untagged = row(3, "জ্বর", "Malaria", "");
        assert_eq!(canonical_text(&untagged, &lexicon, "en").as_deref(), Some("fever"));
    }

    #[test]
    fn test_train_translates_to_canonical() {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(row(i, "আমার জ্বর, কাঁপুনি আর ঘাম", "Malaria", "bn"));
            rows.push(row(100 + i, "wheezing and cough at night", "Asthma", "en"));
        }
        let options = TrainingOptions {
            dimension: 64,
            ..Default::default()
        };

        let model = train(&rows, &options, &LexiconTranslator::default(), "en").unwrap();
        let metrics = model.metrics.unwrap();
        assert_eq!(metrics.translated_rows, 10);
        assert_eq!(metrics.untranslated_rows, 0);
        assert_eq!(metrics.embedder, "hashing");
        assert_eq!(metrics.report.classes.len(), 2);
        assert_eq!(metrics.report.confusion.len(), 2);

        let model = train(&rows, &options, &Offline, "en").unwrap();
        assert_eq!(model.metrics.unwrap().untranslated_rows, 10);
    }
}
