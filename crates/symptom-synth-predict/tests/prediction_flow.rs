//! Generate → train → load → predict, end to end.

use std::cell::Cell;

use symptom_synth_core::dataset::{rows_from_samples, write_csv_file};
use symptom_synth_core::{DatasetGenerator, GeneratorConfig, Language, SeedCatalog};
use symptom_synth_predict::classifier::LabelEncoder;
use symptom_synth_predict::translate::TranslateResult;
use symptom_synth_predict::{
    build_report, load_or_train, train, Classifier, Embedder, ExplainOptions, LexiconTranslator,
    ModelArtifacts, PredictError, PredictResult, PredictionService, PredictorConfig, TrainingOptions,
    Translator,
};

fn generate(config: GeneratorConfig) -> Vec<symptom_synth_core::DatasetRow> {
    let report = DatasetGenerator::new(SeedCatalog::builtin(), config)
        .unwrap()
        .generate_seeded()
        .unwrap();
    rows_from_samples(&report.samples)
}

fn english_dataset() -> Vec<symptom_synth_core::DatasetRow> {
    generate(GeneratorConfig {
        diseases: vec!["Malaria".into(), "Asthma".into(), "Migraine".into()],
        per_disease: 40,
        languages: vec![Language::En],
        ..Default::default()
    })
}

/// A remote service that reports Bangla and always returns the same English.
struct FixedTranslator(&'static str);

impl Translator for FixedTranslator {
    fn detect(&self, _text: &str) -> TranslateResult<String> {
        Ok("bn".into())
    }

    fn translate(&self, _text: &str, _source: &str, _target: &str) -> TranslateResult<String> {
        Ok(self.0.to_string())
    }
}

/// Counts calls so tests can assert the model was never reached.
struct CountingEmbedder {
    calls: Cell<usize>,
}

impl Embedder for CountingEmbedder {
    fn embed(&self, _text: &str) -> PredictResult<Vec<f32>> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![1.0, 0.0])
    }

    fn dimension(&self) -> usize {
        2
    }
}

struct Uniform(usize);

impl Classifier for Uniform {
    fn predict_proba(&self, _features: &[f32]) -> PredictResult<Vec<f64>> {
        Ok(vec![1.0 / self.0 as f64; self.0])
    }

    fn num_classes(&self) -> usize {
        self.0
    }
}

#[test]
fn short_input_never_reaches_model() {
    let embedder = CountingEmbedder { calls: Cell::new(0) };
    let service = PredictionService::new(
        &embedder,
        Uniform(2),
        LabelEncoder::fit(["Asthma", "Flu"]),
        LexiconTranslator::default(),
    )
    .with_explain_options(ExplainOptions {
        num_samples: 0,
        ..Default::default()
    });

    let result = build_report(&service, &[], "fe");
    assert!(matches!(result, Err(PredictError::InputRejected { .. })));
    assert_eq!(embedder.calls.get(), 0);

    let report = build_report(&service, &[], "flu").unwrap();
    assert_eq!(embedder.calls.get(), 1);
    assert!(report.explanation.is_none());
}

#[test]
fn trained_model_recognizes_its_classes() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("synthetic_data.csv");
    let rows = english_dataset();
    write_csv_file(&dataset_path, &rows).unwrap();

    let config = PredictorConfig {
        model_dir: dir.path().join("model"),
        dataset_path: dataset_path.clone(),
        training: TrainingOptions {
            dimension: 256,
            ..Default::default()
        },
        ..Default::default()
    };

    // First call trains and saves, second call loads the same model
    let translator = LexiconTranslator::default();
    let trained = load_or_train(&config, &translator).unwrap();
    assert!(ModelArtifacts::exists(&config.model_dir));
    let loaded = load_or_train(&config, &translator).unwrap();
    assert_eq!(loaded.labels, trained.labels);

    let metrics = loaded.metrics.clone().unwrap();
    assert_eq!(metrics.embedder, "hashing");
    assert_eq!(metrics.report.classes.len(), 3);
    assert_eq!(metrics.report.confusion.len(), 3);
    assert!(config.model_dir.join("classification_report.csv").is_file());

    let service = PredictionService::from_artifacts(loaded, translator).unwrap();
    let report = build_report(
        &service,
        &rows,
        "I have had wheezing and shortness of breath since last night.",
    )
    .unwrap();

    let top = &report.prediction.top_k;
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].disease, "Asthma");
    assert!(top.windows(2).all(|w| w[0].probability >= w[1].probability));
    assert!((0.0..=1.0).contains(&report.prediction.uncertainty));
    assert_eq!(report.insights.len(), 3);
    assert_eq!(report.prediction.detected_language, "en");

    let explanation = report.explanation.unwrap();
    assert_eq!(explanation.disease, "Asthma");
    assert!(!explanation.tokens.is_empty() && explanation.tokens.len() <= 5);
}

#[test]
fn bangla_training_answers_english_query() {
    // Default languages: every training row is Bangla
    let rows = generate(GeneratorConfig {
        diseases: vec![
            "Malaria".into(),
            "Dengue Fever".into(),
            "Typhoid Fever".into(),
            "Asthma".into(),
            "Migraine".into(),
        ],
        per_disease: 60,
        ..Default::default()
    });
    assert!(rows.iter().all(|r| r.language == "bn"));

    let artifacts = train(&rows, &TrainingOptions::default(), &LexiconTranslator::default(), "en").unwrap();
    let metrics = artifacts.metrics.clone().unwrap();
    assert!(metrics.translated_rows > rows.len() / 2, "{} translated", metrics.translated_rows);
    assert_eq!(metrics.untranslated_rows, 0);

    let service = PredictionService::from_artifacts(
        artifacts,
        FixedTranslator("I have fever, chills and sweating for 2 days"),
    )
    .unwrap();
    let prediction = service.predict("আমার ২ দিন ধরে জ্বর, কাঁপুনি আর ঘাম হচ্ছে").unwrap();

    assert_eq!(prediction.detected_language, "bn");
    assert_eq!(prediction.model_input, "i have fever chills and sweating for 2 days");
    assert_eq!(prediction.top_k[0].disease, "Malaria");
}
