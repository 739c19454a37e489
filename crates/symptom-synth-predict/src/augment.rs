//! Dataset augmentation by machine translation.

use symptom_synth_core::dataset::max_id;
use symptom_synth_core::DatasetRow;
use tracing::{info, warn};

use crate::traits::Translator;

/// Outcome of [`translate_rows`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentSummary {
    /// Rows in the source language
    pub candidates: usize,
    pub translated: usize,
    pub failed: usize,
}

/// Translate every `source`-language row into `target` and return the new
/// rows. Ids continue after the largest id in `rows`.
///
/// The text, reasoning and recommendation columns are translated; a row
/// where any of them fails is skipped with a warning.
pub fn translate_rows<T: Translator>(
    rows: &[DatasetRow],
    translator: &T,
    source: &str,
    target: &str,
) -> (Vec<DatasetRow>, AugmentSummary) {
    let mut next_id = max_id(rows).map(|id| id + 1).unwrap_or(1);
    let mut summary = AugmentSummary::default();
    let mut added = Vec::new();

    for row in rows.iter().filter(|r| r.language == source) {
        summary.candidates += 1;

        let translated = translator
            .translate(&row.input_text, source, target)
            .and_then(|text| {
                let reasoning = translator.translate(&row.reasoning_keywords, source, target)?;
                let recommendations = translator.translate(&row.recommendations, source, target)?;
                Ok((text, reasoning, recommendations))
            });

        match translated {
            Ok((input_text, reasoning_keywords, recommendations)) => {
                added.push(DatasetRow {
                    id: next_id,
                    input_text,
                    reasoning_keywords,
                    recommendations,
                    language: target.to_string(),
                    ..row.clone()
                });
                next_id += 1;
                summary.translated += 1;
            }
            Err(err) => {
                warn!(id = row.id, error = %err, "Skipping row, translation failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        candidates = summary.candidates,
        translated = summary.translated,
        failed = summary.failed,
        source,
        target,
        "Translation augmentation finished"
    );
    (added, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{TranslateError, TranslateResult};

    /// Uppercases text; fails on anything containing "bad".
    struct UpperTranslator;

    impl Translator for UpperTranslator {
        fn detect(&self, _text: &str) -> TranslateResult<String> {
            Ok("en".into())
        }

        fn translate(&self, text: &str, _s: &str, _t: &str) -> TranslateResult<String> {
            if text.contains("bad") {
                Err(TranslateError::Response("bad input".into()))
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    fn row(id: u64, text: &str, language: &str) -> DatasetRow {
        DatasetRow {
            id,
            input_text: text.into(),
            predicted_diseases: "Flu,Asthma,COPD".into(),
            probabilities: "0.70,0.20,0.10".into(),
            lime_explainability: "fever".into(),
            reasoning_keywords: "fever".into(),
            recommendations: "rest".into(),
            uncertainty_score: "0.73".into(),
            language: language.into(),
        }
    }

    #[test]
    fn test_translates_source_rows_only() {
        let rows = vec![
            row(10, "fever", "en"),
            row(11, "jor", "bn"),
            row(12, "bad text", "en"),
            row(13, "cough", "en"),
        ];

        let (added, summary) = translate_rows(&rows, &UpperTranslator, "en", "bn");

        assert_eq!(summary, AugmentSummary { candidates: 3, translated: 2, failed: 1 });
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].id, 14);
        assert_eq!(added[0].input_text, "FEVER");
        assert_eq!(added[0].recommendations, "REST");
        assert_eq!(added[0].language, "bn");
        assert_eq!(added[0].predicted_diseases, "Flu,Asthma,COPD");
        assert_eq!(added[1].id, 15);
        assert_eq!(added[1].input_text, "COUGH");
    }

    #[test]
    fn test_empty_dataset() {
        let (added, summary) = translate_rows(&[], &UpperTranslator, "en", "bn");
        assert!(added.is_empty());
        assert_eq!(summary.candidates, 0);
    }
}
