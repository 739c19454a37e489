//! Language detection and translation backends.
//!
//! `LexiconTranslator` works offline: it detects Bangla by script and
//! translates symptom phrases through the generator's lexicon.
//! `HttpTranslator` talks to a LibreTranslate-compatible server.

use regex::Regex;
use symptom_synth_core::generator::Lexicon;
use thiserror::Error;

use crate::traits::Translator;

/// Translation errors. Callers treat all of them as "fall back".
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Cannot connect to translation service at {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Translation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Response(String),

    #[error("Translation {source_lang} -> {target_lang} not supported")]
    Unsupported {
        source_lang: String,
        target_lang: String,
    },
}

pub type TranslateResult<T> = Result<T, TranslateError>;

/// Whether `c` is in the Bengali Unicode block.
pub fn is_bengali_char(c: char) -> bool {
    ('\u{0980}'..='\u{09FF}').contains(&c)
}

/// `bn` when most letters are Bengali script, else `fallback`.
pub fn detect_by_script(text: &str, fallback: &str) -> String {
    let mut bengali = 0usize;
    let mut letters = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic() || is_bengali_char(*c)) {
        letters += 1;
        if is_bengali_char(c) {
            bengali += 1;
        }
    }
    if letters > 0 && bengali * 2 >= letters {
        "bn".to_string()
    } else {
        fallback.to_string()
    }
}

/// One symptom phrase and the pattern that finds it.
#[derive(Debug, Clone)]
struct Phrase {
    pattern: Regex,
    replacement: String,
}

impl Phrase {
    fn new(from: &str, to: &str) -> Self {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(from))).expect("escaped literal");
        Self {
            pattern,
            replacement: to.to_string(),
        }
    }
}

/// Phrase table ordered longest source first, so "severe headache" wins
/// over "headache".
fn phrase_table(mut pairs: Vec<(String, String)>) -> Vec<Phrase> {
    pairs.retain(|(from, to)| !from.is_empty() && from != to);
    pairs.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()).then(a.0.cmp(&b.0)));
    pairs.dedup_by(|a, b| a.0 == b.0);
    pairs.iter().map(|(from, to)| Phrase::new(from, to)).collect()
}

fn replace_all(phrases: &[Phrase], text: &str) -> String {
    let mut out = text.to_string();
    for phrase in phrases {
        if phrase.pattern.is_match(&out) {
            out = phrase
                .pattern
                .replace_all(&out, regex::NoExpand(&phrase.replacement))
                .into_owned();
        }
    }
    out
}

/// Offline translator built on the symptom lexicon.
///
/// Detection is by script. Translation into English swaps Bangla and
/// Banglish symptom phrases for their English names; translation into Bangla
/// does the reverse. Connecting words stay untranslated, so the output is
/// only as good as the lexicon's symptom coverage.
#[derive(Debug, Clone)]
pub struct LexiconTranslator {
    default_language: String,
    to_english: Vec<Phrase>,
    to_bangla: Vec<Phrase>,
}

impl LexiconTranslator {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self::with_lexicon(default_language, &Lexicon::new())
    }

    pub fn with_lexicon(default_language: impl Into<String>, lexicon: &Lexicon) -> Self {
        let mut to_english = Vec::new();
        let mut to_bangla = Vec::new();
        for (en, bn) in lexicon.entries() {
            to_english.push((bn.to_string(), en.to_string()));
            to_english.push((lexicon.to_banglish(en), en.to_string()));
            to_bangla.push((en.to_string(), bn.to_string()));
        }

        Self {
            default_language: default_language.into(),
            to_english: phrase_table(to_english),
            to_bangla: phrase_table(to_bangla),
        }
    }
}

impl Default for LexiconTranslator {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Translator for LexiconTranslator {
    fn detect(&self, text: &str) -> TranslateResult<String> {
        Ok(detect_by_script(text, &self.default_language))
    }

    fn translate(&self, text: &str, source: &str, target: &str) -> TranslateResult<String> {
        match (source, target) {
            (s, t) if s == t => Ok(text.to_string()),
            ("bn" | "banglish" | "mixed", "en") => Ok(replace_all(&self.to_english, text)),
            ("en", "bn") => Ok(replace_all(&self.to_bangla, text)),
            _ => Err(TranslateError::Unsupported {
                source_lang: source.to_string(),
                target_lang: target.to_string(),
            }),
        }
    }
}

#[cfg(feature = "http-translate")]
pub use http::HttpTranslator;

#[cfg(feature = "http-translate")]
mod http {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::{TranslateError, TranslateResult};
    use crate::traits::Translator;

    /// Client for a LibreTranslate-compatible HTTP API.
    pub struct HttpTranslator {
        base_url: String,
        api_key: Option<String>,
        client: reqwest::blocking::Client,
    }

    #[derive(Serialize)]
    struct DetectRequest<'a> {
        q: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        api_key: Option<&'a str>,
    }

    #[derive(Deserialize)]
    struct Detection {
        language: String,
        #[serde(default)]
        confidence: f64,
    }

    #[derive(Serialize)]
    struct TranslateRequest<'a> {
        q: &'a str,
        source: &'a str,
        target: &'a str,
        format: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        api_key: Option<&'a str>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct TranslateResponse {
        translated_text: String,
    }

    impl HttpTranslator {
        pub fn new(base_url: &str, timeout_secs: u64) -> TranslateResult<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(|e| TranslateError::Http(e.to_string()))?;

            Ok(Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: None,
                client,
            })
        }

        pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
            self.api_key = Some(key.into());
            self
        }

        fn post<B: Serialize, T: for<'de> Deserialize<'de>>(&self, path: &str, body: &B) -> TranslateResult<T> {
            let url = format!("{}/{}", self.base_url, path);
            let response = self.client.post(&url).json(body).send().map_err(|e| {
                if e.is_connect() {
                    TranslateError::Connection(self.base_url.clone())
                } else {
                    TranslateError::Http(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(TranslateError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            response
                .json()
                .map_err(|e| TranslateError::Response(e.to_string()))
        }
    }

    impl Translator for HttpTranslator {
        fn detect(&self, text: &str) -> TranslateResult<String> {
            let body = DetectRequest {
                q: text,
                api_key: self.api_key.as_deref(),
            };
            let detections: Vec<Detection> = self.post("detect", &body)?;
            detections
                .into_iter()
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
                .map(|d| d.language)
                .ok_or_else(|| TranslateError::Response("empty detection list".into()))
        }

        fn translate(&self, text: &str, source: &str, target: &str) -> TranslateResult<String> {
            if source == target {
                return Ok(text.to_string());
            }
            // Dataset tags that are not ISO codes
            let source = match source {
                "banglish" | "mixed" => "auto",
                other => other,
            };
            let body = TranslateRequest {
                q: text,
                source,
                target,
                format: "text",
                api_key: self.api_key.as_deref(),
            };
            let response: TranslateResponse = self.post("translate", &body)?;
            Ok(response.translated_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_bangla_script() {
        assert_eq!(detect_by_script("আমার জ্বর হয়েছে", "en"), "bn");
        assert_eq!(detect_by_script("I have fever", "en"), "en");
        assert_eq!(detect_by_script("amar jor", "en"), "en");
        assert_eq!(detect_by_script("123 !!", "en"), "en");
    }

    #[test]
    fn test_mixed_text_majority() {
        // Mostly English letters with a short Bangla closing
        assert_eq!(detect_by_script("fever and headache since morning ধন্যবাদ", "en"), "en");
    }

    #[test]
    fn test_lexicon_translator_to_english() {
        let t = LexiconTranslator::default();
        assert_eq!(t.translate("jor", "en", "en").unwrap(), "jor");
        assert_eq!(
            t.translate("আমার জ্বর, কাঁপুনি আর ঘাম হচ্ছে", "bn", "en").unwrap(),
            "আমার fever, chills আর sweating হচ্ছে"
        );
        // Longer phrase is replaced before its suffix
        assert_eq!(t.translate("চরম মাথা ব্যথা", "bn", "en").unwrap(), "severe headache");
        assert_eq!(t.translate("I have matha byatha", "banglish", "en").unwrap(), "I have headache");
    }

    #[test]
    fn test_lexicon_translator_to_bangla() {
        let t = LexiconTranslator::default();
        assert_eq!(t.translate("Fever and cough", "en", "bn").unwrap(), "জ্বর and কাশি");
        // Whole words only
        assert_eq!(t.translate("coughing", "en", "bn").unwrap(), "coughing");
    }

    #[test]
    fn test_lexicon_translator_unsupported_pair() {
        let t = LexiconTranslator::default();
        assert!(matches!(
            t.translate("fever", "fr", "en"),
            Err(TranslateError::Unsupported { .. })
        ));
    }
}
