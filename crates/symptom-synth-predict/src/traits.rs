//! Capability interfaces for the collaborators behind a prediction.

use crate::error::PredictResult;
use crate::translate::TranslateResult;

/// Turns text into a fixed-length feature vector.
pub trait Embedder {
    fn embed(&self, text: &str) -> PredictResult<Vec<f32>>;

    fn embed_batch(&self, texts: &[&str]) -> PredictResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> usize;
}

/// Scores a feature vector against every class.
pub trait Classifier {
    /// Probability per class index; sums to 1.
    fn predict_proba(&self, features: &[f32]) -> PredictResult<Vec<f64>>;

    fn num_classes(&self) -> usize;
}

/// Language detection and translation.
pub trait Translator {
    /// Language tag of `text`, e.g. `en` or `bn`.
    fn detect(&self, text: &str) -> TranslateResult<String>;

    fn translate(&self, text: &str, source: &str, target: &str) -> TranslateResult<String>;
}

impl<T: Embedder + ?Sized> Embedder for &T {
    fn embed(&self, text: &str) -> PredictResult<Vec<f32>> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> PredictResult<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn embed(&self, text: &str) -> PredictResult<Vec<f32>> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> PredictResult<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn detect(&self, text: &str) -> TranslateResult<String> {
        (**self).detect(text)
    }

    fn translate(&self, text: &str, source: &str, target: &str) -> TranslateResult<String> {
        (**self).translate(text, source, target)
    }
}
