//! Text embedders.
//!
//! - [`OnnxEmbedder`] (feature `onnx-embeddings`): a multilingual sentence
//!   encoder such as paraphrase-multilingual-MiniLM-L12-v2 exported to ONNX.
//! - [`HashingEmbedder`]: offline fallback with no model files. Each word and
//!   each character trigram of a word is hashed into one of `dimension`
//!   buckets with a hash-derived sign, then the vector is L2-normalized. It
//!   has no notion of meaning across languages, so training text and queries
//!   must be in the same language.
//!
//! [`EmbedderSpec`] is what a model directory records about its embedder;
//! [`ModelEmbedder`] is the loaded instance.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PredictError, PredictResult};
use crate::traits::Embedder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic hashing embedder; its whole state is its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashingEmbedder {
    pub dimension: usize,
    /// Mixed into every hash so different seeds give different projections
    pub seed: u64,
    /// Also hash character trigrams of each word
    #[serde(default = "default_char_ngrams")]
    pub char_ngrams: bool,
}

fn default_char_ngrams() -> bool {
    true
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(512, 42)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize, seed: u64) -> Self {
        Self {
            dimension: dimension.max(1),
            seed,
            char_ngrams: true,
        }
    }

    fn hash(&self, feature: &str) -> u64 {
        let mut h = FNV_OFFSET ^ self.seed;
        for byte in feature.as_bytes() {
            h ^= u64::from(*byte);
            h = h.wrapping_mul(FNV_PRIME);
        }
        h
    }

    fn add(&self, vec: &mut [f32], feature: &str, weight: f32) {
        let h = self.hash(feature);
        let bucket = (h % self.dimension as u64) as usize;
        let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
        vec[bucket] += sign * weight;
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> PredictResult<Vec<f32>> {
        if self.dimension == 0 {
            return Err(PredictError::Embedding("hashing embedder has dimension 0".into()));
        }
        let mut vec = vec![0.0f32; self.dimension];

        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            self.add(&mut vec, &format!("w:{}", word), 1.0);

            if self.char_ngrams {
                let chars: Vec<char> = format!("<{}>", word).chars().collect();
                for gram in chars.windows(3) {
                    let gram: String = gram.iter().collect();
                    self.add(&mut vec, &format!("c:{}", gram), 0.5);
                }
            }
        }

        let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in vec.iter_mut() {
                *x /= norm;
            }
        }
        Ok(vec)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Which embedder a model was trained with, as stored in `embedder.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbedderSpec {
    Hashing(HashingEmbedder),
    Onnx {
        /// Directory with `model.onnx` and `tokenizer.json`
        model_dir: PathBuf,
        /// Output width observed when the model was trained
        dimension: usize,
    },
}

impl EmbedderSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            EmbedderSpec::Hashing(_) => "hashing",
            EmbedderSpec::Onnx { .. } => "onnx",
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            EmbedderSpec::Hashing(h) => h.dimension,
            EmbedderSpec::Onnx { dimension, .. } => *dimension,
        }
    }

    /// Instantiate the embedder. ONNX models are read from disk.
    pub fn load(&self) -> PredictResult<ModelEmbedder> {
        match self {
            EmbedderSpec::Hashing(h) => Ok(ModelEmbedder::Hashing(h.clone())),
            EmbedderSpec::Onnx { model_dir, dimension } => {
                let embedder = load_onnx(model_dir)?;
                if *dimension != 0 && embedder.dimension() != *dimension {
                    return Err(PredictError::DimensionMismatch {
                        expected: *dimension,
                        got: embedder.dimension(),
                    });
                }
                Ok(embedder)
            }
        }
    }
}

#[cfg(feature = "onnx-embeddings")]
fn load_onnx(model_dir: &std::path::Path) -> PredictResult<ModelEmbedder> {
    Ok(ModelEmbedder::Onnx(OnnxEmbedder::load(model_dir)?))
}

#[cfg(not(feature = "onnx-embeddings"))]
fn load_onnx(model_dir: &std::path::Path) -> PredictResult<ModelEmbedder> {
    Err(PredictError::Embedding(format!(
        "model at {} needs the onnx-embeddings feature",
        model_dir.display()
    )))
}

/// A loaded embedder of any supported kind.
pub enum ModelEmbedder {
    Hashing(HashingEmbedder),
    #[cfg(feature = "onnx-embeddings")]
    Onnx(OnnxEmbedder),
}

impl Embedder for ModelEmbedder {
    fn embed(&self, text: &str) -> PredictResult<Vec<f32>> {
        match self {
            ModelEmbedder::Hashing(e) => e.embed(text),
            #[cfg(feature = "onnx-embeddings")]
            ModelEmbedder::Onnx(e) => e.embed(text),
        }
    }

    fn embed_batch(&self, texts: &[&str]) -> PredictResult<Vec<Vec<f32>>> {
        match self {
            ModelEmbedder::Hashing(e) => e.embed_batch(texts),
            #[cfg(feature = "onnx-embeddings")]
            ModelEmbedder::Onnx(e) => e.embed_batch(texts),
        }
    }

    fn dimension(&self) -> usize {
        match self {
            ModelEmbedder::Hashing(e) => e.dimension(),
            #[cfg(feature = "onnx-embeddings")]
            ModelEmbedder::Onnx(e) => e.dimension(),
        }
    }
}

#[cfg(feature = "onnx-embeddings")]
pub use onnx::OnnxEmbedder;

#[cfg(feature = "onnx-embeddings")]
mod onnx {
    use std::path::Path;
    use std::sync::Mutex;

    use ort::session::Session;
    use ort::value::TensorRef;

    use crate::error::{PredictError, PredictResult};
    use crate::traits::Embedder;

    pub const MODEL_FILE: &str = "model.onnx";
    pub const TOKENIZER_FILE: &str = "tokenizer.json";

    fn embedding_error(context: &str, err: impl std::fmt::Display) -> PredictError {
        PredictError::Embedding(format!("{}: {}", context, err))
    }

    /// Sentence encoder run through ONNX Runtime, mean-pooled over the
    /// attention mask and L2-normalized.
    ///
    /// Expects a BERT-style export taking `input_ids`, `attention_mask` and
    /// `token_type_ids` in that order, such as
    /// paraphrase-multilingual-MiniLM-L12-v2.
    ///
    /// `Session::run` needs `&mut`, hence the mutex.
    pub struct OnnxEmbedder {
        session: Mutex<Session>,
        tokenizer: tokenizers::Tokenizer,
        dimension: usize,
    }

    impl OnnxEmbedder {
        /// Load `model.onnx` and `tokenizer.json` from `model_dir`.
        pub fn load(model_dir: &Path) -> PredictResult<Self> {
            let model_path = model_dir.join(MODEL_FILE);
            let tokenizer_path = model_dir.join(TOKENIZER_FILE);
            for path in [&model_path, &tokenizer_path] {
                if !path.is_file() {
                    return Err(PredictError::Embedding(format!("missing {}", path.display())));
                }
            }

            let session = Session::builder()
                .map_err(|e| embedding_error("ONNX session", e))?
                .with_intra_threads(2)
                .map_err(|e| embedding_error("ONNX session", e))?
                .commit_from_file(&model_path)
                .map_err(|e| embedding_error("ONNX load failed", e))?;
            let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| embedding_error("Tokenizer load failed", e))?;

            let mut embedder = Self {
                session: Mutex::new(session),
                tokenizer,
                dimension: 0,
            };
            embedder.dimension = embedder.infer("a")?.len();
            tracing::info!(dir = %model_dir.display(), dimension = embedder.dimension, "ONNX embedder loaded");
            Ok(embedder)
        }

        fn infer(&self, text: &str) -> PredictResult<Vec<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| embedding_error("Tokenization failed", e))?;

            let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
            let mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&m| i64::from(m)).collect();
            let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| i64::from(t)).collect();
            let seq_len = ids.len();

            let ids_array = ndarray::Array2::from_shape_vec((1, seq_len), ids)
                .map_err(|e| embedding_error("input_ids", e))?;
            let mask_array = ndarray::Array2::from_shape_vec((1, seq_len), mask.clone())
                .map_err(|e| embedding_error("attention_mask", e))?;
            let type_array = ndarray::Array2::from_shape_vec((1, seq_len), type_ids)
                .map_err(|e| embedding_error("token_type_ids", e))?;
            let ids_tensor = TensorRef::from_array_view(&ids_array).map_err(|e| embedding_error("input_ids", e))?;
            let mask_tensor =
                TensorRef::from_array_view(&mask_array).map_err(|e| embedding_error("attention_mask", e))?;
            let type_tensor =
                TensorRef::from_array_view(&type_array).map_err(|e| embedding_error("token_type_ids", e))?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| PredictError::Embedding("ONNX session lock poisoned".into()))?;
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_tensor])
                .map_err(|e| embedding_error("ONNX inference failed", e))?;

            // Token embeddings: [1, seq_len, hidden]
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| embedding_error("ONNX output", e))?;
            if shape.len() != 3 || shape[1] as usize != seq_len {
                return Err(PredictError::Embedding(format!(
                    "unexpected output shape {:?} for {} tokens",
                    shape, seq_len
                )));
            }
            let hidden = shape[2] as usize;

            let mut pooled = vec![0.0f32; hidden];
            let mut mask_sum = 0.0f32;
            for (token, &m) in mask.iter().enumerate() {
                let m = m as f32;
                mask_sum += m;
                let row = &data[token * hidden..(token + 1) * hidden];
                for (p, v) in pooled.iter_mut().zip(row) {
                    *p += v * m;
                }
            }
            if mask_sum > 0.0 {
                pooled.iter_mut().for_each(|p| *p /= mask_sum);
            }

            let norm = pooled.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                pooled.iter_mut().for_each(|p| *p /= norm);
            }
            Ok(pooled)
        }
    }

    impl Embedder for OnnxEmbedder {
        fn embed(&self, text: &str) -> PredictResult<Vec<f32>> {
            self.infer(text)
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_dimension_and_norm() {
        let embedder = HashingEmbedder::new(64, 1);
        let v = embedder.embed("fever and headache").unwrap();
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_is_zero() {
        let embedder = HashingEmbedder::default();
        let v = embedder.embed("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_deterministic_and_case_insensitive() {
        let embedder = HashingEmbedder::new(128, 7);
        assert_eq!(embedder.embed("Fever Rash").unwrap(), embedder.embed("fever rash").unwrap());
    }

    #[test]
    fn test_similar_texts_are_closer() {
        let embedder = HashingEmbedder::new(256, 42);
        let a = embedder.embed("high fever with joint pain").unwrap();
        let b = embedder.embed("fever and joint pain").unwrap();
        let c = embedder.embed("itchy skin rash on arms").unwrap();
        assert!(cosine(&a, &b) > cosine(&a, &c));
    }

    #[test]
    fn test_bangla_text_embeds() {
        let embedder = HashingEmbedder::new(64, 42);
        let v = embedder.embed("আমার জ্বর").unwrap();
        assert!(v.iter().any(|x| *x != 0.0));
    }

    #[test]
    fn test_zero_dimension_is_an_error() {
        let embedder: HashingEmbedder = serde_json::from_str(r#"{"dimension":0,"seed":1}"#).unwrap();
        assert!(matches!(embedder.embed("fever"), Err(PredictError::Embedding(_))));
    }

    #[test]
    fn test_spec_records_kind() {
        let spec = EmbedderSpec::Hashing(HashingEmbedder::new(16, 3));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "hashing");
        assert_eq!(json["dimension"], 16);

        let back: EmbedderSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
        assert_eq!(back.load().unwrap().dimension(), 16);
    }

    #[test]
    fn test_onnx_spec_without_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let spec = EmbedderSpec::Onnx {
            model_dir: dir.path().to_path_buf(),
            dimension: 384,
        };
        assert_eq!(spec.kind(), "onnx");
        assert!(matches!(spec.load(), Err(PredictError::Embedding(_))));
    }

    #[test]
    fn test_batch_matches_single() {
        let embedder = HashingEmbedder::new(32, 3);
        let batch = embedder.embed_batch(&["cough", "fever"]).unwrap();
        assert_eq!(batch[1], embedder.embed("fever").unwrap());
    }
}
