//! Perturbation explanations for a single prediction.
//!
//! Words are removed from the text at random, every perturbed text is scored
//! again, and a weighted ridge regression of the class probability on word
//! presence gives each word a weight. Samples that keep more of the original
//! words count more (exponential kernel over cosine distance), the same
//! scheme LIME's text explainer uses.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{PredictError, PredictResult};
use crate::traits::{Classifier, Embedder};

/// Explainer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainOptions {
    /// Words reported, highest absolute weight first
    pub num_features: usize,
    /// Perturbed texts scored, the original included. 0 turns explanations off.
    pub num_samples: usize,
    /// Kernel width over distances scaled to 0..100
    pub kernel_width: f64,
    /// Ridge penalty
    pub alpha: f64,
    pub seed: u64,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            num_features: 5,
            num_samples: 300,
            kernel_width: 25.0,
            alpha: 1.0,
            seed: 42,
        }
    }
}

/// One word and its contribution to the explained class probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenWeight {
    pub token: String,
    pub weight: f64,
}

/// Word weights behind one predicted disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub disease: String,
    pub probability: f64,
    pub tokens: Vec<TokenWeight>,
}

impl Explanation {
    /// `word (+0.412), word (-0.031)`
    pub fn summary(&self) -> String {
        self.tokens
            .iter()
            .map(|t| format!("{} ({:+.3})", t.token, t.weight))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Weight the words of `text` by their effect on the probability of `class`.
///
/// `text` should already be in the form the model sees (cleaned, canonical
/// language). Removing a word removes every occurrence of it.
pub fn explain<E, C>(
    embedder: &E,
    classifier: &C,
    text: &str,
    class: usize,
    options: &ExplainOptions,
) -> PredictResult<Vec<TokenWeight>>
where
    E: Embedder + ?Sized,
    C: Classifier + ?Sized,
{
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut vocab: Vec<&str> = Vec::new();
    let positions: Vec<usize> = words
        .iter()
        .map(|w| match vocab.iter().position(|v| v == w) {
            Some(i) => i,
            None => {
                vocab.push(w);
                vocab.len() - 1
            }
        })
        .collect();

    let d = vocab.len();
    if d == 0 || options.num_samples == 0 || options.num_features == 0 {
        return Ok(Vec::new());
    }

    // Step 1: presence masks, the first one is the original text
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut masks = vec![vec![true; d]];
    for _ in 1..options.num_samples {
        let remove = rng.gen_range(1..=d);
        let mut mask = vec![true; d];
        for i in index::sample(&mut rng, d, remove) {
            mask[i] = false;
        }
        masks.push(mask);
    }

    // Step 2: score the perturbed texts
    let texts: Vec<String> = masks
        .iter()
        .map(|mask| {
            words
                .iter()
                .zip(&positions)
                .filter(|(_, &p)| mask[p])
                .map(|(w, _)| *w)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
    let features = embedder.embed_batch(&refs)?;

    let mut y = Vec::with_capacity(features.len());
    for f in &features {
        let probs = classifier.predict_proba(f)?;
        y.push(*probs.get(class).ok_or(PredictError::UnknownClass(class))?);
    }

    // Step 3: kernel weights from cosine distance to the all-present mask
    let weights: Vec<f64> = masks
        .iter()
        .map(|mask| {
            let kept = mask.iter().filter(|m| **m).count() as f64;
            let distance = (1.0 - (kept / d as f64).sqrt()) * 100.0;
            (-(distance * distance) / (options.kernel_width * options.kernel_width))
                .exp()
                .sqrt()
        })
        .collect();
    let x: Vec<Vec<f64>> = masks
        .iter()
        .map(|mask| mask.iter().map(|&m| if m { 1.0 } else { 0.0 }).collect())
        .collect();

    // Step 4: fit on every word, keep the strongest, refit on those
    let all: Vec<usize> = (0..d).collect();
    let coefs = weighted_ridge(&x, &y, &weights, &all, options.alpha)?;
    let mut selected = all;
    selected.sort_by(|&a, &b| coefs[b].abs().total_cmp(&coefs[a].abs()).then(a.cmp(&b)));
    selected.truncate(options.num_features);

    let coefs = weighted_ridge(&x, &y, &weights, &selected, options.alpha)?;
    let mut tokens: Vec<TokenWeight> = selected
        .iter()
        .zip(coefs)
        .map(|(&i, weight)| TokenWeight {
            token: vocab[i].to_string(),
            weight,
        })
        .collect();
    tokens.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));
    Ok(tokens)
}

/// Ridge regression with intercept and sample weights over the `columns` of
/// `x`. Returns one coefficient per column.
fn weighted_ridge(x: &[Vec<f64>], y: &[f64], w: &[f64], columns: &[usize], alpha: f64) -> PredictResult<Vec<f64>> {
    let k = columns.len();
    let wsum: f64 = w.iter().sum();
    if wsum <= 0.0 {
        return Ok(vec![0.0; k]);
    }

    let x_mean: Vec<f64> = columns
        .iter()
        .map(|&c| x.iter().zip(w).map(|(row, wi)| wi * row[c]).sum::<f64>() / wsum)
        .collect();
    let y_mean = y.iter().zip(w).map(|(yi, wi)| wi * yi).sum::<f64>() / wsum;

    let mut a = vec![vec![0.0; k]; k];
    let mut b = vec![0.0; k];
    for ((row, yi), wi) in x.iter().zip(y).zip(w) {
        let centered: Vec<f64> = columns.iter().zip(&x_mean).map(|(&c, m)| row[c] - m).collect();
        let dy = yi - y_mean;
        for i in 0..k {
            b[i] += wi * centered[i] * dy;
            for j in 0..k {
                a[i][j] += wi * centered[i] * centered[j];
            }
        }
    }
    for (i, row) in a.iter_mut().enumerate() {
        row[i] += alpha;
    }

    solve_spd(a, b).ok_or_else(|| PredictError::Classifier("explanation fit is singular".into()))
}

/// Solve `a · x = b` for symmetric positive definite `a` (Cholesky).
fn solve_spd(a: Vec<Vec<f64>>, b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                let diag = a[i][i] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[i][j] = diag.sqrt();
            } else {
                l[i][j] = (a[i][j] - sum) / l[j][j];
            }
        }
    }

    // L · z = b, then Lᵀ · x = z
    let mut z = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|k| l[i][k] * z[k]).sum();
        z[i] = (b[i] - sum) / l[i][i];
    }
    let mut out = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|k| l[k][i] * out[k]).sum();
        out[i] = (z[i] - sum) / l[i][i];
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One feature per watched word: 1 when present.
    struct WordPresence(Vec<&'static str>);

    impl Embedder for WordPresence {
        fn embed(&self, text: &str) -> PredictResult<Vec<f32>> {
            Ok(self
                .0
                .iter()
                .map(|w| if text.split_whitespace().any(|t| t == *w) { 1.0 } else { 0.0 })
                .collect())
        }

        fn dimension(&self) -> usize {
            self.0.len()
        }
    }

    /// P(class 0) = 0.1 + 0.8 · feature 0.
    struct FirstFeature;

    impl Classifier for FirstFeature {
        fn predict_proba(&self, features: &[f32]) -> PredictResult<Vec<f64>> {
            let p = 0.1 + 0.8 * f64::from(features[0]);
            Ok(vec![p, 1.0 - p])
        }

        fn num_classes(&self) -> usize {
            2
        }
    }

    fn embedder() -> WordPresence {
        WordPresence(vec!["fever", "cough", "night"])
    }

    #[test]
    fn test_driving_word_ranks_first() {
        let tokens = explain(
            &embedder(),
            &FirstFeature,
            "fever and cough at night",
            0,
            &ExplainOptions::default(),
        )
        .unwrap();

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].token, "fever");
        assert!(tokens[0].weight > 0.5, "weight {}", tokens[0].weight);
        for t in &tokens[1..] {
            assert!(t.weight.abs() < 0.05, "{} has weight {}", t.token, t.weight);
        }
    }

    #[test]
    fn test_weight_sign_follows_class() {
        let tokens = explain(&embedder(), &FirstFeature, "fever and cough", 1, &ExplainOptions::default()).unwrap();
        assert_eq!(tokens[0].token, "fever");
        assert!(tokens[0].weight < -0.5);
    }

    #[test]
    fn test_num_features_and_repeats() {
        let options = ExplainOptions {
            num_features: 2,
            ..Default::default()
        };
        let tokens = explain(&embedder(), &FirstFeature, "fever fever cough night", 0, &options).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token, "fever");
    }

    #[test]
    fn test_deterministic() {
        let options = ExplainOptions::default();
        let a = explain(&embedder(), &FirstFeature, "fever and cough", 0, &options).unwrap();
        let b = explain(&embedder(), &FirstFeature, "fever and cough", 0, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_or_disabled() {
        let options = ExplainOptions::default();
        assert!(explain(&embedder(), &FirstFeature, "   ", 0, &options).unwrap().is_empty());

        let off = ExplainOptions {
            num_samples: 0,
            ..Default::default()
        };
        assert!(explain(&embedder(), &FirstFeature, "fever", 0, &off).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_class() {
        assert!(matches!(
            explain(&embedder(), &FirstFeature, "fever", 5, &ExplainOptions::default()),
            Err(PredictError::UnknownClass(5))
        ));
    }

    #[test]
    fn test_solve_spd() {
        let x = solve_spd(vec![vec![4.0, 2.0], vec![2.0, 3.0]], vec![2.0, 1.0]).unwrap();
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
        assert!(solve_spd(vec![vec![0.0]], vec![1.0]).is_none());
    }

    #[test]
    fn test_summary() {
        let explanation = Explanation {
            disease: "Malaria".into(),
            probability: 0.8,
            tokens: vec![
                TokenWeight {
                    token: "chills".into(),
                    weight: 0.4123,
                },
                TokenWeight {
                    token: "and".into(),
                    weight: -0.01,
                },
            ],
        };
        assert_eq!(explanation.summary(), "chills (+0.412), and (-0.010)");
    }
}
