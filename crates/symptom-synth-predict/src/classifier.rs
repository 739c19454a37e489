//! Label encoding, feature scaling and the centroid classifier.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{PredictError, PredictResult};
use crate::traits::Classifier;

/// Maps disease names to dense class indices (sorted order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the sorted set of distinct labels.
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: BTreeSet<&str> = labels.into_iter().collect();
        Self {
            classes: classes.into_iter().map(String::from).collect(),
        }
    }

    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(|s| s.as_str())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Per-feature standardization (zero mean, unit variance).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl FeatureScaler {
    /// Fit on rows of equal length. Constant features get a scale of 1.
    pub fn fit(rows: &[Vec<f32>]) -> PredictResult<Self> {
        let dim = rows.first().map(|r| r.len()).ok_or(PredictError::NoTrainingData)?;
        let n = rows.len() as f64;

        let mut mean = vec![0.0f64; dim];
        for row in rows {
            check_dim(dim, row.len())?;
            for (m, x) in mean.iter_mut().zip(row) {
                *m += f64::from(*x);
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0f64; dim];
        for row in rows {
            for ((v, x), m) in var.iter_mut().zip(row).zip(&mean) {
                let d = f64::from(*x) - m;
                *v += d * d;
            }
        }

        let scale = var
            .iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > 1e-12 {
                    std as f32
                } else {
                    1.0
                }
            })
            .collect();

        Ok(Self {
            mean: mean.into_iter().map(|m| m as f32).collect(),
            scale,
        })
    }

    pub fn transform(&self, features: &[f32]) -> PredictResult<Vec<f32>> {
        check_dim(self.mean.len(), features.len())?;
        Ok(features
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((x, m), s)| (x - m) / s)
            .collect())
    }
}

/// Nearest-centroid classifier with softmax over cosine similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidClassifier {
    /// One centroid per class index
    pub centroids: Vec<Vec<f32>>,
    /// Softmax temperature; lower is sharper
    pub temperature: f32,
}

impl CentroidClassifier {
    /// Average the features of each class.
    ///
    /// Classes with no rows keep a zero centroid and score a similarity of 0.
    pub fn fit(
        features: &[Vec<f32>],
        labels: &[usize],
        num_classes: usize,
        temperature: f32,
    ) -> PredictResult<Self> {
        if features.len() != labels.len() {
            return Err(PredictError::Classifier(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let dim = features.first().map(|f| f.len()).ok_or(PredictError::NoTrainingData)?;

        let mut sums = vec![vec![0.0f32; dim]; num_classes];
        let mut counts = vec![0usize; num_classes];
        for (row, &label) in features.iter().zip(labels) {
            check_dim(dim, row.len())?;
            let sum = sums.get_mut(label).ok_or(PredictError::UnknownClass(label))?;
            for (s, x) in sum.iter_mut().zip(row) {
                *s += x;
            }
            counts[label] += 1;
        }

        for (sum, count) in sums.iter_mut().zip(&counts) {
            if *count > 0 {
                sum.iter_mut().for_each(|s| *s /= *count as f32);
            }
        }

        Ok(Self {
            centroids: sums,
            temperature: if temperature > 0.0 { temperature } else { 0.1 },
        })
    }

    pub fn dimension(&self) -> usize {
        self.centroids.first().map(|c| c.len()).unwrap_or(0)
    }
}

impl Classifier for CentroidClassifier {
    fn predict_proba(&self, features: &[f32]) -> PredictResult<Vec<f64>> {
        if self.centroids.is_empty() {
            return Err(PredictError::Classifier("model has no classes".into()));
        }
        check_dim(self.dimension(), features.len())?;

        let scores: Vec<f64> = self
            .centroids
            .iter()
            .map(|c| f64::from(cosine(features, c)) / f64::from(self.temperature))
            .collect();
        Ok(softmax(&scores))
    }

    fn num_classes(&self) -> usize {
        self.centroids.len()
    }
}

/// Standardize features, then score with the centroid model.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledClassifier {
    pub scaler: FeatureScaler,
    pub model: CentroidClassifier,
}

impl Classifier for ScaledClassifier {
    fn predict_proba(&self, features: &[f32]) -> PredictResult<Vec<f64>> {
        let scaled = self.scaler.transform(features)?;
        self.model.predict_proba(&scaled)
    }

    fn num_classes(&self) -> usize {
        self.model.num_classes()
    }
}

fn check_dim(expected: usize, got: usize) -> PredictResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(PredictError::DimensionMismatch { expected, got })
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

/// Numerically stable softmax.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_sorted() {
        let le = LabelEncoder::fit(["Malaria", "Asthma", "Malaria", "Flu"]);
        assert_eq!(le.classes(), &["Asthma", "Flu", "Malaria"]);
        assert_eq!(le.transform("Malaria"), Some(2));
        assert_eq!(le.transform("Dengue"), None);
        assert_eq!(le.inverse_transform(1), Some("Flu"));
        assert_eq!(le.inverse_transform(3), None);
    }

    #[test]
    fn test_scaler() {
        let rows = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        let scaler = FeatureScaler::fit(&rows).unwrap();
        assert_eq!(scaler.mean, vec![2.0, 5.0]);
        assert_eq!(scaler.scale, vec![1.0, 1.0]);
        assert_eq!(scaler.transform(&[3.0, 5.0]).unwrap(), vec![1.0, 0.0]);
        assert!(matches!(
            scaler.transform(&[1.0]),
            Err(PredictError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_centroid_prefers_nearest_class() {
        let features = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
        let model = CentroidClassifier::fit(&features, &[0, 0, 1], 2, 0.1).unwrap();

        let probs = model.predict_proba(&[1.0, 0.05]).unwrap();
        assert_eq!(probs.len(), 2);
        assert!(probs[0] > probs[1]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_bad_label() {
        let err = CentroidClassifier::fit(&[vec![1.0]], &[3], 2, 0.1).unwrap_err();
        assert!(matches!(err, PredictError::UnknownClass(3)));
    }

    #[test]
    fn test_softmax_uniform() {
        let p = softmax(&[0.0, 0.0, 0.0, 0.0]);
        assert!(p.iter().all(|x| (x - 0.25).abs() < 1e-12));
    }
}
