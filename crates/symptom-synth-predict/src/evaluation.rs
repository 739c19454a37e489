//! Classification metrics: aggregate scores, per-class report and the
//! row-normalized confusion matrix.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::classifier::LabelEncoder;

/// Probabilities are clipped to this before taking logs.
const LOG_LOSS_EPSILON: f64 = 1e-15;

pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// F1 per class weighted by class support.
pub fn f1_weighted(y_true: &[usize], y_pred: &[usize], num_classes: usize) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let counts = confusion_counts(y_true, y_pred, num_classes);
    let total: f64 = (0..num_classes)
        .map(|c| {
            let (_, _, f1, support) = class_scores(&counts, c);
            f1 * support as f64
        })
        .sum();
    total / y_true.len() as f64
}

/// Mean negative log-probability of the true class.
pub fn log_loss(y_true: &[usize], probas: &[Vec<f64>]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let total: f64 = y_true
        .iter()
        .zip(probas)
        .map(|(&t, p)| {
            let pt = p.get(t).copied().unwrap_or(0.0);
            -pt.clamp(LOG_LOSS_EPSILON, 1.0 - LOG_LOSS_EPSILON).ln()
        })
        .sum();
    total / y_true.len() as f64
}

/// Index of the largest value; ties go to the lower index.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// `counts[true][predicted]`. Predictions outside the class range are ignored.
pub fn confusion_counts(y_true: &[usize], y_pred: &[usize], num_classes: usize) -> Vec<Vec<usize>> {
    let mut counts = vec![vec![0usize; num_classes]; num_classes];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t < num_classes && p < num_classes {
            counts[t][p] += 1;
        }
    }
    counts
}

/// Divide each row by its total, so row `i` is the distribution of
/// predictions for true class `i`. Empty rows stay zero.
pub fn normalize_rows(counts: &[Vec<usize>]) -> Vec<Vec<f64>> {
    counts
        .iter()
        .map(|row| {
            let total: usize = row.iter().sum();
            row.iter()
                .map(|&c| if total == 0 { 0.0 } else { c as f64 / total as f64 })
                .collect()
        })
        .collect()
}

/// (precision, recall, f1, support) for class `c`.
fn class_scores(counts: &[Vec<usize>], c: usize) -> (f64, f64, f64, usize) {
    let tp = counts[c][c];
    let support: usize = counts[c].iter().sum();
    let predicted: usize = counts.iter().map(|row| row[c]).sum();

    let precision = if predicted == 0 { 0.0 } else { tp as f64 / predicted as f64 };
    let recall = if support == 0 { 0.0 } else { tp as f64 / support as f64 };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    (precision, recall, f1, support)
}

/// Scores for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class report with macro and weighted averages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassScores>,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub weighted_f1: f64,
    /// Row-normalized, in label order
    pub confusion: Vec<Vec<f64>>,
}

impl ClassificationReport {
    pub fn new(y_true: &[usize], y_pred: &[usize], labels: &LabelEncoder) -> Self {
        let n = labels.len();
        let counts = confusion_counts(y_true, y_pred, n);

        let classes: Vec<ClassScores> = labels
            .classes()
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let (precision, recall, f1, support) = class_scores(&counts, c);
                ClassScores {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let macro_f1 = if classes.is_empty() {
            0.0
        } else {
            classes.iter().map(|c| c.f1).sum::<f64>() / classes.len() as f64
        };

        Self {
            accuracy: accuracy(y_true, y_pred),
            weighted_f1: f1_weighted(y_true, y_pred, n),
            macro_f1,
            classes,
            confusion: normalize_rows(&counts),
        }
    }

    /// `label,precision,recall,f1,support`, one line per class.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["label", "precision", "recall", "f1", "support"])?;
        for c in &self.classes {
            csv.write_record([
                c.label.clone(),
                format!("{:.4}", c.precision),
                format!("{:.4}", c.recall),
                format!("{:.4}", c.f1),
                c.support.to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Normalized confusion matrix with labels as the header and first column.
    pub fn write_confusion_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let mut header = vec![String::from("true\\predicted")];
        header.extend(self.classes.iter().map(|c| c.label.clone()));
        csv.write_record(&header)?;

        for (class, row) in self.classes.iter().zip(&self.confusion) {
            let mut record = vec![class.label.clone()];
            record.extend(row.iter().map(|v| format!("{:.4}", v)));
            csv.write_record(&record)?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_metrics() {
        let y_true = [0, 0, 1, 1];
        let y_pred = [0, 1, 1, 1];
        assert_eq!(accuracy(&y_true, &y_pred), 0.75);

        // class 0: p=1 r=0.5 f1=2/3; class 1: p=2/3 r=1 f1=0.8
        let f1 = f1_weighted(&y_true, &y_pred, 2);
        assert!((f1 - (2.0 / 3.0 + 0.8) / 2.0).abs() < 1e-9);

        let probas = vec![vec![1.0, 0.0], vec![0.5, 0.5]];
        let loss = log_loss(&[0, 1], &probas);
        assert!((loss - (0.5f64.ln() * -0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_argmax_ties_go_low() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_known_confusion() {
        let labels = LabelEncoder::fit(["Asthma", "Flu", "Malaria"]);
        // Asthma: 2 right, 1 called Flu. Flu: 2 right. Malaria: 1 right, 1 called Asthma.
        let y_true = [0, 0, 0, 1, 1, 2, 2];
        let y_pred = [0, 0, 1, 1, 1, 2, 0];

        let counts = confusion_counts(&y_true, &y_pred, 3);
        assert_eq!(counts, vec![vec![2, 1, 0], vec![0, 2, 0], vec![1, 0, 1]]);

        let report = ClassificationReport::new(&y_true, &y_pred, &labels);
        let asthma = &report.classes[0];
        assert_eq!(asthma.label, "Asthma");
        assert_eq!(asthma.support, 3);
        assert!((asthma.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((asthma.recall - 2.0 / 3.0).abs() < 1e-9);

        let flu = &report.classes[1];
        assert!((flu.precision - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(flu.recall, 1.0);
        assert!((flu.f1 - 0.8).abs() < 1e-9);

        let malaria = &report.classes[2];
        assert_eq!(malaria.precision, 1.0);
        assert_eq!(malaria.recall, 0.5);

        assert!((report.accuracy - 5.0 / 7.0).abs() < 1e-9);
        assert!((report.confusion[0][1] - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.confusion[2], vec![0.5, 0.0, 0.5]);
        for row in &report.confusion {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unseen_class_row_is_zero() {
        let labels = LabelEncoder::fit(["A", "B"]);
        let report = ClassificationReport::new(&[0, 0], &[0, 1], &labels);
        assert_eq!(report.classes[1].support, 0);
        assert_eq!(report.classes[1].recall, 0.0);
        assert_eq!(report.confusion[1], vec![0.0, 0.0]);
    }

    #[test]
    fn test_report_csv() {
        let labels = LabelEncoder::fit(["A", "B"]);
        let report = ClassificationReport::new(&[0, 1], &[0, 0], &labels);

        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "label,precision,recall,f1,support");
        assert_eq!(lines[1], "A,0.5000,1.0000,0.6667,1");

        let mut out = Vec::new();
        report.write_confusion_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(2), Some("B,1.0000,0.0000"));
    }
}
