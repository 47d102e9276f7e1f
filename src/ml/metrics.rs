//! Precision, recall and F1 for multi-label predictions.
//!
//! Undefined ratios (a zero denominator) count as `0.0`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ml::binarizer::LabelMatrix;

/// Metrics for one class or one averaging strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true occurrences.
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        Self {
            precision,
            recall,
            f1: f1(precision, recall),
            support: tp + fn_,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

fn column_counts(y_true: &LabelMatrix, y_pred: &LabelMatrix) -> Vec<Counts> {
    let n_classes = y_true.first().map_or(0, Vec::len);
    let mut counts = vec![Counts::default(); n_classes];
    for (truth, pred) in y_true.iter().zip(y_pred) {
        for (col, counts) in counts.iter_mut().enumerate() {
            match (truth[col], pred[col]) {
                (true, true) => counts.tp += 1,
                (false, true) => counts.fp += 1,
                (true, false) => counts.fn_ += 1,
                (false, false) => {}
            }
        }
    }
    counts
}

/// F1 over all label decisions pooled together.
pub fn micro_f1(y_true: &LabelMatrix, y_pred: &LabelMatrix) -> f64 {
    micro_average(&column_counts(y_true, y_pred)).f1
}

fn micro_average(counts: &[Counts]) -> ClassMetrics {
    let total = counts.iter().fold(Counts::default(), |acc, c| Counts {
        tp: acc.tp + c.tp,
        fp: acc.fp + c.fp,
        fn_: acc.fn_ + c.fn_,
    });
    ClassMetrics::from_counts(total.tp, total.fp, total.fn_)
}

/// Per-class metrics plus micro, macro, weighted and sample averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<(String, ClassMetrics)>,
    pub micro_avg: ClassMetrics,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub samples_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Build a report; `class_names` label the columns of both matrices.
    pub fn new(y_true: &LabelMatrix, y_pred: &LabelMatrix, class_names: &[String]) -> Self {
        let counts = column_counts(y_true, y_pred);
        let per_class: Vec<ClassMetrics> = counts
            .iter()
            .map(|c| ClassMetrics::from_counts(c.tp, c.fp, c.fn_))
            .collect();
        let total_support: usize = per_class.iter().map(|m| m.support).sum();

        let n = per_class.len().max(1) as f64;
        let macro_avg = ClassMetrics {
            precision: per_class.iter().map(|m| m.precision).sum::<f64>() / n,
            recall: per_class.iter().map(|m| m.recall).sum::<f64>() / n,
            f1: per_class.iter().map(|m| m.f1).sum::<f64>() / n,
            support: total_support,
        };

        let weighted = |value: fn(&ClassMetrics) -> f64| {
            if total_support == 0 {
                0.0
            } else {
                per_class
                    .iter()
                    .map(|m| value(m) * m.support as f64)
                    .sum::<f64>()
                    / total_support as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total_support,
        };

        let mut samples_avg = Self::samples_average(y_true, y_pred);
        samples_avg.support = total_support;

        Self {
            classes: class_names.iter().cloned().zip(per_class).collect(),
            micro_avg: micro_average(&counts),
            macro_avg,
            weighted_avg,
            samples_avg,
        }
    }

    fn samples_average(y_true: &LabelMatrix, y_pred: &LabelMatrix) -> ClassMetrics {
        let n_samples = y_true.len();
        if n_samples == 0 {
            return ClassMetrics::default();
        }
        let (mut precision, mut recall, mut f1_sum) = (0.0, 0.0, 0.0);
        for (truth, pred) in y_true.iter().zip(y_pred) {
            let both = truth.iter().zip(pred).filter(|(t, p)| **t && **p).count();
            let n_true = truth.iter().filter(|t| **t).count();
            let n_pred = pred.iter().filter(|p| **p).count();
            precision += ratio(both, n_pred);
            recall += ratio(both, n_true);
            f1_sum += ratio(2 * both, n_true + n_pred);
        }
        let n = n_samples as f64;
        ClassMetrics {
            precision: precision / n,
            recall: recall / n,
            f1: f1_sum / n,
            support: 0,
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LAST_LINE: &str = "weighted avg";
        let width = self
            .classes
            .iter()
            .map(|(name, _)| name.chars().count())
            .chain(std::iter::once(LAST_LINE.len()))
            .max()
            .unwrap_or(LAST_LINE.len());

        let row = |f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics| {
            writeln!(
                f,
                "{name:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.precision, m.recall, m.f1, m.support
            )
        };

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, metrics) in &self.classes {
            row(f, name, metrics)?;
        }
        writeln!(f)?;
        row(f, "micro avg", &self.micro_avg)?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, LAST_LINE, &self.weighted_avg)?;
        row(f, "samples avg", &self.samples_avg)
    }
}
