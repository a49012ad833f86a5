//! Classification scores from actual and predicted labels.

use serde::Serialize;
use thiserror::Error;

use crate::util::sorted_insert_unique;

/// Counts of (actual, predicted) pairs. `counts[i][j]` is the number of rows
/// whose actual class is `classes[i]` and predicted class is `classes[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    /// Distinct actual labels, sorted.
    pub classes: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Predictions naming a class that never occurs in `actual` are left out.
    pub fn from_labels(actual: &[String], predicted: &[String]) -> Self {
        let mut classes: Vec<&str> = Vec::new();
        for label in actual {
            sorted_insert_unique(&mut classes, label.as_str());
        }

        let k = classes.len();
        let mut counts = vec![vec![0; k]; k];
        for (a, p) in actual.iter().zip(predicted) {
            let row = classes.binary_search(&a.as_str());
            let col = classes.binary_search(&p.as_str());
            if let (Ok(row), Ok(col)) = (row, col) {
                counts[row][col] += 1;
            }
        }

        Self {
            classes: classes.into_iter().map(String::from).collect(),
            counts,
        }
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.counts[class][class]
    }

    /// Predicted as `class` but actually something else.
    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&i| i != class)
            .map(|i| self.counts[i][class])
            .sum()
    }

    /// Actually `class` but predicted as something else.
    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&j| j != class)
            .map(|j| self.counts[class][j])
            .sum()
    }

    /// `TP / (TP + FP)`, 0 when nothing was predicted as `class`.
    pub fn precision(&self, class: usize) -> f64 {
        let tp = self.true_positives(class);
        guarded_ratio(tp as f64, (tp + self.false_positives(class)) as f64)
    }

    /// `TP / (TP + FN)`, 0 when `class` never occurs.
    pub fn recall(&self, class: usize) -> f64 {
        let tp = self.true_positives(class);
        guarded_ratio(tp as f64, (tp + self.false_negatives(class)) as f64)
    }

    pub fn is_diagonal(&self) -> bool {
        self.counts.iter().enumerate().all(|(i, row)| {
            row.iter().enumerate().all(|(j, &c)| i == j || c == 0)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub accuracy: f64,
    /// Macro average over classes.
    pub precision: f64,
    /// Macro average over classes.
    pub recall: f64,
    /// Harmonic mean of the macro precision and recall.
    pub f1: f64,
    pub confusion_matrix: ConfusionMatrix,
}

pub fn calculate_metrics(actual: &[String], predicted: &[String]) -> Result<Metrics, MetricsError> {
    if actual.len() != predicted.len() {
        return Err(MetricsError::LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(MetricsError::Empty);
    }

    let correct = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    let accuracy = correct as f64 / actual.len() as f64;

    let cm = ConfusionMatrix::from_labels(actual, predicted);
    let k = cm.n_classes() as f64;
    let precision = (0..cm.n_classes()).map(|c| cm.precision(c)).sum::<f64>() / k;
    let recall = (0..cm.n_classes()).map(|c| cm.recall(c)).sum::<f64>() / k;
    let f1 = guarded_ratio(2.0 * precision * recall, precision + recall);

    Ok(Metrics {
        accuracy,
        precision,
        recall,
        f1,
        confusion_matrix: cm,
    })
}

/// `num / den` with a zero denominator replaced by one.
fn guarded_ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { num } else { num / den }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("{actual} actual labels but {predicted} predictions")]
    LengthMismatch { actual: usize, predicted: usize },
    #[error("no labels to score")]
    Empty,
}
