//! Classifiers trained on a feature matrix and a label per row.
//!
//! - `GaussianNaiveBayes`: independent per-feature Gaussians with class priors
//! - `MinimumDistance`: nearest class centroid by squared Euclidean distance
//!
//! Both keep their fitted statistics in a map keyed by label, iterated in
//! sorted order. When two classes score the same the lexicographically
//! smaller label wins.
//!
//! `fit` takes `&mut self` and swaps in a freshly built map, so a model that
//! is being retrained cannot be read at the same time. Share a fitted model
//! across threads behind an `Arc`, or an `RwLock` if it is retrained.
//!
//! # Examples
//!
//! ```rust
//! use featurelens::classify::{Classifier, ModelKind};
//! use featurelens::linalg::Matrix;
//!
//! let x = Matrix::from_rows(vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 0.0],
//!     vec![10.0, 10.0],
//!     vec![10.0, 10.0],
//! ]).unwrap();
//! let y: Vec<String> = ["A", "A", "B", "B"].iter().map(|s| s.to_string()).collect();
//!
//! let mut model = ModelKind::MinimumDistance.build();
//! model.fit(&x, &y).unwrap();
//! assert_eq!(model.predict(&x).unwrap(), y);
//! ```

mod min_distance;
mod naive_bayes;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::linalg::Matrix;

pub use min_distance::MinimumDistance;
pub use naive_bayes::{ClassStats, GaussianNaiveBayes};

pub trait Classifier {
    /// Replace any previous state with statistics learned from `x`/`labels`.
    fn fit(&mut self, x: &Matrix, labels: &[String]) -> Result<(), ClassifierError>;

    /// One label per row of `x`.
    ///
    /// `x` must have as many columns as the training matrix, even with no
    /// rows: `Matrix::zeros(0, p)` predicts nothing, while the `0 x 0`
    /// matrix from `Matrix::from_rows(vec![])` is a `FeatureCount` error.
    fn predict(&self, x: &Matrix) -> Result<Vec<String>, ClassifierError>;

    fn name(&self) -> &'static str;
}

/// The classifiers on offer. Adding a model means adding a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelKind {
    #[default]
    #[serde(rename = "bayes")]
    NaiveBayes,
    #[serde(rename = "mindist")]
    MinimumDistance,
}

impl ModelKind {
    pub fn build(self) -> Box<dyn Classifier> {
        match self {
            ModelKind::NaiveBayes => Box::new(GaussianNaiveBayes::new()),
            ModelKind::MinimumDistance => Box::new(MinimumDistance::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("{rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },
    #[error("no training rows")]
    NoTrainingData,
    #[error("predict called before fit")]
    NotFitted,
    #[error("model was fitted on {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },
}

fn check_training(x: &Matrix, labels: &[String]) -> Result<(), ClassifierError> {
    if x.height() != labels.len() {
        return Err(ClassifierError::LabelCount {
            rows: x.height(),
            labels: labels.len(),
        });
    }
    if x.height() == 0 {
        return Err(ClassifierError::NoTrainingData);
    }
    Ok(())
}

fn check_features(expected: usize, x: &Matrix) -> Result<(), ClassifierError> {
    if x.width() != expected {
        return Err(ClassifierError::FeatureCount {
            expected,
            found: x.width(),
        });
    }
    Ok(())
}

/// Label with the highest score. Strictly greater scores replace the current
/// best, so ties keep the earlier (smaller) label.
fn best_by<'a, I>(scores: I) -> Option<&'a String>
where
    I: Iterator<Item = (&'a String, f64)>,
{
    let mut best: Option<(&String, f64)> = None;
    for (label, score) in scores {
        match best {
            Some((_, b)) if score <= b || score.is_nan() => {}
            _ => best = Some((label, score)),
        }
    }
    best.map(|(label, _)| label)
}
