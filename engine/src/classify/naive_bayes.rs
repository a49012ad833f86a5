use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::Serialize;
use tracing::debug;

use super::{best_by, check_features, check_training, Classifier, ClassifierError};
use crate::linalg::Matrix;
use crate::util::group_indices;

/// Added to every per-feature variance so constant features stay finite.
pub const VARIANCE_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStats {
    pub means: Vec<f64>,
    /// Population variance plus `VARIANCE_FLOOR`.
    pub variances: Vec<f64>,
    pub prior: f64,
}

impl ClassStats {
    /// `ln(prior) + sum_j ln N(x_j | mean_j, var_j)`
    pub fn log_posterior(&self, x: &[f64]) -> f64 {
        let mut log_post = self.prior.ln();
        for ((xj, m), v) in x.iter().zip(&self.means).zip(&self.variances) {
            let exponent = -(xj - m).powi(2) / (2.0 * v);
            log_post += exponent - 0.5 * (2.0 * PI * v).ln();
        }
        log_post
    }
}

#[derive(Debug, Clone, Default)]
pub struct GaussianNaiveBayes {
    class_stats: BTreeMap<String, ClassStats>,
    n_features: usize,
}

impl GaussianNaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_stats(&self) -> &BTreeMap<String, ClassStats> {
        &self.class_stats
    }

    /// Log posterior of each class for a single point, in label order.
    pub fn log_posteriors<'a>(&'a self, x: &'a [f64]) -> impl Iterator<Item = (&'a String, f64)> + 'a {
        self.class_stats.iter().map(move |(label, stats)| (label, stats.log_posterior(x)))
    }
}

impl Classifier for GaussianNaiveBayes {
    fn fit(&mut self, x: &Matrix, labels: &[String]) -> Result<(), ClassifierError> {
        check_training(x, labels)?;
        let total = x.height() as f64;

        let mut class_stats = BTreeMap::new();
        for (label, indices) in group_indices(labels) {
            let n = indices.len() as f64;
            let means: Vec<f64> = (0..x.width())
                .map(|j| indices.iter().map(|&i| x.get_unchecked(i, j)).sum::<f64>() / n)
                .collect();
            let variances = (0..x.width())
                .map(|j| {
                    let ss: f64 = indices.iter()
                        .map(|&i| (x.get_unchecked(i, j) - means[j]).powi(2))
                        .sum();
                    ss / n + VARIANCE_FLOOR
                })
                .collect();
            class_stats.insert(label.to_string(), ClassStats {
                means,
                variances,
                prior: n / total,
            });
        }

        debug!(classes = class_stats.len(), features = x.width(), "fitted naive bayes");
        self.class_stats = class_stats;
        self.n_features = x.width();
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<String>, ClassifierError> {
        if self.class_stats.is_empty() {
            return Err(ClassifierError::NotFitted);
        }
        check_features(self.n_features, x)?;

        x.rows()
            .map(|row| {
                best_by(self.log_posteriors(row))
                    .cloned()
                    .ok_or(ClassifierError::NotFitted)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "gaussian_naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::round;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_fit_class_stats() {
        let x = Matrix::from_rows(vec![
            vec![1.0, 5.0],
            vec![3.0, 5.0],
            vec![10.0, 0.0],
        ]).unwrap();
        let y = labels(&["a", "a", "b"]);

        let mut model = GaussianNaiveBayes::new();
        model.fit(&x, &y).unwrap();

        let a = &model.class_stats()["a"];
        assert_eq!(a.means, vec![2.0, 5.0]);
        assert_eq!(round(&a.variances, 6), vec![1.0, 0.0]);
        assert!(a.variances[1] > 0.0);
        assert!((a.prior - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(model.class_stats()["b"].prior, 1.0 / 3.0);
    }

    #[test]
    fn test_predict_separated_classes() {
        let x = Matrix::from_rows(vec![
            vec![1.0, 2.0],
            vec![1.2, 1.8],
            vec![0.8, 2.2],
            vec![8.0, 9.0],
            vec![8.3, 9.1],
            vec![7.9, 8.7],
        ]).unwrap();
        let y = labels(&["low", "low", "low", "high", "high", "high"]);

        let mut model = GaussianNaiveBayes::new();
        model.fit(&x, &y).unwrap();

        let test = Matrix::from_rows(vec![vec![1.1, 2.1], vec![8.1, 8.9]]).unwrap();
        assert_eq!(model.predict(&test).unwrap(), labels(&["low", "high"]));
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_log_posterior_matches_closed_form() {
        let stats = ClassStats {
            means: vec![0.0],
            variances: vec![1.0],
            prior: 0.5,
        };

        let expected = 0.5_f64.ln() - 0.5 - 0.5 * (2.0 * PI).ln();
        assert!((stats.log_posterior(&[1.0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_refit_replaces_state() {
        let x = Matrix::from_rows(vec![vec![0.0], vec![1.0]]).unwrap();
        let mut model = GaussianNaiveBayes::new();
        model.fit(&x, &labels(&["a", "b"])).unwrap();
        model.fit(&x, &labels(&["c", "c"])).unwrap();

        let keys: Vec<&String> = model.class_stats().keys().collect();
        assert_eq!(keys, vec!["c"]);
        assert_eq!(model.predict(&x).unwrap(), labels(&["c", "c"]));
    }

    #[test]
    fn test_tie_goes_to_smaller_label() {
        let x = Matrix::from_rows(vec![vec![0.0], vec![0.0]]).unwrap();
        let mut model = GaussianNaiveBayes::new();
        model.fit(&x, &labels(&["zeta", "alpha"])).unwrap();

        assert_eq!(model.predict(&x).unwrap(), labels(&["alpha", "alpha"]));
    }
}
