use std::collections::BTreeMap;

use tracing::debug;

use super::{best_by, check_features, check_training, Classifier, ClassifierError};
use crate::linalg::{squared_distance, Matrix};
use crate::stats::mean;
use crate::util::group_indices;

/// Nearest-centroid classifier.
#[derive(Debug, Clone, Default)]
pub struct MinimumDistance {
    centroids: BTreeMap<String, Vec<f64>>,
    n_features: usize,
}

impl MinimumDistance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn centroids(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.centroids
    }
}

impl Classifier for MinimumDistance {
    fn fit(&mut self, x: &Matrix, labels: &[String]) -> Result<(), ClassifierError> {
        check_training(x, labels)?;

        let mut centroids = BTreeMap::new();
        for (label, indices) in group_indices(labels) {
            // indices come from `labels`, whose length matches the row count
            let rows = x.select_rows(&indices).map_err(|_| ClassifierError::LabelCount {
                rows: x.height(),
                labels: labels.len(),
            })?;
            centroids.insert(label.to_string(), mean(&rows));
        }

        debug!(classes = centroids.len(), features = x.width(), "fitted minimum distance");
        self.centroids = centroids;
        self.n_features = x.width();
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<String>, ClassifierError> {
        if self.centroids.is_empty() {
            return Err(ClassifierError::NotFitted);
        }
        check_features(self.n_features, x)?;

        x.rows()
            .map(|row| {
                // nearest centroid is the highest negated distance
                let scores = self.centroids.iter()
                    .map(|(label, centroid)| (label, -squared_distance(row, centroid)));
                best_by(scores).cloned().ok_or(ClassifierError::NotFitted)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "minimum_distance"
    }
}
