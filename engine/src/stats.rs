//! Column statistics over a data matrix: mean vector, sample covariance,
//! z-score standardization and per-class moments.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::linalg::{Matrix, SquareMatrix};
use crate::util::group_indices;

/// Per-column arithmetic mean. A matrix with no rows has no mean.
pub fn mean(data: &Matrix) -> Vec<f64> {
    if data.height() == 0 {
        return Vec::new();
    }
    let n = data.height() as f64;
    let mut means = vec![0.0; data.width()];
    for row in data.rows() {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x;
        }
    }
    means.iter().map(|m| m / n).collect()
}

/// Sample covariance (divides by `n - 1`).
///
/// With fewer than two rows the covariance is undefined and a zero `p x p`
/// matrix is returned instead.
pub fn covariance(data: &Matrix, means: &[f64]) -> Result<SquareMatrix, StatsError> {
    let n = data.height();
    let p = data.width();
    if n < 2 {
        return Ok(SquareMatrix::zeros(p));
    }
    if means.len() != p {
        return Err(StatsError::MeanLength {
            expected: p,
            found: means.len(),
        });
    }

    let mut cov = SquareMatrix::zeros(p);
    for i in 0..p {
        for j in i..p {
            let sum: f64 = data.rows()
                .map(|row| (row[i] - means[i]) * (row[j] - means[j]))
                .sum();
            let value = sum / (n - 1) as f64;
            cov.set_unchecked(i, j, value);
            cov.set_unchecked(j, i, value);
        }
    }
    Ok(cov)
}

/// Z-score every column using the sample standard deviation.
///
/// Constant columns (and any column of a single-row matrix) use a divisor of
/// `1.0`, so they end up mean-centred only.
pub fn standardize(data: &Matrix) -> Matrix {
    let means = mean(data);
    let n = data.height();
    let stds: Vec<f64> = (0..data.width())
        .map(|j| {
            if n < 2 {
                return 1.0;
            }
            let ss: f64 = data.rows().map(|row| (row[j] - means[j]).powi(2)).sum();
            let sd = (ss / (n - 1) as f64).sqrt();
            if sd == 0.0 { 1.0 } else { sd }
        })
        .collect();

    let mut result = data.clone();
    for i in 0..n {
        for j in 0..data.width() {
            let value = (data.get_unchecked(i, j) - means[j]) / stds[j];
            result.set_unchecked(i, j, value);
        }
    }
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMoments {
    pub count: usize,
    pub mean: Vec<f64>,
    pub covariance: SquareMatrix,
}

/// Mean and sample covariance for every class with more than one row,
/// keyed by label in sorted order.
pub fn class_moments(
    data: &Matrix,
    labels: &[String],
) -> Result<BTreeMap<String, ClassMoments>, StatsError> {
    if labels.len() != data.height() {
        return Err(StatsError::LabelCount {
            rows: data.height(),
            labels: labels.len(),
        });
    }

    let mut moments = BTreeMap::new();
    for (label, indices) in group_indices(labels) {
        if indices.len() < 2 {
            continue;
        }
        let rows = data.select_rows(&indices)?;
        let mean = mean(&rows);
        let covariance = covariance(&rows, &mean)?;
        moments.insert(label.to_string(), ClassMoments {
            count: indices.len(),
            mean,
            covariance,
        });
    }
    Ok(moments)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("mean vector has length {found}, expected {expected}")]
    MeanLength { expected: usize, found: usize },
    #[error("{rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },
    #[error(transparent)]
    Matrix(#[from] crate::linalg::MatrixError),
}
