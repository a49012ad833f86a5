//! Bivariate Gaussian density, used to draw per-class likelihood surfaces.

use std::f64::consts::PI;

use serde::Serialize;

use crate::linalg::SquareMatrix;

/// Determinants at or below this are treated as singular.
pub const SINGULAR_DETERMINANT: f64 = 1e-9;

/// Density of `N(mean, cov)` at `point`, in two dimensions only.
///
/// Any other dimensionality, or a (near) singular covariance, gives `0.0`.
pub fn gaussian_pdf_2d(point: &[f64], mean: &[f64], cov: &SquareMatrix) -> f64 {
    if point.len() != 2 || mean.len() != 2 || cov.n() != 2 {
        return 0.0;
    }

    let a = cov.get_unchecked(0, 0);
    let b = cov.get_unchecked(0, 1);
    let c = cov.get_unchecked(1, 0);
    let d = cov.get_unchecked(1, 1);
    let det = a * d - b * c;
    if det <= SINGULAR_DETERMINANT {
        return 0.0;
    }

    let inv = [[d / det, -b / det], [-c / det, a / det]];
    let dx = point[0] - mean[0];
    let dy = point[1] - mean[1];
    let mahalanobis_sq = (dx * inv[0][0] + dy * inv[1][0]) * dx
        + (dx * inv[0][1] + dy * inv[1][1]) * dy;

    (-0.5 * mahalanobis_sq).exp() / (2.0 * PI * det.sqrt())
}

/// Evenly spaced ticks along both axes of a plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Grid {
    /// Ticks covering the range of `xs` and `ys`, widened on each side by
    /// `padding` times the range.
    pub fn spanning(xs: &[f64], ys: &[f64], padding: f64, steps: usize) -> Self {
        Self {
            x: ticks(xs, padding, steps),
            y: ticks(ys, padding, steps),
        }
    }
}

fn ticks(values: &[f64], padding: f64, steps: usize) -> Vec<f64> {
    if values.is_empty() || steps == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = (max - min) * padding;
    let start = min - pad;
    if steps == 1 {
        return vec![start];
    }
    let span = max - min + 2.0 * pad;
    (0..steps)
        .map(|i| start + i as f64 * span / (steps - 1) as f64)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// `z[i][j]` is the density at `(x[j], y[i])`.
    pub z: Vec<Vec<f64>>,
}

pub fn density_surface(grid: &Grid, mean: &[f64], cov: &SquareMatrix) -> Surface {
    let z = grid.y.iter()
        .map(|&yi| {
            grid.x.iter()
                .map(|&xi| gaussian_pdf_2d(&[xi, yi], mean, cov))
                .collect()
        })
        .collect();
    Surface {
        x: grid.x.clone(),
        y: grid.y.clone(),
        z,
    }
}
