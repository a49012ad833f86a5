//! Eigen-decomposition of symmetric matrices with the cyclic Jacobi method.
//!
//! Each step picks the largest off-diagonal element and applies the plane
//! rotation that zeroes it. Rotations are accumulated so the columns of the
//! accumulated matrix converge to the eigenvectors while the diagonal of the
//! working matrix converges to the eigenvalues.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, warn};

use crate::linalg::{Matrix, MatrixError, SquareMatrix};

pub const DEFAULT_TOLERANCE: f64 = 1e-9;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymmetricEigen {
    /// Sorted in descending order.
    pub eigenvalues: Vec<f64>,
    /// Unit eigenvectors, `eigenvectors[i]` belongs to `eigenvalues[i]`.
    pub eigenvectors: Vec<Vec<f64>>,
    /// Rotations applied.
    pub iterations: usize,
    /// False when the iteration cap was hit before every off-diagonal element
    /// fell below the tolerance. The result is then a best-effort
    /// approximation.
    pub converged: bool,
}

impl SymmetricEigen {
    /// `V^T diag(eigenvalues) V` with the eigenvectors as the rows of `V`.
    /// For a converged decomposition this gives back the input matrix.
    pub fn reconstruct(&self) -> Result<Matrix, MatrixError> {
        let v = Matrix::from_rows(self.eigenvectors.clone())?;
        let mut scaled = v.clone();
        for (k, value) in self.eigenvalues.iter().enumerate() {
            for j in 0..scaled.width() {
                scaled.set_unchecked(k, j, value * v.get_unchecked(k, j));
            }
        }
        v.transpose().mul(&scaled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiSolver {
    tolerance: f64,
    max_iterations: usize,
}

impl JacobiSolver {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Off-diagonal magnitude below which the matrix counts as diagonal.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Maximum number of rotations.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Decompose `a`, which must be symmetric. Never fails: if the rotation
    /// budget runs out the current approximation is returned.
    pub fn solve(&self, a: &SquareMatrix) -> SymmetricEigen {
        debug_assert!(a.is_symmetric(1e-9), "jacobi input must be symmetric");

        let n = a.n();
        let mut d = a.clone();
        let mut v = SquareMatrix::identity(n);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let (max, p, q) = largest_off_diagonal(&d);
            if max < self.tolerance {
                converged = true;
                break;
            }
            rotate(&mut d, &mut v, p, q);
            iterations += 1;
        }
        if !converged {
            converged = largest_off_diagonal(&d).0 < self.tolerance;
        }

        if converged {
            debug!(n, iterations, "jacobi converged");
        } else {
            warn!(
                n,
                iterations,
                "jacobi hit the iteration cap, returning approximate eigenpairs"
            );
        }

        let values = d.diagonal();
        let mut order: Vec<usize> = (0..n).collect();
        // sort_by is stable, so equal eigenvalues keep their input order
        order.sort_by(|&i, &j| values[j].partial_cmp(&values[i]).unwrap_or(Ordering::Equal));

        let eigenvalues = order.iter().map(|&i| values[i]).collect();
        let eigenvectors = order.iter()
            .map(|&col| (0..n).map(|row| v.get_unchecked(row, col)).collect())
            .collect();

        SymmetricEigen {
            eigenvalues,
            eigenvectors,
            iterations,
            converged,
        }
    }
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Decompose with the default tolerance and iteration cap.
pub fn symmetric_eigen(a: &SquareMatrix) -> SymmetricEigen {
    JacobiSolver::default().solve(a)
}

/// Magnitude and position of the largest upper-triangle element. The first
/// maximum in row-major order wins.
fn largest_off_diagonal(d: &SquareMatrix) -> (f64, usize, usize) {
    let mut max = 0.0;
    let mut p = 0;
    let mut q = 1;
    for i in 0..d.n() {
        for j in i + 1..d.n() {
            let value = d.get_unchecked(i, j).abs();
            if value > max {
                max = value;
                p = i;
                q = j;
            }
        }
    }
    (max, p, q)
}

/// Givens rotation in the (p, q) plane that zeroes `d[p][q]`, accumulated
/// into `v`.
fn rotate(d: &mut SquareMatrix, v: &mut SquareMatrix, p: usize, q: usize) {
    let dpp = d.get_unchecked(p, p);
    let dqq = d.get_unchecked(q, q);
    let dpq = d.get_unchecked(p, q);

    let phi = 0.5 * (2.0 * dpq).atan2(dqq - dpp);
    let c = phi.cos();
    let s = phi.sin();

    d.set_unchecked(p, p, dpp * c * c - 2.0 * dpq * c * s + dqq * s * s);
    d.set_unchecked(q, q, dpp * s * s + 2.0 * dpq * c * s + dqq * c * c);
    d.set_unchecked(p, q, 0.0);
    d.set_unchecked(q, p, 0.0);

    for i in 0..d.n() {
        if i != p && i != q {
            let dip = d.get_unchecked(i, p);
            let diq = d.get_unchecked(i, q);
            let new_ip = c * dip - s * diq;
            let new_iq = s * dip + c * diq;
            d.set_unchecked(i, p, new_ip);
            d.set_unchecked(p, i, new_ip);
            d.set_unchecked(i, q, new_iq);
            d.set_unchecked(q, i, new_iq);
        }
        let vip = v.get_unchecked(i, p);
        let viq = v.get_unchecked(i, q);
        v.set_unchecked(i, p, c * vip - s * viq);
        v.set_unchecked(i, q, s * vip + c * viq);
    }
}
