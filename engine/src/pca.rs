use serde::Serialize;

use crate::eigen::JacobiSolver;
use crate::linalg::{dot, Matrix, MatrixError, SquareMatrix};
use crate::stats::{covariance, mean};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pca {
    pub eigenvalues: Vec<f64>,
    pub eigenvectors: Vec<Vec<f64>>,
    pub explained_variance: Vec<f64>,
    pub cumulative_variance: Vec<f64>,
    pub covariance_matrix: SquareMatrix,
    pub iterations: usize,
    pub converged: bool,
}

impl Pca {
    /// Whether a dataset of `n` rows and `p` features gives a PCA worth
    /// showing. Smaller inputs still decompose, they are just not useful.
    pub fn is_meaningful(n: usize, p: usize) -> bool {
        p >= 2 && n >= 3
    }

    /// Projection of `row` onto component `k`. Components past the last
    /// available eigenvector project to zero.
    pub fn project_row(&self, row: &[f64], k: usize) -> f64 {
        match self.eigenvectors.get(k) {
            Some(v) => dot(row, v),
            None => 0.0,
        }
    }

    /// `n_components x p` matrix whose rows are the leading eigenvectors.
    /// Rows past the last available eigenvector are zero.
    pub fn components(&self, n_components: usize) -> Matrix {
        let p = self.covariance_matrix.n();
        let mut result = Matrix::zeros(n_components, p);
        for (k, vector) in self.eigenvectors.iter().take(n_components).enumerate() {
            for (j, value) in vector.iter().enumerate() {
                result.set_unchecked(k, j, *value);
            }
        }
        result
    }

    /// Project every row onto the first `n_components` components. `data`
    /// must have one column per feature the PCA was run on.
    pub fn project(&self, data: &Matrix, n_components: usize) -> Result<Matrix, MatrixError> {
        data.mul(&self.components(n_components).transpose())
    }
}

pub fn run_pca(data: &Matrix) -> Pca {
    run_pca_with(data, &JacobiSolver::default())
}

/// Mean, covariance and eigen-decomposition of `data`, as given. Callers
/// that want PCA on standardized features standardize first.
pub fn run_pca_with(data: &Matrix, solver: &JacobiSolver) -> Pca {
    let means = mean(data);
    let cov = match covariance(data, &means) {
        Ok(cov) => cov,
        // Only a mean of the wrong length fails, and `mean` always matches.
        Err(_) => SquareMatrix::zeros(data.width()),
    };
    let eigen = solver.solve(&cov);

    let total: f64 = eigen.eigenvalues.iter().sum();
    let total = if total == 0.0 { 1.0 } else { total };
    let explained_variance: Vec<f64> = eigen.eigenvalues.iter()
        .map(|v| v / total)
        .collect();
    let cumulative_variance = explained_variance.iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect();

    Pca {
        eigenvalues: eigen.eigenvalues,
        eigenvectors: eigen.eigenvectors,
        explained_variance,
        cumulative_variance,
        covariance_matrix: cov,
        iterations: eigen.iterations,
        converged: eigen.converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::round;

    #[test]
    fn test_pca_explained_variance() {
        let x = Matrix::from_rows(vec![
            vec![1.0, 1.0],
            vec![2.0, 2.0],
            vec![3.0, 3.0],
            vec![4.0, 4.0],
        ]).unwrap();

        let pca = run_pca(&x);

        assert_eq!(round(&pca.explained_variance, 9), vec![1.0, 0.0]);
        assert_eq!(round(&pca.cumulative_variance, 9), vec![1.0, 1.0]);
        let total: f64 = pca.explained_variance.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pca_zero_variance() {
        let x = Matrix::from_rows(vec![
            vec![2.0, 3.0],
            vec![2.0, 3.0],
            vec![2.0, 3.0],
        ]).unwrap();

        let pca = run_pca(&x);

        assert_eq!(pca.eigenvalues, vec![0.0, 0.0]);
        assert_eq!(pca.explained_variance, vec![0.0, 0.0]);
        assert_eq!(pca.cumulative_variance, vec![0.0, 0.0]);
    }

    #[test]
    fn test_pca_single_row() {
        let x = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();

        let pca = run_pca(&x);

        assert_eq!(pca.covariance_matrix, SquareMatrix::zeros(3));
        assert_eq!(pca.eigenvalues.len(), 3);
        assert!(!Pca::is_meaningful(1, 3));
    }

    #[test]
    fn test_project_missing_component_is_zero() {
        let x = Matrix::from_rows(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![-1.0, 0.0],
            vec![0.0, -1.0],
        ]).unwrap();

        let pca = run_pca(&x);
        let projected = pca.project(&x, 3).unwrap();

        assert_eq!(projected.width(), 3);
        assert_eq!(projected.get_col(2).unwrap(), vec![0.0; 4]);
        assert_eq!(pca.project_row(&[1.0, 1.0], 7), 0.0);
        for (i, row) in x.rows().enumerate() {
            assert_eq!(projected.row(i)[0], pca.project_row(row, 0));
        }
    }

    #[test]
    fn test_project_rejects_wrong_width() {
        let x = Matrix::from_rows(vec![
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![3.0, 5.0],
        ]).unwrap();
        let pca = run_pca(&x);

        let wide = Matrix::zeros(2, 3);

        assert_eq!(pca.project(&wide, 2).err(), Some(MatrixError::SizeMismatch));
        assert_eq!(pca.components(3).height(), 3);
        assert_eq!(pca.components(3).row(2), &[0.0, 0.0]);
    }

    #[test]
    fn test_projection_preserves_dominant_direction() {
        let x = Matrix::from_rows(vec![
            vec![-2.0, -2.0],
            vec![-1.0, -1.0],
            vec![1.0, 1.0],
            vec![2.0, 2.0],
        ]).unwrap();

        let pca = run_pca(&x);
        let pc1 = pca.project(&x, 1).unwrap().get_col(0).unwrap();

        // distance along the diagonal, up to sign
        let scale = 2.0_f64.sqrt();
        let expected: Vec<f64> = vec![-2.0, -1.0, 1.0, 2.0].iter().map(|v| v * scale).collect();
        let sign = if pc1[3] < 0.0 { -1.0 } else { 1.0 };
        let pc1: Vec<f64> = pc1.iter().map(|v| v * sign).collect();
        assert_eq!(round(&pc1, 9), round(&expected, 9));
    }

    #[test]
    fn test_pca_is_deterministic() {
        let x = Matrix::from_rows(vec![
            vec![2.5, 2.4, 1.0],
            vec![0.5, 0.7, 2.0],
            vec![2.2, 2.9, 0.5],
            vec![1.9, 2.2, 1.5],
            vec![3.1, 3.0, 0.1],
        ]).unwrap();

        assert_eq!(run_pca(&x), run_pca(&x));
    }
}
