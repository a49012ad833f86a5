use featurelens::classify::ModelKind;
use featurelens::eigen::JacobiSolver;
use featurelens::linalg::{dot, Matrix, SquareMatrix};
use featurelens::metrics::calculate_metrics;
use featurelens::pca::run_pca;
use featurelens::stats::{covariance, mean};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(seed: u64, rows: usize, cols: usize) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(-10.0..10.0)).collect())
        .collect();
    Matrix::from_rows(rows).unwrap()
}

fn random_symmetric(seed: u64, n: usize) -> SquareMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a = SquareMatrix::zeros(n);
    for i in 0..n {
        for j in i..n {
            let value = rng.gen_range(-10.0..10.0);
            a.set_unchecked(i, j, value);
            a.set_unchecked(j, i, value);
        }
    }
    a
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_covariance_is_symmetric(
        seed in any::<u64>(),
        rows in 2..30usize,
        cols in 1..8usize,
    ) {
        let x = random_matrix(seed, rows, cols);

        let cov = covariance(&x, &mean(&x)).unwrap();

        for i in 0..cols {
            prop_assert!(cov.get_unchecked(i, i) >= 0.0);
            for j in 0..cols {
                prop_assert_eq!(cov.get_unchecked(i, j), cov.get_unchecked(j, i));
            }
        }
    }

    #[test]
    fn prop_jacobi_reconstructs_input(seed in any::<u64>(), n in 1..=10usize) {
        let a = random_symmetric(seed, n);

        let eigen = JacobiSolver::new().max_iterations(5000).solve(&a);

        prop_assert!(eigen.converged);
        let err = eigen.reconstruct().unwrap().max_abs_diff(a.as_matrix()).unwrap();
        prop_assert!(err <= 1e-6, "reconstruction error {} for n={}", err, n);
    }

    #[test]
    fn prop_default_solver_reconstructs_small_input(seed in any::<u64>(), n in 1..=4usize) {
        let a = random_symmetric(seed, n);

        let eigen = JacobiSolver::default().solve(&a);

        let err = eigen.reconstruct().unwrap().max_abs_diff(a.as_matrix()).unwrap();
        prop_assert!(err <= 1e-6, "reconstruction error {} for n={}", err, n);
    }

    #[test]
    fn prop_eigenvectors_are_orthonormal(seed in any::<u64>(), n in 1..=10usize) {
        let a = random_symmetric(seed, n);

        let eigen = JacobiSolver::new().max_iterations(5000).solve(&a);

        for (i, u) in eigen.eigenvectors.iter().enumerate() {
            for (j, v) in eigen.eigenvectors.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                prop_assert!((dot(u, v) - expected).abs() < 1e-9);
            }
        }
        for pair in eigen.eigenvalues.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn prop_explained_variance_sums_to_one(
        seed in any::<u64>(),
        rows in 3..40usize,
        cols in 2..6usize,
    ) {
        let x = random_matrix(seed, rows, cols);

        let pca = run_pca(&x);

        let total: f64 = pca.explained_variance.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        for pair in pca.cumulative_variance.windows(2) {
            prop_assert!(pair[1] >= pair[0] - 1e-12);
        }
        let last = pca.cumulative_variance[cols - 1];
        prop_assert!((last - total).abs() < 1e-12);
    }

    #[test]
    fn prop_pca_is_deterministic(seed in any::<u64>(), rows in 3..20usize, cols in 2..5usize) {
        let x = random_matrix(seed, rows, cols);

        prop_assert_eq!(run_pca(&x), run_pca(&x));
    }

    #[test]
    fn prop_perfect_predictions_score_one(labels in prop::collection::vec("[a-d]", 1..40)) {
        let metrics = calculate_metrics(&labels, &labels).unwrap();

        prop_assert_eq!(metrics.accuracy, 1.0);
        prop_assert_eq!(metrics.precision, 1.0);
        prop_assert_eq!(metrics.recall, 1.0);
        prop_assert_eq!(metrics.f1, 1.0);
        prop_assert!(metrics.confusion_matrix.is_diagonal());
    }
}

#[test]
fn test_single_row_covariance_is_zero() {
    let x = random_matrix(9, 1, 4);

    let cov = covariance(&x, &mean(&x)).unwrap();

    assert_eq!(cov, SquareMatrix::zeros(4));
}

#[test]
fn test_separated_clusters_are_classified_by_both_models() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for (label, centre) in [("left", -20.0), ("right", 20.0)] {
        for _ in 0..25 {
            rows.push(vec![
                centre + rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ]);
            labels.push(label.to_string());
        }
    }
    let x = Matrix::from_rows(rows).unwrap();

    for kind in [ModelKind::NaiveBayes, ModelKind::MinimumDistance] {
        let mut model = kind.build();
        model.fit(&x, &labels).unwrap();
        let predicted = model.predict(&x).unwrap();

        assert_eq!(predicted, labels, "{}", model.name());
    }
}
