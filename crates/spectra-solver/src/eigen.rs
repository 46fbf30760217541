//! Full diagonalisation of small dense matrices and eigenpair ordering.

use nalgebra::{DMatrix, DVector, Schur, SymmetricEigen};
use num_complex::Complex64;
use spectra_core::errors::{ErrorInfo, SpectraError};

fn eigensolver_error(routine: &str, dim: usize, max_iterations: usize) -> SpectraError {
    SpectraError::Convergence(
        ErrorInfo::new(
            "eigensolver-not-converged",
            "dense eigensolver exhausted its iteration budget",
        )
        .with_context("routine", routine)
        .with_context("dim", dim)
        .with_context("max_iterations", max_iterations),
    )
}

/// Diagonalises a Hermitian matrix.
///
/// Eigenvalues are real and ascending; eigenvector `i` is the unit column
/// belonging to eigenvalue `i`. Only the lower triangle of `matrix` is read.
pub fn hermitian_eigen(
    matrix: DMatrix<Complex64>,
    max_iterations: usize,
) -> Result<(Vec<f64>, Vec<DVector<Complex64>>), SpectraError> {
    let dim = matrix.nrows();
    if dim == 0 {
        return Ok((Vec::new(), Vec::new()));
    }
    let eigen = SymmetricEigen::try_new(matrix, f64::EPSILON, max_iterations)
        .ok_or_else(|| eigensolver_error("hermitian", dim, max_iterations))?;

    let mut pairs: Vec<(f64, DVector<Complex64>)> = eigen
        .eigenvalues
        .iter()
        .copied()
        .zip(eigen.eigenvectors.column_iter().map(|col| col.into_owned()))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(pairs.into_iter().unzip())
}

/// Diagonalises a general complex matrix.
///
/// Uses a complex Schur factorisation `A = Q T Q^H` followed by back
/// substitution on the triangular factor. The returned pairs are unsorted
/// and each eigenvector has unit norm.
pub fn general_eigen(
    matrix: DMatrix<Complex64>,
    max_iterations: usize,
) -> Result<(Vec<Complex64>, Vec<DVector<Complex64>>), SpectraError> {
    let dim = matrix.nrows();
    if dim == 0 {
        return Ok((Vec::new(), Vec::new()));
    }
    let scale = matrix.norm().max(f64::MIN_POSITIVE);
    let schur = Schur::try_new(matrix, f64::EPSILON, max_iterations)
        .ok_or_else(|| eigensolver_error("general", dim, max_iterations))?;
    let (q, t) = schur.unpack();

    // Same perturbation floor LAPACK's ztrevc uses for tiny diagonal gaps.
    let floor = f64::EPSILON * scale;
    let mut values = Vec::with_capacity(dim);
    let mut vectors = Vec::with_capacity(dim);
    for k in 0..dim {
        let lambda = t[(k, k)];
        let mut y = DVector::<Complex64>::zeros(dim);
        y[k] = Complex64::new(1.0, 0.0);
        for i in (0..k).rev() {
            let mut acc = Complex64::new(0.0, 0.0);
            for j in (i + 1)..=k {
                acc += t[(i, j)] * y[j];
            }
            let mut gap = t[(i, i)] - lambda;
            if gap.norm() < floor {
                gap = Complex64::new(floor, 0.0);
            }
            y[i] = -acc / gap;
        }
        let vector = (&q * y).normalize();
        values.push(lambda);
        vectors.push(vector);
    }
    Ok((values, vectors))
}

/// Sorts eigenpairs by the real part of the eigenvalue.
///
/// Vectors follow their eigenvalues. The sort is stable so exact ties keep
/// their input order, and the full complex eigenvalue is retained.
pub fn sort_by_companion(
    values: Vec<Complex64>,
    vectors: Vec<DVector<Complex64>>,
) -> (Vec<Complex64>, Vec<DVector<Complex64>>) {
    let mut pairs: Vec<_> = values.into_iter().zip(vectors).collect();
    pairs.sort_by(|a, b| a.0.re.total_cmp(&b.0.re));
    pairs.into_iter().unzip()
}

/// Sorts eigenvalues by real part without touching their imaginary parts.
pub fn sort_by_real_part(mut values: Vec<Complex64>) -> Vec<Complex64> {
    values.sort_by(|a, b| a.re.total_cmp(&b.re));
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn companion_sort_keeps_imaginary_parts() {
        let values = vec![c(2.0, 1.0), c(-1.0, 0.0), c(0.5, -3.0)];
        let vectors = (0..3)
            .map(|idx| DVector::from_element(1, c(idx as f64, 0.0)))
            .collect();
        let (sorted, vectors) = sort_by_companion(values, vectors);
        assert_eq!(sorted, vec![c(-1.0, 0.0), c(0.5, -3.0), c(2.0, 1.0)]);
        assert_eq!(vectors[0][0], c(1.0, 0.0));
        assert_eq!(vectors[1][0], c(2.0, 0.0));
        assert_eq!(vectors[2][0], c(0.0, 0.0));
    }

    #[test]
    fn companion_sort_is_stable_on_ties() {
        let values = vec![c(1.0, 2.0), c(1.0, -2.0), c(0.0, 0.0)];
        let sorted = sort_by_real_part(values);
        assert_eq!(sorted, vec![c(0.0, 0.0), c(1.0, 2.0), c(1.0, -2.0)]);
    }

    #[test]
    fn hermitian_eigen_is_ascending() {
        let m = DMatrix::from_row_slice(
            2,
            2,
            &[c(1.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(1.0, 0.0)],
        );
        let (values, vectors) = hermitian_eigen(m.clone(), 1000).expect("eigh");
        assert!((values[0] - 0.0).abs() < 1e-12);
        assert!((values[1] - 2.0).abs() < 1e-12);
        for (value, vector) in values.iter().zip(&vectors) {
            let residual = &m * vector - vector * Complex64::new(*value, 0.0);
            assert!(residual.norm() < 1e-12);
        }
    }

    #[test]
    fn general_eigen_recovers_triangular_spectrum() {
        let m = DMatrix::from_row_slice(
            3,
            3,
            &[
                c(3.0, 0.0),
                c(1.0, 0.0),
                c(0.0, 2.0),
                c(0.0, 0.0),
                c(-1.0, 0.5),
                c(0.7, 0.0),
                c(0.0, 0.0),
                c(0.0, 0.0),
                c(1.0, 0.0),
            ],
        );
        let (values, vectors) = general_eigen(m.clone(), 1000).expect("eig");
        let (values, vectors) = sort_by_companion(values, vectors);
        assert!((values[0] - c(-1.0, 0.5)).norm() < 1e-10);
        assert!((values[1] - c(1.0, 0.0)).norm() < 1e-10);
        assert!((values[2] - c(3.0, 0.0)).norm() < 1e-10);
        for (value, vector) in values.iter().zip(&vectors) {
            assert!((vector.norm() - 1.0).abs() < 1e-12);
            let residual = &m * vector - vector * *value;
            assert!(residual.norm() < 1e-9);
        }
    }
}
