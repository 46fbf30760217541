//! Hermiticity check and dense-only convenience wrappers.

use std::borrow::Cow;

use nalgebra::DMatrix;
use num_complex::Complex64;
use spectra_core::errors::{ErrorInfo, SpectraError};

use crate::operator::{Operator, Storage};

/// Returns `max |M - M^H|` over all entries.
///
/// Sparse operators are compared entry by entry without densifying.
pub fn hermiticity_defect(op: &Operator) -> f64 {
    match op.storage() {
        Storage::Dense(matrix) => {
            let n = matrix.nrows();
            let mut worst = 0.0f64;
            for col in 0..n {
                for row in 0..=col {
                    let gap = (matrix[(row, col)] - matrix[(col, row)].conj()).norm();
                    worst = worst.max(gap);
                }
            }
            worst
        }
        // |a - conj(b)| is symmetric in the pair, so visiting stored entries
        // also covers positions whose mirror is the stored one.
        Storage::Sparse(matrix) => matrix
            .iter()
            .map(|(row, col, value)| (value - matrix.get(col, row).conj()).norm())
            .fold(0.0f64, f64::max),
    }
}

/// True iff `max |M - M^H| <= tol`.
pub fn is_hermitian(op: &Operator, tol: f64) -> bool {
    hermiticity_defect(op) <= tol
}

/// Dense form of `op`, refusing sparse operators above `max_dense_size`.
pub fn to_dense(
    op: &Operator,
    max_dense_size: usize,
) -> Result<Cow<'_, DMatrix<Complex64>>, SpectraError> {
    op.to_dense(max_dense_size)
}

/// Matrix exponential `exp(M)`.
pub fn matrix_exponential(
    op: &Operator,
    max_dense_size: usize,
) -> Result<DMatrix<Complex64>, SpectraError> {
    Ok(to_dense(op, max_dense_size)?.exp())
}

/// Matrix inverse `M^-1`.
pub fn inverse(op: &Operator, max_dense_size: usize) -> Result<DMatrix<Complex64>, SpectraError> {
    to_dense(op, max_dense_size)?
        .into_owned()
        .try_inverse()
        .ok_or_else(|| {
            SpectraError::Input(
                ErrorInfo::new("singular-matrix", "operator is not invertible")
                    .with_context("dim", op.dim()),
            )
        })
}
