//! Expectation values and degenerate-manifold resolution.

use std::ops::Range;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use spectra_core::errors::{ErrorInfo, SpectraError};
use spectra_core::DEFAULT_MAX_ITERATIONS;

use crate::eigen::hermitian_eigen;
use crate::operator::Operator;
use crate::spectrum::Spectrum;

fn length_mismatch(what: &str, expected: usize, found: usize) -> SpectraError {
    SpectraError::Input(
        ErrorInfo::new("dimension-mismatch", format!("{what} has the wrong length"))
            .with_context("expected", expected)
            .with_context("found", found),
    )
}

/// Expectation value `<bra| M |ket>`; `ket` defaults to `bra`.
pub fn braket(
    bra: &DVector<Complex64>,
    op: &Operator,
    ket: Option<&DVector<Complex64>>,
) -> Result<Complex64, SpectraError> {
    let ket = ket.unwrap_or(bra);
    if bra.len() != op.dim() {
        return Err(length_mismatch("bra", op.dim(), bra.len()));
    }
    let image = op.matvec(ket)?;
    Ok(bra.dotc(&image))
}

/// Overlap `<a|b> = sum conj(a_i) b_i`.
pub fn inner_product(
    a: &DVector<Complex64>,
    b: &DVector<Complex64>,
) -> Result<Complex64, SpectraError> {
    if a.len() != b.len() {
        return Err(length_mismatch("second vector", a.len(), b.len()));
    }
    Ok(a.dotc(b))
}

/// Matrix `R[i][j] = <v_i| A |v_j>` of `op` in the span of `vectors`.
///
/// Contractions run against the sparse form of `op`.
pub fn representation_matrix(
    vectors: &[DVector<Complex64>],
    op: &Operator,
) -> Result<DMatrix<Complex64>, SpectraError> {
    if let Some(vector) = vectors.iter().find(|vector| vector.len() != op.dim()) {
        return Err(length_mismatch("manifold vector", op.dim(), vector.len()));
    }
    let sparse = op.to_sparse();
    let images: Vec<_> = vectors.iter().map(|vector| sparse.matvec(vector)).collect();
    let k = vectors.len();
    Ok(DMatrix::from_fn(k, k, |i, j| vectors[i].dotc(&images[j])))
}

/// Rotates a degenerate manifold onto eigenvectors of `aux`.
///
/// The representation of `aux` in the span of `vectors` is diagonalised as a
/// Hermitian matrix and the output vector `c` is `sum_i U[i][c] v_i`, ordered
/// by ascending eigenvalue of the representation. The span is unchanged and
/// norms are preserved by the unitarity of `U`; degeneracy of the input is
/// assumed, not checked.
pub fn disentangle_manifold(
    vectors: &[DVector<Complex64>],
    aux: &Operator,
) -> Result<Vec<DVector<Complex64>>, SpectraError> {
    disentangle_with_cap(vectors, aux, DEFAULT_MAX_ITERATIONS)
}

pub(crate) fn disentangle_with_cap(
    vectors: &[DVector<Complex64>],
    aux: &Operator,
    max_iterations: usize,
) -> Result<Vec<DVector<Complex64>>, SpectraError> {
    if vectors.is_empty() {
        return Ok(Vec::new());
    }
    let representation = representation_matrix(vectors, aux)?;
    let (_, rotation) = hermitian_eigen(representation, max_iterations)?;
    let dim = vectors[0].len();
    Ok(rotation
        .iter()
        .map(|column| {
            let mut combined = DVector::<Complex64>::zeros(dim);
            for (vector, &weight) in vectors.iter().zip(column.iter()) {
                combined.axpy(weight, vector, Complex64::new(1.0, 0.0));
            }
            combined
        })
        .collect())
}

/// Index ranges of consecutive eigenvalues that agree within `tol`.
///
/// Eigenvalues are compared against the first member of their group; only
/// groups with at least two members are returned.
pub fn degenerate_manifolds(spectrum: &Spectrum, tol: f64) -> Vec<Range<usize>> {
    let values = &spectrum.eigenvalues;
    let mut groups = Vec::new();
    let mut start = 0;
    for idx in 1..=values.len() {
        let splits = idx == values.len() || (values[idx] - values[start]).norm() > tol;
        if splits {
            if idx - start > 1 {
                groups.push(start..idx);
            }
            start = idx;
        }
    }
    groups
}
