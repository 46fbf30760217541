//! Dense and compressed-sparse-column operator representations.

use std::borrow::Cow;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use serde::Serialize;
use spectra_core::errors::{ErrorInfo, SpectraError};

fn dimension_error(message: impl Into<String>, expected: usize, found: usize) -> SpectraError {
    SpectraError::Input(
        ErrorInfo::new("dimension-mismatch", message)
            .with_context("expected", expected)
            .with_context("found", found),
    )
}

fn dense_entries(matrix: &DMatrix<Complex64>) -> Vec<(usize, usize, Complex64)> {
    let mut entries = Vec::new();
    for col in 0..matrix.ncols() {
        for row in 0..matrix.nrows() {
            let value = matrix[(row, col)];
            if value != Complex64::new(0.0, 0.0) {
                entries.push((row, col, value));
            }
        }
    }
    entries
}

/// Square sparse matrix of complex numbers in compressed-sparse-column form.
///
/// Row indices within each column are strictly increasing and no stored
/// value is exactly zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CscMatrix {
    dim: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<Complex64>,
}

impl CscMatrix {
    /// Assembles a `dim × dim` matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate coordinates are summed and entries that cancel to zero are
    /// dropped. Out-of-range coordinates are rejected.
    pub fn from_triplets<I>(dim: usize, triplets: I) -> Result<Self, SpectraError>
    where
        I: IntoIterator<Item = (usize, usize, Complex64)>,
    {
        let mut entries = Vec::new();
        for (row, col, value) in triplets {
            if row >= dim || col >= dim {
                return Err(SpectraError::Input(
                    ErrorInfo::new("index-out-of-range", "triplet lies outside the matrix")
                        .with_context("row", row)
                        .with_context("col", col)
                        .with_context("dim", dim),
                ));
            }
            entries.push((row, col, value));
        }
        Ok(Self::assemble(dim, entries))
    }

    fn assemble(dim: usize, mut entries: Vec<(usize, usize, Complex64)>) -> Self {
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut coalesced: Vec<(usize, usize, Complex64)> = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(prev) = coalesced.last_mut() {
                if prev.0 == entry.0 && prev.1 == entry.1 {
                    prev.2 += entry.2;
                    continue;
                }
            }
            coalesced.push(entry);
        }
        coalesced.retain(|entry| entry.2 != Complex64::new(0.0, 0.0));

        let mut col_ptr = vec![0usize; dim + 1];
        for &(_, col, _) in &coalesced {
            col_ptr[col + 1] += 1;
        }
        for col in 0..dim {
            col_ptr[col + 1] += col_ptr[col];
        }
        let (row_idx, values): (Vec<usize>, Vec<Complex64>) = coalesced
            .into_iter()
            .map(|(row, _, value)| (row, value))
            .unzip();

        Self {
            dim,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Identity matrix of the given dimension.
    pub fn identity(dim: usize) -> Self {
        Self::from_diagonal(&vec![Complex64::new(1.0, 0.0); dim])
    }

    /// Diagonal matrix with the given entries.
    pub fn from_diagonal(diagonal: &[Complex64]) -> Self {
        let entries = diagonal
            .iter()
            .enumerate()
            .map(|(idx, &value)| (idx, idx, value))
            .collect();
        Self::assemble(diagonal.len(), entries)
    }

    /// Collects the non-zero entries of a square dense matrix.
    pub fn from_dense(matrix: &DMatrix<Complex64>) -> Result<Self, SpectraError> {
        if !matrix.is_square() {
            return Err(dimension_error(
                "operators must be square",
                matrix.nrows(),
                matrix.ncols(),
            ));
        }
        Ok(Self::assemble(matrix.nrows(), dense_entries(matrix)))
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterates over stored `(row, col, value)` entries in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        (0..self.dim).flat_map(move |col| {
            (self.col_ptr[col]..self.col_ptr[col + 1])
                .map(move |idx| (self.row_idx[idx], col, self.values[idx]))
        })
    }

    /// Returns the entry at `(row, col)`, zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        if col >= self.dim {
            return Complex64::new(0.0, 0.0);
        }
        let range = self.col_ptr[col]..self.col_ptr[col + 1];
        match self.row_idx[range.clone()].binary_search(&row) {
            Ok(offset) => self.values[range.start + offset],
            Err(_) => Complex64::new(0.0, 0.0),
        }
    }

    /// Sparse matrix-vector product `y = A x` for `x` of length `dim`.
    ///
    /// Callers outside the crate go through the checked [`Operator::matvec`].
    pub(crate) fn matvec(&self, x: &DVector<Complex64>) -> DVector<Complex64> {
        let mut y = DVector::zeros(self.dim);
        for col in 0..self.dim {
            let xj = x[col];
            if xj == Complex64::new(0.0, 0.0) {
                continue;
            }
            for idx in self.col_ptr[col]..self.col_ptr[col + 1] {
                y[self.row_idx[idx]] += self.values[idx] * xj;
            }
        }
        y
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let entries = self
            .iter()
            .map(|(row, col, value)| (col, row, value.conj()))
            .collect();
        Self::assemble(self.dim, entries)
    }

    /// Dense copy without any size guard.
    pub fn to_dense_unchecked(&self) -> DMatrix<Complex64> {
        let mut dense = DMatrix::zeros(self.dim, self.dim);
        for (row, col, value) in self.iter() {
            dense[(row, col)] = value;
        }
        dense
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Storage {
    Dense(DMatrix<Complex64>),
    Sparse(CscMatrix),
}

/// Square operator handed to the solver, either dense or sparse.
///
/// Only [`Operator::dense`], [`Operator::from_real`] and the conversions
/// construct it, so every operator is square. The solver treats it as
/// read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    storage: Storage,
}

impl From<CscMatrix> for Operator {
    fn from(matrix: CscMatrix) -> Self {
        Self {
            storage: Storage::Sparse(matrix),
        }
    }
}

impl TryFrom<DMatrix<Complex64>> for Operator {
    type Error = SpectraError;

    fn try_from(matrix: DMatrix<Complex64>) -> Result<Self, Self::Error> {
        Operator::dense(matrix)
    }
}

impl Operator {
    /// Wraps a dense matrix, rejecting non-square input.
    pub fn dense(matrix: DMatrix<Complex64>) -> Result<Self, SpectraError> {
        if !matrix.is_square() {
            return Err(dimension_error(
                "operators must be square",
                matrix.nrows(),
                matrix.ncols(),
            ));
        }
        Ok(Self {
            storage: Storage::Dense(matrix),
        })
    }

    /// Wraps a real dense matrix.
    pub fn from_real(matrix: &DMatrix<f64>) -> Result<Self, SpectraError> {
        Self::dense(matrix.map(|value| Complex64::new(value, 0.0)))
    }

    pub(crate) fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Matrix dimension `n` of the `n × n` operator.
    pub fn dim(&self) -> usize {
        match &self.storage {
            Storage::Dense(matrix) => matrix.nrows(),
            Storage::Sparse(matrix) => matrix.dim(),
        }
    }

    /// True for the sparse variant.
    pub fn is_sparse(&self) -> bool {
        matches!(self.storage, Storage::Sparse(_))
    }

    /// Checked matrix-vector product.
    pub fn matvec(&self, x: &DVector<Complex64>) -> Result<DVector<Complex64>, SpectraError> {
        if x.len() != self.dim() {
            return Err(dimension_error(
                "vector length does not match operator dimension",
                self.dim(),
                x.len(),
            ));
        }
        Ok(self.apply(x))
    }

    /// Matrix-vector product for vectors already known to have length `dim`.
    pub(crate) fn apply(&self, x: &DVector<Complex64>) -> DVector<Complex64> {
        match &self.storage {
            Storage::Dense(matrix) => matrix * x,
            Storage::Sparse(matrix) => matrix.matvec(x),
        }
    }

    /// Conjugate transpose, keeping the storage kind.
    pub fn adjoint(&self) -> Operator {
        let storage = match &self.storage {
            Storage::Dense(matrix) => Storage::Dense(matrix.adjoint()),
            Storage::Sparse(matrix) => Storage::Sparse(matrix.adjoint()),
        };
        Operator { storage }
    }

    /// Dense view of the operator.
    ///
    /// Sparse operators larger than `max_dense_size` are refused with
    /// [`SpectraError::Size`]; dense operators are always returned as-is.
    pub fn to_dense(
        &self,
        max_dense_size: usize,
    ) -> Result<Cow<'_, DMatrix<Complex64>>, SpectraError> {
        match &self.storage {
            Storage::Dense(matrix) => Ok(Cow::Borrowed(matrix)),
            Storage::Sparse(matrix) if matrix.dim() > max_dense_size => {
                Err(SpectraError::Size(
                    ErrorInfo::new(
                        "dense-limit-exceeded",
                        "refusing to densify a sparse operator above the dense limit",
                    )
                    .with_context("dim", matrix.dim())
                    .with_context("max_dense_size", max_dense_size)
                    .with_hint("raise max_dense_size deliberately or use an iterative operation"),
                ))
            }
            Storage::Sparse(matrix) => Ok(Cow::Owned(matrix.to_dense_unchecked())),
        }
    }

    /// Sparse view of the operator.
    pub fn to_sparse(&self) -> Cow<'_, CscMatrix> {
        match &self.storage {
            Storage::Sparse(matrix) => Cow::Borrowed(matrix),
            Storage::Dense(matrix) => {
                Cow::Owned(CscMatrix::assemble(matrix.nrows(), dense_entries(matrix)))
            }
        }
    }
}
