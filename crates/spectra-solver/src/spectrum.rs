//! Sorted eigenpair container.

use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Eigenpairs sorted by ascending real part of the eigenvalue.
///
/// Hermitian operators produce eigenvalues with a zero imaginary part;
/// non-Hermitian operators keep the full complex value. Eigenvectors are unit
/// normalised with no phase convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Spectrum {
    /// Eigenvalues, ascending by real part.
    pub eigenvalues: Vec<Complex64>,
    /// Eigenvector `i` belongs to eigenvalue `i`.
    pub eigenvectors: Vec<DVector<Complex64>>,
}

impl Spectrum {
    /// Number of eigenpairs.
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    /// True when no eigenpairs are stored.
    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Real part of the lowest eigenvalue.
    pub fn ground_energy(&self) -> Option<f64> {
        self.eigenvalues.first().map(|value| value.re)
    }

    /// Real parts of all eigenvalues.
    pub fn real_parts(&self) -> Vec<f64> {
        self.eigenvalues.iter().map(|value| value.re).collect()
    }

    /// Iterates over `(eigenvalue, eigenvector)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Complex64, &DVector<Complex64>)> + '_ {
        self.eigenvalues
            .iter()
            .copied()
            .zip(self.eigenvectors.iter())
    }

    pub(crate) fn truncated(mut self, n: usize) -> Self {
        self.eigenvalues.truncate(n);
        self.eigenvectors.truncate(n);
        self
    }
}
