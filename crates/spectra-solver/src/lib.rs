//! Size-adaptive spectral solver for finite many-body operators.
//!
//! Operators up to `SolverConfig::max_dense_size` are densified and fully
//! diagonalised; larger ones go through a restarted Krylov iteration.
//! Non-Hermitian spectra are ordered by the real part of the eigenvalue while
//! the full complex value is kept.

pub mod dense;
pub mod eigen;
pub mod krylov;
pub mod manifold;
pub mod operator;
pub mod solver;
pub mod spectrum;

pub use dense::{hermiticity_defect, inverse, is_hermitian, matrix_exponential, to_dense};
pub use eigen::{general_eigen, hermitian_eigen, sort_by_companion, sort_by_real_part};
pub use krylov::{lowest_pairs, Which};
pub use manifold::{
    braket, degenerate_manifolds, disentangle_manifold, inner_product, representation_matrix,
};
pub use operator::{CscMatrix, Operator};
pub use solver::SpectralSolver;
pub use spectrum::Spectrum;

pub use spectra_core::{SolverConfig, SpectraError};
