//! Solver facade dispatching between dense and Krylov paths.

use std::borrow::Cow;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use spectra_core::errors::{ErrorInfo, SpectraError};
use spectra_core::SolverConfig;
use tracing::debug;

use crate::dense;
use crate::eigen::{general_eigen, hermitian_eigen, sort_by_companion, sort_by_real_part};
use crate::krylov::{lowest_pairs, Which};
use crate::manifold;
use crate::operator::Operator;
use crate::spectrum::Spectrum;

fn invalid_request(message: &str, requested: usize, dim: usize) -> SpectraError {
    SpectraError::Input(
        ErrorInfo::new("invalid-request", message)
            .with_context("requested", requested)
            .with_context("dim", dim),
    )
}

/// Size-adaptive eigensolver.
///
/// Operators whose dimension exceeds `config.max_dense_size` are handled by
/// the restarted Krylov backend; smaller ones are densified and fully
/// diagonalised. The solver holds no state besides its configuration, so a
/// single instance can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct SpectralSolver {
    config: SolverConfig,
}

impl SpectralSolver {
    /// Creates a solver after validating `config`.
    pub fn new(config: SolverConfig) -> Result<Self, SpectraError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn use_krylov(&self, op: &Operator) -> bool {
        op.dim() > self.config.max_dense_size
    }

    /// Hermiticity check with the configured tolerance.
    pub fn is_hermitian(&self, op: &Operator) -> bool {
        dense::is_hermitian(op, self.config.hermitian_tolerance)
    }

    /// Dense form of `op`, guarded by the dense threshold.
    pub fn to_dense<'a>(
        &self,
        op: &'a Operator,
    ) -> Result<Cow<'a, DMatrix<Complex64>>, SpectraError> {
        dense::to_dense(op, self.config.max_dense_size)
    }

    /// Matrix exponential of a dense-representable operator.
    pub fn matrix_exponential(&self, op: &Operator) -> Result<DMatrix<Complex64>, SpectraError> {
        dense::matrix_exponential(op, self.config.max_dense_size)
    }

    /// Inverse of a dense-representable operator.
    pub fn inverse(&self, op: &Operator) -> Result<DMatrix<Complex64>, SpectraError> {
        dense::inverse(op, self.config.max_dense_size)
    }

    /// Full Hermitian eigendecomposition, ascending.
    pub fn eigh(&self, op: &Operator) -> Result<Spectrum, SpectraError> {
        let matrix = self.to_dense(op)?.into_owned();
        let (values, vectors) = hermitian_eigen(matrix, self.config.max_iterations)?;
        Ok(Spectrum {
            eigenvalues: values.into_iter().map(|v| Complex64::new(v, 0.0)).collect(),
            eigenvectors: vectors,
        })
    }

    /// All eigenvalues of a Hermitian operator, ascending.
    pub fn eigvalsh(&self, op: &Operator) -> Result<Vec<f64>, SpectraError> {
        let matrix = self.to_dense(op)?.into_owned();
        Ok(hermitian_eigen(matrix, self.config.max_iterations)?.0)
    }

    /// Lowest eigenpair of a Hermitian operator.
    ///
    /// The energy is the real part of the lowest eigenvalue.
    pub fn ground_state(&self, op: &Operator) -> Result<(f64, DVector<Complex64>), SpectraError> {
        let dim = op.dim();
        if dim == 0 {
            return Err(invalid_request("operator has no states", 1, dim));
        }
        if self.use_krylov(op) {
            debug!(dim, max_dense_size = self.config.max_dense_size, "ground state via krylov");
            let (values, mut vectors) =
                lowest_pairs(op, 1, Which::SmallestAlgebraic, &self.config)?;
            return Ok((values[0].re, vectors.swap_remove(0)));
        }
        debug!(dim, "ground state via full diagonalization");
        let matrix = self.to_dense(op)?.into_owned();
        let (values, mut vectors) = hermitian_eigen(matrix, self.config.max_iterations)?;
        Ok((values[0], vectors.swap_remove(0)))
    }

    /// The `n` lowest eigenvalues, ascending by real part.
    ///
    /// Non-Hermitian operators keep their complex eigenvalues; only the
    /// ordering key is the real part. On the dense path `n` larger than the
    /// dimension returns the whole spectrum.
    pub fn lowest_eigenvalues(
        &self,
        op: &Operator,
        n: usize,
    ) -> Result<Vec<Complex64>, SpectraError> {
        if n == 0 {
            return Err(invalid_request(
                "at least one eigenvalue must be requested",
                n,
                op.dim(),
            ));
        }
        if self.use_krylov(op) {
            return Ok(self.lowest_states(op, n)?.eigenvalues);
        }
        let matrix = self.to_dense(op)?.into_owned();
        let mut values: Vec<Complex64> = if self.is_hermitian(op) {
            debug!(dim = op.dim(), "hermitian eigenvalues via full diagonalization");
            hermitian_eigen(matrix, self.config.max_iterations)?
                .0
                .into_iter()
                .map(|v| Complex64::new(v, 0.0))
                .collect()
        } else {
            debug!(dim = op.dim(), "general eigenvalues via full diagonalization");
            sort_by_real_part(general_eigen(matrix, self.config.max_iterations)?.0)
        };
        values.truncate(n);
        Ok(values)
    }

    /// The `n` lowest eigenpairs, ascending by real part of the eigenvalue.
    ///
    /// Above the dense threshold the Krylov backend runs in Lanczos mode for
    /// Hermitian operators and Arnoldi mode otherwise; it rejects `n > dim`
    /// and surfaces non-convergence as [`SpectraError::Convergence`].
    pub fn lowest_states(&self, op: &Operator, n: usize) -> Result<Spectrum, SpectraError> {
        if n == 0 {
            return Err(invalid_request(
                "at least one eigenpair must be requested",
                n,
                op.dim(),
            ));
        }
        let hermitian = self.is_hermitian(op);
        let (values, vectors) = if self.use_krylov(op) {
            let which = if hermitian {
                Which::SmallestAlgebraic
            } else {
                Which::SmallestReal
            };
            debug!(dim = op.dim(), n, ?which, "lowest states via krylov");
            let (values, vectors) = lowest_pairs(op, n, which, &self.config)?;
            sort_by_companion(values, vectors)
        } else {
            let matrix = self.to_dense(op)?.into_owned();
            if hermitian {
                debug!(dim = op.dim(), n, "hermitian lowest states via full diagonalization");
                let (values, vectors) = hermitian_eigen(matrix, self.config.max_iterations)?;
                let values: Vec<Complex64> =
                    values.into_iter().map(|v| Complex64::new(v, 0.0)).collect();
                (values, vectors)
            } else {
                debug!(dim = op.dim(), n, "general lowest states via full diagonalization");
                let (values, vectors) = general_eigen(matrix, self.config.max_iterations)?;
                sort_by_companion(values, vectors)
            }
        };
        Ok(Spectrum {
            eigenvalues: values,
            eigenvectors: vectors,
        }
        .truncated(n))
    }

    /// Alias of [`SpectralSolver::lowest_states`].
    pub fn lowest_eigenvectors(&self, op: &Operator, n: usize) -> Result<Spectrum, SpectraError> {
        self.lowest_states(op, n)
    }

    /// Re-expresses a degenerate manifold in the eigenbasis of `aux`.
    pub fn disentangle_manifold(
        &self,
        vectors: &[DVector<Complex64>],
        aux: &Operator,
    ) -> Result<Vec<DVector<Complex64>>, SpectraError> {
        manifold::disentangle_with_cap(vectors, aux, self.config.max_iterations)
    }
}
