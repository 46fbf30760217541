//! Restarted Krylov eigensolver for operators above the dense threshold.
//!
//! Thick-restart Rayleigh–Ritz on a Krylov basis with full (twice iterated)
//! Gram–Schmidt re-orthogonalisation. In Lanczos mode the projected matrix is
//! Hermitian and the algebraically smallest Ritz values are tracked; in
//! Arnoldi mode the projection is diagonalised through a complex Schur form
//! and Ritz values are ranked by real part. After every sweep the wanted Ritz
//! vectors are kept as the head of the next basis and the expansion continues
//! from the residual direction, so each restart only pays for the new
//! matrix-vector products.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use spectra_core::errors::{ErrorInfo, SpectraError};
use spectra_core::{RngHandle, SolverConfig};
use tracing::debug;

use crate::eigen::{general_eigen, hermitian_eigen, sort_by_companion};
use crate::operator::Operator;

const MIN_SUBSPACE: usize = 20;
const BREAKDOWN: f64 = 1e-12;

/// Portion of the spectrum the iteration converges to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Which {
    /// Smallest eigenvalues of a Hermitian operator.
    SmallestAlgebraic,
    /// Eigenvalues with the smallest real part of a general operator.
    SmallestReal,
}

/// Converged eigenpairs ordered by ascending real part.
pub type EigenPairs = (Vec<Complex64>, Vec<DVector<Complex64>>);

struct KrylovBasis<'a> {
    op: &'a Operator,
    vectors: Vec<DVector<Complex64>>,
    images: Vec<DVector<Complex64>>,
    pending: Option<DVector<Complex64>>,
    seed: u64,
    fresh_draws: u64,
}

struct RitzPairs {
    values: Vec<Complex64>,
    coefficients: Vec<DVector<Complex64>>,
}

impl<'a> KrylovBasis<'a> {
    fn new(op: &'a Operator, seed: u64) -> Self {
        Self {
            op,
            vectors: Vec::new(),
            images: Vec::new(),
            pending: None,
            seed,
            fresh_draws: 0,
        }
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn push(&mut self, vector: DVector<Complex64>) {
        self.images.push(self.op.apply(&vector));
        self.vectors.push(vector);
    }

    /// Removes the components of `w` along the basis (two passes) and returns its norm.
    fn orthogonalize(&self, w: &mut DVector<Complex64>) -> f64 {
        for _ in 0..2 {
            for q in &self.vectors {
                let proj = q.dotc(w);
                w.axpy(-proj, q, Complex64::new(1.0, 0.0));
            }
        }
        w.norm()
    }

    fn random_direction(&mut self) -> DVector<Complex64> {
        let mut rng = RngHandle::substream(self.seed, self.fresh_draws);
        self.fresh_draws += 1;
        let dim = self.op.dim();
        DVector::from_fn(dim, |_, _| Complex64::new(rng.centered(), rng.centered()))
    }

    /// Next unit vector orthogonal to the basis.
    fn next_direction(&mut self) -> DVector<Complex64> {
        let candidate = match self.pending.take() {
            Some(vector) => Some(vector),
            None => self.images.last().cloned(),
        };
        if let Some(mut w) = candidate {
            let scale = w.norm().max(1.0);
            let norm = self.orthogonalize(&mut w);
            if norm > BREAKDOWN * scale {
                return w.unscale(norm);
            }
        }
        // Invariant subspace reached: continue from a fresh random direction.
        loop {
            let mut w = self.random_direction();
            let norm = self.orthogonalize(&mut w);
            if norm > BREAKDOWN {
                return w.unscale(norm);
            }
        }
    }

    fn expand(&mut self, target: usize) {
        while self.len() < target {
            let direction = self.next_direction();
            self.push(direction);
        }
    }

    fn combine(parts: &[DVector<Complex64>], coefficients: &DVector<Complex64>) -> DVector<Complex64> {
        let mut out = DVector::zeros(parts[0].len());
        for (part, &coefficient) in parts.iter().zip(coefficients.iter()) {
            out.axpy(coefficient, part, Complex64::new(1.0, 0.0));
        }
        out
    }

    fn rayleigh_ritz(&self, which: Which, max_iterations: usize) -> Result<RitzPairs, SpectraError> {
        let m = self.len();
        let projected =
            DMatrix::from_fn(m, m, |row, col| self.vectors[row].dotc(&self.images[col]));
        let (values, coefficients) = match which {
            Which::SmallestAlgebraic => {
                let hermitian = (&projected + projected.adjoint()).scale(0.5);
                let (values, coefficients) = hermitian_eigen(hermitian, max_iterations)?;
                let values: Vec<Complex64> =
                    values.into_iter().map(|v| Complex64::new(v, 0.0)).collect();
                (values, coefficients)
            }
            Which::SmallestReal => {
                let (values, coefficients) = general_eigen(projected, max_iterations)?;
                sort_by_companion(values, coefficients)
            }
        };
        Ok(RitzPairs {
            values,
            coefficients,
        })
    }

    /// Replaces the basis by the orthonormalised leading `keep` Ritz vectors.
    ///
    /// Images are carried along the same linear combinations so no new
    /// matrix-vector products are spent.
    fn restart(&mut self, ritz: &RitzPairs, keep: usize, residual: Option<DVector<Complex64>>) {
        let mut vectors: Vec<DVector<Complex64>> = Vec::with_capacity(keep);
        let mut images: Vec<DVector<Complex64>> = Vec::with_capacity(keep);
        for coefficients in ritz.coefficients.iter().take(keep) {
            let mut x = Self::combine(&self.vectors, coefficients);
            let mut ax = Self::combine(&self.images, coefficients);
            for _ in 0..2 {
                for (q, aq) in vectors.iter().zip(&images) {
                    let proj = q.dotc(&x);
                    x.axpy(-proj, q, Complex64::new(1.0, 0.0));
                    ax.axpy(-proj, aq, Complex64::new(1.0, 0.0));
                }
            }
            let norm = x.norm();
            if norm <= BREAKDOWN {
                continue;
            }
            vectors.push(x.unscale(norm));
            images.push(ax.unscale(norm));
        }
        self.vectors = vectors;
        self.images = images;
        self.pending = residual;
    }
}

/// Computes the `nev` lowest eigenpairs of `op` iteratively.
///
/// Fails with [`SpectraError::Input`] when `nev` is zero or exceeds the
/// dimension and with [`SpectraError::Convergence`] once
/// `config.max_iterations` restart cycles have been spent.
pub fn lowest_pairs(
    op: &Operator,
    nev: usize,
    which: Which,
    config: &SolverConfig,
) -> Result<EigenPairs, SpectraError> {
    let dim = op.dim();
    if nev == 0 || nev > dim {
        return Err(SpectraError::Input(
            ErrorInfo::new(
                "invalid-request",
                "number of requested eigenpairs must lie in 1..=dim",
            )
            .with_context("requested", nev)
            .with_context("dim", dim),
        ));
    }
    let subspace = config
        .krylov_subspace
        .unwrap_or((2 * nev + 1).max(MIN_SUBSPACE))
        .max(nev + 1)
        .min(dim);
    let keep = (nev + (subspace - nev) / 2).min(subspace - 1).max(1);

    let mut basis = KrylovBasis::new(op, config.seed);
    let mut converged = 0;
    for iteration in 0..config.max_iterations {
        basis.expand(subspace);
        let ritz = basis.rayleigh_ritz(which, config.max_iterations)?;
        let exact = basis.len() == dim;

        converged = 0;
        let mut first_residual = None;
        let mut pairs_out: Vec<DVector<Complex64>> = Vec::with_capacity(nev);
        for (value, coefficients) in ritz.values.iter().zip(&ritz.coefficients).take(nev) {
            let x = KrylovBasis::combine(&basis.vectors, coefficients);
            let ax = KrylovBasis::combine(&basis.images, coefficients);
            let residual = &ax - &x * *value;
            if exact || residual.norm() <= config.krylov_tolerance * value.norm().max(1.0) {
                converged += 1;
            } else if first_residual.is_none() {
                first_residual = Some(residual);
            }
            pairs_out.push(x);
        }

        if converged == nev {
            debug!(dim, nev, subspace, iterations = iteration + 1, "krylov converged");
            let values = ritz.values[..nev].to_vec();
            let vectors = pairs_out.into_iter().map(|x| x.normalize()).collect();
            return Ok(sort_by_companion(values, vectors));
        }
        basis.restart(&ritz, keep, first_residual);
    }

    Err(SpectraError::Convergence(
        ErrorInfo::new(
            "krylov-not-converged",
            "iterative eigensolver exhausted its restart budget",
        )
        .with_context("dim", dim)
        .with_context("requested", nev)
        .with_context("converged", converged)
        .with_context("max_iterations", config.max_iterations)
        .with_hint("raise max_iterations or krylov_subspace"),
    ))
}
