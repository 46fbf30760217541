#![allow(dead_code)]

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use spectra_core::RngHandle;
use spectra_solver::{CscMatrix, Operator};

pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Open transverse-field Ising chain `-J sum Z_i Z_{i+1} - h sum X_i`.
pub fn tfim_chain(sites: usize, coupling: f64, field: f64) -> Operator {
    let dim = 1usize << sites;
    let mut triplets = Vec::new();
    for state in 0..dim {
        let spin = |site: usize| if state >> site & 1 == 0 { 1.0 } else { -1.0 };
        let diagonal: f64 = (0..sites - 1).map(|i| -coupling * spin(i) * spin(i + 1)).sum();
        triplets.push((state, state, c(diagonal, 0.0)));
        for site in 0..sites {
            triplets.push((state ^ (1 << site), state, c(-field, 0.0)));
        }
    }
    Operator::from(CscMatrix::from_triplets(dim, triplets).expect("tfim triplets"))
}

/// Upper bidiagonal non-Hermitian matrix with diagonal `0.5 k + 0.05 i (k mod 3)`.
///
/// Its eigenvalues are exactly the diagonal entries.
pub fn bidiagonal(dim: usize) -> (Operator, Vec<Complex64>) {
    let diagonal: Vec<Complex64> = (0..dim)
        .map(|k| c(0.5 * k as f64, 0.05 * (k % 3) as f64))
        .collect();
    let mut triplets: Vec<_> = diagonal
        .iter()
        .enumerate()
        .map(|(k, &value)| (k, k, value))
        .collect();
    for k in 0..dim - 1 {
        triplets.push((k, k + 1, c(0.3, 0.0)));
    }
    let op = Operator::from(CscMatrix::from_triplets(dim, triplets).expect("bidiagonal"));
    (op, diagonal)
}

/// Dense random Hermitian matrix `(B + B^H) / 2`.
pub fn random_hermitian(dim: usize, seed: u64) -> DMatrix<Complex64> {
    let mut rng = RngHandle::from_seed(seed);
    let b = DMatrix::from_fn(dim, dim, |_, _| c(rng.centered(), rng.centered()));
    (&b + b.adjoint()).scale(0.5)
}

pub fn projector(vectors: &[DVector<Complex64>]) -> DMatrix<Complex64> {
    let dim = vectors[0].len();
    let mut out = DMatrix::zeros(dim, dim);
    for v in vectors {
        out += v * v.adjoint();
    }
    out
}
