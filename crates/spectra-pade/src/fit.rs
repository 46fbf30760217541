//! Divided-difference table of the continued-fraction Padé fit.

use num_complex::Complex64;
use spectra_core::errors::{ErrorInfo, SpectraError};
use tracing::debug;

use crate::approximant::PadeApproximant;

fn division_error(code: &str, message: &str, p: usize, k: usize) -> SpectraError {
    SpectraError::Division(
        ErrorInfo::new(code, message)
            .with_context("p", p)
            .with_context("k", k)
            .with_hint("samples are degenerate for a continued fraction; drop or perturb them"),
    )
}

/// Triangular table `g(p, k)` for `0 <= p <= k < m`.
///
/// Stored as a flat `m × m` arena; cells below the diagonal are never read.
///
/// Row zero holds the sample values and every later row is derived from the
/// one above it:
///
/// `g(p, k) = (g(p-1, p-1) - g(p-1, k)) / ((z_k - z_{p-1}) g(p-1, k))`
///
/// so each cell is computed exactly once. The diagonal `g(i, i)` carries the
/// continued-fraction coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct DividedDifferences {
    order: usize,
    cells: Vec<Complex64>,
}

impl DividedDifferences {
    /// Fills the table for `nodes`/`values` of equal, non-zero length.
    pub fn build(nodes: &[Complex64], values: &[Complex64]) -> Result<Self, SpectraError> {
        validate_samples(nodes, values)?;
        let order = nodes.len();
        let mut table = Self {
            order,
            cells: vec![Complex64::new(0.0, 0.0); order * order],
        };
        for (k, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(division_error(
                    "non-finite-coefficient",
                    "sample value is not finite",
                    0,
                    k,
                ));
            }
            table.cells[k] = value;
        }
        for p in 1..order {
            let pivot = table.cell(p - 1, p - 1);
            for k in p..order {
                let above = table.cell(p - 1, k);
                let denominator = (nodes[k] - nodes[p - 1]) * above;
                if denominator.norm() == 0.0 || !denominator.is_finite() {
                    return Err(division_error(
                        "zero-denominator",
                        "divided difference has a vanishing denominator",
                        p,
                        k,
                    ));
                }
                let cell = (pivot - above) / denominator;
                if !cell.is_finite() {
                    return Err(division_error(
                        "non-finite-coefficient",
                        "divided difference is not finite",
                        p,
                        k,
                    ));
                }
                table.cells[p * order + k] = cell;
            }
        }
        debug!(order, cells = order * (order + 1) / 2, "pade table filled");
        Ok(table)
    }

    /// Number of samples the table was built from.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Cell `g(p, k)` for `p <= k < order`, `None` outside the triangle.
    pub fn get(&self, p: usize, k: usize) -> Option<Complex64> {
        (p <= k && k < self.order).then(|| self.cell(p, k))
    }

    fn cell(&self, p: usize, k: usize) -> Complex64 {
        self.cells[p * self.order + k]
    }

    /// Continued-fraction coefficients `a_i = g(i, i)`.
    pub fn coefficients(&self) -> Vec<Complex64> {
        (0..self.order).map(|i| self.cell(i, i)).collect()
    }
}

fn validate_samples(nodes: &[Complex64], values: &[Complex64]) -> Result<(), SpectraError> {
    if nodes.is_empty() {
        return Err(SpectraError::input(
            "empty-input",
            "at least one sample is required",
        ));
    }
    if nodes.len() != values.len() {
        return Err(SpectraError::Input(
            ErrorInfo::new("dimension-mismatch", "nodes and values differ in length")
                .with_context("nodes", nodes.len())
                .with_context("values", values.len()),
        ));
    }
    Ok(())
}

/// Fits the continued-fraction Padé interpolant through `(nodes[k], values[k])`.
///
/// Degenerate samples that make a divided difference vanish are reported as
/// [`SpectraError::Division`] rather than regularised.
pub fn fit(nodes: &[Complex64], values: &[Complex64]) -> Result<PadeApproximant, SpectraError> {
    let table = DividedDifferences::build(nodes, values)?;
    Ok(PadeApproximant::new(
        table.coefficients(),
        nodes.to_vec(),
        values.to_vec(),
    ))
}
