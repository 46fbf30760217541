//! Evaluation of the fitted continued fraction.

use num_complex::Complex64;
use serde::Serialize;

/// Continued-fraction Padé approximant
///
/// `a_0 / (1 + a_1 (z - z_0) / (1 + a_2 (z - z_1) / (1 + ...)))`
///
/// returned by [`crate::fit()`]. It reproduces the fitted values at the nodes
/// up to round-off; away from the sampled region spurious poles can appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadeApproximant {
    coefficients: Vec<Complex64>,
    nodes: Vec<Complex64>,
    values: Vec<Complex64>,
}

impl PadeApproximant {
    pub(crate) fn new(
        coefficients: Vec<Complex64>,
        nodes: Vec<Complex64>,
        values: Vec<Complex64>,
    ) -> Self {
        Self {
            coefficients,
            nodes,
            values,
        }
    }

    /// Evaluates the approximant at `z`.
    ///
    /// Runs the two-term recurrence
    /// `A_n = A_{n-1} + (z - z_{n-1}) a_n A_{n-2}` (likewise for `B`) from
    /// `A_{-1} = 0, A_0 = a_0, B_{-1} = B_0 = 1` and returns `A / B`.
    pub fn evaluate(&self, z: Complex64) -> Complex64 {
        let one = Complex64::new(1.0, 0.0);
        let (mut a_prev, mut a) = (Complex64::new(0.0, 0.0), self.coefficients[0]);
        let (mut b_prev, mut b) = (one, one);
        for (node, &coefficient) in self.nodes.iter().zip(&self.coefficients[1..]) {
            let factor = (z - node) * coefficient;
            (a_prev, a) = (a, a + factor * a_prev);
            (b_prev, b) = (b, b + factor * b_prev);
        }
        a / b
    }

    /// Evaluates at a real argument.
    pub fn evaluate_real(&self, x: f64) -> Complex64 {
        self.evaluate(Complex64::new(x, 0.0))
    }

    /// Evaluates at every point of `zs`.
    pub fn evaluate_many(&self, zs: &[Complex64]) -> Vec<Complex64> {
        zs.iter().map(|&z| self.evaluate(z)).collect()
    }

    /// Analytic continuation to `omega + i eta` for every frequency.
    pub fn evaluate_with_broadening(&self, omegas: &[f64], eta: f64) -> Vec<Complex64> {
        omegas
            .iter()
            .map(|&omega| self.evaluate(Complex64::new(omega, eta)))
            .collect()
    }

    /// Continued-fraction coefficients `a_i`.
    pub fn coefficients(&self) -> &[Complex64] {
        &self.coefficients
    }

    /// Interpolation nodes.
    pub fn nodes(&self) -> &[Complex64] {
        &self.nodes
    }

    /// Sample values the fit reproduces.
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Number of continued-fraction terms.
    pub fn order(&self) -> usize {
        self.coefficients.len()
    }
}
