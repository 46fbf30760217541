//! Rational continuation of sampled complex response functions.
//!
//! [`fit`] builds the continued-fraction coefficients of the Padé
//! interpolant through a set of `(node, value)` samples and returns a
//! [`PadeApproximant`] that can be evaluated anywhere in the complex plane,
//! typically just above the real axis to obtain a broadened response.

pub mod approximant;
pub mod fit;

pub use approximant::PadeApproximant;
pub use fit::{fit, DividedDifferences};
