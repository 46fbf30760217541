//! Solver configuration and its YAML/JSON loaders.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SpectraError};

/// Largest dimension a sparse operator may have before dense materialisation is refused.
pub const DEFAULT_MAX_DENSE_SIZE: usize = 3000;
/// Iteration cap shared by the Krylov restarts and the dense QR sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;
/// Tolerance on `max |M - M^H|` below which an operator counts as Hermitian.
pub const DEFAULT_HERMITIAN_TOLERANCE: f64 = 1e-6;
/// Relative Ritz residual accepted as converged.
pub const DEFAULT_KRYLOV_TOLERANCE: f64 = 1e-10;

fn default_max_dense_size() -> usize {
    DEFAULT_MAX_DENSE_SIZE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_hermitian_tolerance() -> f64 {
    DEFAULT_HERMITIAN_TOLERANCE
}

fn default_krylov_tolerance() -> f64 {
    DEFAULT_KRYLOV_TOLERANCE
}

fn config_error(field: &str, value: impl ToString, message: &str) -> SpectraError {
    SpectraError::Input(ErrorInfo::new("invalid-config", message).with_context(field, value))
}

/// Knobs governing solver dispatch and the iterative backend.
///
/// Every field has a default so partial YAML/JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Dimension above which the iterative path is used and dense conversion
    /// of sparse operators fails.
    #[serde(default = "default_max_dense_size")]
    pub max_dense_size: usize,
    /// Maximum number of Krylov restart cycles (and dense QR iterations).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Tolerance used by the Hermiticity check.
    #[serde(default = "default_hermitian_tolerance")]
    pub hermitian_tolerance: f64,
    /// Relative residual tolerance for Ritz pairs.
    #[serde(default = "default_krylov_tolerance")]
    pub krylov_tolerance: f64,
    /// Krylov basis size; `None` picks `max(2n + 1, 20)` clamped to the dimension.
    #[serde(default)]
    pub krylov_subspace: Option<usize>,
    /// Seed for the Krylov starting vector.
    #[serde(default)]
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_dense_size: DEFAULT_MAX_DENSE_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            hermitian_tolerance: DEFAULT_HERMITIAN_TOLERANCE,
            krylov_tolerance: DEFAULT_KRYLOV_TOLERANCE,
            krylov_subspace: None,
            seed: 0,
        }
    }
}

impl SolverConfig {
    /// Returns a copy with a different dense threshold.
    pub fn with_max_dense_size(mut self, max_dense_size: usize) -> Self {
        self.max_dense_size = max_dense_size;
        self
    }

    /// Returns a copy with a different iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns a copy with a different starting-vector seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that caps are positive and tolerances finite and non-negative.
    pub fn validate(&self) -> Result<(), SpectraError> {
        if self.max_iterations == 0 {
            return Err(config_error(
                "max_iterations",
                self.max_iterations,
                "max_iterations must be at least one",
            ));
        }
        if !self.hermitian_tolerance.is_finite() || self.hermitian_tolerance < 0.0 {
            return Err(config_error(
                "hermitian_tolerance",
                self.hermitian_tolerance,
                "hermitian_tolerance must be finite and non-negative",
            ));
        }
        if !self.krylov_tolerance.is_finite() || self.krylov_tolerance <= 0.0 {
            return Err(config_error(
                "krylov_tolerance",
                self.krylov_tolerance,
                "krylov_tolerance must be finite and positive",
            ));
        }
        if let Some(size) = self.krylov_subspace.filter(|&size| size < 2) {
            return Err(config_error(
                "krylov_subspace",
                size,
                "krylov_subspace must be at least two",
            ));
        }
        Ok(())
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, SpectraError> {
        let config: Self = crate::serde::from_yaml_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, SpectraError> {
        let config: Self = crate::serde::from_json_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SpectraError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| {
            SpectraError::Serde(
                ErrorInfo::new("config_read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_slice(&data),
            _ => Self::from_yaml_slice(&data),
        }
    }
}
