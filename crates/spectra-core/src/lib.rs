#![deny(missing_docs)]
#![doc = "Shared error taxonomy, solver configuration and seeding policy for the spectra workspace."]

pub mod config;
pub mod errors;
pub mod rng;
pub mod serde;

pub use config::{
    SolverConfig, DEFAULT_HERMITIAN_TOLERANCE, DEFAULT_KRYLOV_TOLERANCE, DEFAULT_MAX_DENSE_SIZE,
    DEFAULT_MAX_ITERATIONS,
};
pub use errors::{ErrorInfo, ErrorKind, SpectraError};
pub use rng::{derive_substream_seed, RngHandle};
