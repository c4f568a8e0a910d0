//! Data types shared across the crypta crates.
//!
//! Nothing here owns behavior: the registry, the runner and the transport
//! layers all speak in terms of these types.

mod domain;
pub use domain::*;

mod job;
pub use job::*;

mod error;
pub use error::ModelError;
