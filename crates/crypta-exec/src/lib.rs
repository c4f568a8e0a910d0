//! Concrete engines for the job runner.
//!
//! - [`FnEngine`]: an in-process closure.
//! - [`ProcessEngine`] (feature `proc`): an external program driven over a line protocol.
mod error;
pub use error::{ExecError, ExecResult};

pub mod r#fn;
pub use r#fn::FnEngine;

#[cfg(feature = "proc")]
pub mod proc;
#[cfg(feature = "proc")]
pub use proc::{ProcConfig, ProcessEngine};

#[cfg(feature = "proc")]
mod util;

pub mod prelude {
    pub use crate::FnEngine;
    pub use crate::error::{ExecError, ExecResult};
    #[cfg(feature = "proc")]
    pub use crate::proc::{ProcConfig, ProcessEngine};
}
