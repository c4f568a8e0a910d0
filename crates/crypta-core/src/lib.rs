//! Task lifecycle and cancellation for long-running search jobs.
//!
//! ## Flow
//! caller → [`AdmissionController`] (slot or reject) → [`TaskRegistry`] (task lease)
//! → [`Engine`] driven through a [`CancelAwareSink`] → lease and slot released on every exit path.
//!
//! [`JobRunner`] owns that sequence; everything else is usable on its own.

pub mod admission;
pub use admission::{AdmissionController, AdmissionPermit};

pub mod cancel;
pub use cancel::CancelAwareSink;

pub mod config;
pub use config::RunnerConfig;

pub mod engine;
pub use engine::{Cancelled, Engine, EngineError, EngineSummary, Flow, ResultSink};

pub mod error;
pub use error::CoreError;

pub mod metrics;
pub use metrics::{MetricsBackend, NoOpMetrics};

pub mod registry;
pub use registry::{TaskLease, TaskRegistry};

pub mod router;
pub use router::EngineRouter;

pub mod runner;
pub use runner::{JobRunner, SubmitRequest};

mod system;
pub use system::{arch, init_uptime, platform, uptime_seconds};
