//! Seam between the lifecycle layer and an external search engine.
//!
//! An engine is a synchronous, callback-driven iterator: it reports every result
//! it finds through a [`ResultSink`] on the caller's thread until it exhausts the
//! search, hits its own limit, or the sink tells it to stop.
//!
//! ## Cancellation contract
//! The sink reports cancellation as `Err(Cancelled)`. An engine must stop calling
//! the sink and return that value as [`EngineError::Cancelled`], which `?` does
//! through the `From` conversion below:
//!
//! ```ignore
//! for candidate in search {
//!     if sink.accept(candidate)? == Flow::Stop {
//!         break;
//!     }
//! }
//! ```
use thiserror::Error;

use crypta_model::{Found, JobKind, JobSpec};

/// What the sink wants after accepting a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep searching.
    Continue,
    /// The caller's result limit is reached; stop normally.
    Stop,
}

/// Cancellation signal raised out of a [`ResultSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("job cancelled")]
pub struct Cancelled;

/// Receives results from an engine.
pub trait ResultSink {
    fn accept(&mut self, found: Found) -> Result<Flow, Cancelled>;
}

impl<F> ResultSink for F
where
    F: FnMut(Found) -> Result<Flow, Cancelled>,
{
    fn accept(&mut self, found: Found) -> Result<Flow, Cancelled> {
        self(found)
    }
}

/// How an engine run ended when it ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineSummary {
    /// `true` if the whole search space was explored.
    pub exhausted: bool,
}

impl EngineSummary {
    pub fn exhausted() -> Self {
        Self { exhausted: true }
    }

    pub fn stopped() -> Self {
        Self { exhausted: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("task cancelled by user")]
    Cancelled,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("model error: {0}")]
    Model(String),
    #[error("solver error: {0}")]
    Solver(String),
    #[error("no engine supports {0} jobs")]
    Unsupported(JobKind),
    #[error("engine backend error: {0}")]
    Backend(String),
}

impl From<Cancelled> for EngineError {
    fn from(_: Cancelled) -> Self {
        EngineError::Cancelled
    }
}

impl From<crypta_model::ModelError> for EngineError {
    fn from(e: crypta_model::ModelError) -> Self {
        EngineError::InvalidRequest(e.to_string())
    }
}

/// External search engine.
pub trait Engine: Send + Sync + 'static {
    /// Engine name, used in logs.
    fn name(&self) -> &'static str;

    /// Whether this engine can run jobs of `kind`.
    fn supports(&self, kind: JobKind) -> bool;

    /// Run one job to completion on the calling thread.
    fn run(&self, spec: &JobSpec, sink: &mut dyn ResultSink) -> Result<EngineSummary, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(sink: &mut dyn ResultSink, n: usize) -> Result<EngineSummary, EngineError> {
        for i in 0..n {
            if sink.accept(Found::new(format!("n{i}"), "s"))? == Flow::Stop {
                return Ok(EngineSummary::stopped());
            }
        }
        Ok(EngineSummary::exhausted())
    }

    #[test]
    fn question_mark_keeps_the_cancel_variant() {
        let mut seen = 0;
        let mut sink = |_: Found| -> Result<Flow, Cancelled> {
            seen += 1;
            if seen == 2 { Err(Cancelled) } else { Ok(Flow::Continue) }
        };

        assert_eq!(drain(&mut sink, 10), Err(EngineError::Cancelled));
        assert_eq!(seen, 2);
    }

    #[test]
    fn stop_ends_the_run_normally() {
        let mut sink = |_: Found| -> Result<Flow, Cancelled> { Ok(Flow::Stop) };
        assert_eq!(drain(&mut sink, 10), Ok(EngineSummary::stopped()));
    }
}
