//! Prometheus metrics backend for the crypta job runner.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of [`crypta_core::MetricsBackend`]
//! that exposes metrics in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use crypta_core::{EngineRouter, JobRunner, RunnerConfig};
//! use crypta_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let runner = JobRunner::new(Arc::new(EngineRouter::new()), RunnerConfig::default())?
//!     .with_metrics(Arc::new(metrics.clone()));
//!
//! // Serve this from your HTTP framework's `/metrics` route.
//! let body = metrics.encode_text()?;
//! # let _ = (runner, body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `crypta_jobs_admitted_total{kind}` - Counter
//! - `crypta_jobs_rejected_total{kind}` - Counter
//! - `crypta_jobs_finished_total{kind, outcome}` - Counter
//! - `crypta_job_duration_seconds{kind}` - Histogram
//! - `crypta_tasks_registered` - Gauge
//!
//! ## HTTP Server
//! This crate does NOT provide an HTTP server for the `/metrics` endpoint.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
