use std::time::Duration;

use crypta_model::JobKind;

/// Metrics sink for job lifecycle events.
///
/// Every method has a no-op default so backends implement only what they export.
pub trait MetricsBackend: Send + Sync + 'static {
    /// A submission got an admission slot.
    fn job_admitted(&self, _kind: JobKind) {}

    /// A submission was rejected by admission control.
    fn job_rejected(&self, _kind: JobKind) {}

    /// An admitted job finished; `outcome` is `success`, `cancelled` or `failed`.
    fn job_finished(&self, _kind: JobKind, _outcome: &'static str, _elapsed: Duration) {}

    /// Number of registered tasks after a registry change.
    fn tasks_registered(&self, _count: usize) {}
}

/// Metrics backend that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {}
