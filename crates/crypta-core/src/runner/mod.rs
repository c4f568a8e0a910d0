//! # Job runner
//!
//! Drives one job end-to-end:
//!
//! 1. take an admission slot, or return a `Rejected` report without registering anything;
//! 2. register the task and hold its [`TaskLease`];
//! 3. validate the parameters and run the engine through a [`CancelAwareSink`];
//! 4. resolve the terminal [`JobOutcome`];
//! 5. unregister the task, then release the slot.
//!
//! Step 5 happens through `Drop`, so it also runs when the engine panics.
use std::{sync::Arc, time::Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn};

use crypta_model::{Found, JobKind, JobOutcome, JobReport, JobSpec, TaskId, TaskInfo};

use crate::{
    admission::AdmissionController,
    cancel::CancelAwareSink,
    config::RunnerConfig,
    engine::{Engine, EngineError},
    error::CoreError,
    metrics::{MetricsBackend, NoOpMetrics},
    registry::{TaskLease, TaskRegistry},
};

/// One job submission.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Client-supplied id; blank or missing means a generated one.
    pub task_id: Option<String>,
    pub spec: JobSpec,
}

impl SubmitRequest {
    pub fn new(spec: impl Into<JobSpec>) -> Self {
        Self {
            task_id: None,
            spec: spec.into(),
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}

/// Admission-gated, cancellable job execution on the caller's thread.
///
/// Cheap to clone; clones share the registry, the admission slots and the engine.
#[derive(Clone)]
pub struct JobRunner {
    registry: TaskRegistry,
    admission: AdmissionController,
    engine: Arc<dyn Engine>,
    metrics: Arc<dyn MetricsBackend>,
}

impl JobRunner {
    pub fn new(engine: Arc<dyn Engine>, config: RunnerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            registry: TaskRegistry::new(),
            admission: AdmissionController::new(config.max_concurrent)?,
            engine,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Use a registry shared with other components.
    ///
    /// The registry reports its task gauge to this runner's metrics backend.
    pub fn with_registry(mut self, registry: TaskRegistry) -> Self {
        registry.set_metrics(Arc::clone(&self.metrics));
        self.registry = registry;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsBackend>) -> Self {
        self.registry.set_metrics(Arc::clone(&metrics));
        self.metrics = metrics;
        self
    }

    #[inline]
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    #[inline]
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// Run one job to its terminal outcome.
    ///
    /// Blocks the calling thread for as long as the engine runs.
    pub fn submit(&self, request: SubmitRequest) -> JobReport {
        self.run(request, None)
    }

    /// Like [`submit`](Self::submit), but cancelling `parent` also cancels the job,
    /// e.g. when the client that asked for it goes away.
    pub fn submit_linked(&self, request: SubmitRequest, parent: &CancellationToken) -> JobReport {
        self.run(request, Some(parent))
    }

    fn run(&self, request: SubmitRequest, parent: Option<&CancellationToken>) -> JobReport {
        let SubmitRequest { task_id, spec } = request;
        let kind = spec.kind();

        let Some(permit) = self.admission.try_acquire() else {
            self.metrics.job_rejected(kind);
            return JobReport::rejected(kind, self.admission.capacity());
        };
        self.metrics.job_admitted(kind);

        let lease = match parent {
            Some(parent) => self.registry.lease_linked(kind, task_id.as_deref(), parent),
            None => self.registry.lease(kind, task_id.as_deref()),
        };

        let span = info_span!("job", task_id = %lease.id(), kind = %kind);
        let _guard = span.enter();

        let started = Instant::now();
        let (outcome, results) = self.execute(&lease, &spec);
        let elapsed = started.elapsed();
        let task_id = lease.id().clone();

        drop(lease);
        permit.release();
        self.metrics.job_finished(kind, outcome.as_str(), elapsed);

        match &outcome {
            JobOutcome::Success { exhausted } => info!(
                results = results.len(),
                exhausted,
                elapsed_ms = elapsed.as_millis() as u64,
                "job completed"
            ),
            JobOutcome::Cancelled => info!(results = results.len(), "job cancelled"),
            JobOutcome::Failed { reason } => warn!(%reason, "job failed"),
            JobOutcome::Rejected { .. } => {}
        }

        JobReport {
            task_id: Some(task_id),
            kind,
            outcome,
            results,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    fn execute(&self, lease: &TaskLease, spec: &JobSpec) -> (JobOutcome, Vec<Found>) {
        if let Err(e) = spec.validate() {
            let reason = EngineError::from(e).to_string();
            return (JobOutcome::Failed { reason }, Vec::new());
        }

        lease.mark_running();
        debug!(engine = self.engine.name(), "engine started");

        let mut sink = CancelAwareSink::new(lease.token(), spec.result_limit());
        let result = self.engine.run(spec, &mut sink);
        let raised = sink.raised_cancel();
        let results = sink.into_results();

        let outcome = match result {
            _ if raised => {
                if !matches!(result, Err(EngineError::Cancelled)) {
                    warn!(engine = self.engine.name(), "engine did not propagate cancellation");
                }
                JobOutcome::Cancelled
            }
            Ok(summary) => JobOutcome::Success {
                exhausted: summary.exhausted,
            },
            Err(EngineError::Cancelled) => JobOutcome::Cancelled,
            Err(e) => JobOutcome::Failed {
                reason: e.to_string(),
            },
        };
        (outcome, results)
    }

    /// Request cancellation; `false` when no such task is registered.
    pub fn cancel(&self, id: &TaskId) -> bool {
        self.registry.cancel(id)
    }

    pub fn status(&self, id: &TaskId) -> Option<TaskInfo> {
        self.registry.get(id)
    }

    /// Number of registered tasks.
    pub fn load(&self) -> usize {
        self.registry.count()
    }

    pub fn list(&self, kind: Option<JobKind>) -> Vec<TaskInfo> {
        self.registry.list(kind)
    }
}
