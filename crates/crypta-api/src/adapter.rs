use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crypta_core::{JobRunner, SubmitRequest};
use crypta_model::{JobKind, JobOutcome, JobReport, TaskId, TaskInfo};

use crate::{
    error::ApiError,
    handler::{ApiHandler, Load},
};

/// Adapter that bridges [`JobRunner`] to [`ApiHandler`].
///
/// Jobs run on the blocking thread pool; the runner itself never awaits.
/// Dropping a `submit_job` future (a disconnected HTTP client) cancels its job.
#[derive(Clone)]
pub struct RunnerApiAdapter {
    runner: JobRunner,
}

impl RunnerApiAdapter {
    pub fn new(runner: JobRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &JobRunner {
        &self.runner
    }
}

#[async_trait]
impl ApiHandler for RunnerApiAdapter {
    async fn submit_job(&self, request: SubmitRequest) -> Result<JobReport, ApiError> {
        let runner = self.runner.clone();
        let caller = CancellationToken::new();
        let _abandon_on_drop = caller.clone().drop_guard();

        let report = tokio::task::spawn_blocking(move || runner.submit_linked(request, &caller))
            .await
            .map_err(|e| {
                error!(error = %e, "job aborted");
                ApiError::Internal(format!("job aborted: {e}"))
            })?;

        match report.outcome {
            JobOutcome::Rejected { capacity } => Err(ApiError::TooManyRequests { capacity }),
            _ => Ok(report),
        }
    }

    async fn cancel_task(&self, id: &TaskId) -> Result<bool, ApiError> {
        Ok(self.runner.cancel(id))
    }

    async fn get_task_status(&self, id: &TaskId) -> Result<Option<TaskInfo>, ApiError> {
        Ok(self.runner.status(id))
    }

    async fn list_tasks(&self, kind: Option<JobKind>) -> Result<Vec<TaskInfo>, ApiError> {
        Ok(self.runner.list(kind))
    }

    async fn load(&self) -> Result<Load, ApiError> {
        let admission = self.runner.admission();
        Ok(Load {
            running_tasks: self.runner.load(),
            capacity: admission.capacity(),
            available: admission.available(),
        })
    }
}
