use async_trait::async_trait;
use serde::Serialize;

use crypta_core::SubmitRequest;
use crypta_model::{JobKind, JobReport, TaskId, TaskInfo};

use crate::error::ApiError;

/// Current admission and registry load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub running_tasks: usize,
    pub capacity: usize,
    pub available: usize,
}

/// Job API handler.
///
/// This trait abstracts the backend implementation, allowing users to:
/// - Use the provided `RunnerApiAdapter`
/// - Implement custom handlers with additional logic (auth, quotas, etc.)
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Run a job to its terminal outcome.
    ///
    /// A submission rejected by admission control is [`ApiError::TooManyRequests`];
    /// cancelled and failed jobs are ordinary reports.
    async fn submit_job(&self, request: SubmitRequest) -> Result<JobReport, ApiError>;

    /// Request cancellation; `false` when the task is unknown or already finished.
    async fn cancel_task(&self, id: &TaskId) -> Result<bool, ApiError>;

    /// Get current status of a task by ID.
    async fn get_task_status(&self, id: &TaskId) -> Result<Option<TaskInfo>, ApiError>;

    /// List registered tasks, optionally of one kind.
    async fn list_tasks(&self, kind: Option<JobKind>) -> Result<Vec<TaskInfo>, ApiError>;

    async fn load(&self) -> Result<Load, ApiError>;
}
