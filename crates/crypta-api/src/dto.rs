use serde::{Deserialize, Serialize};

use crypta_model::{
    ElapsedMs, Found, GenerateSpec, JobKind, JobOutcome, JobReport, SolveSpec, TaskId, TaskInfo,
};

// ============================================================================
// Job requests
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SolveRequest {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub spec: SolveSpec,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub spec: GenerateSpec,
}

// ============================================================================
// Job responses
// ============================================================================

/// `null` for successful jobs.
fn error_of(outcome: &JobOutcome) -> Option<String> {
    match outcome {
        JobOutcome::Success { .. } => None,
        JobOutcome::Cancelled => Some("task cancelled by user".to_string()),
        JobOutcome::Failed { reason } => Some(reason.clone()),
        JobOutcome::Rejected { capacity } => Some(format!(
            "too many concurrent requests (capacity {capacity})"
        )),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Solution {
    pub assignment: String,
    pub evaluation: String,
    pub valid: bool,
}

impl From<Found> for Solution {
    fn from(found: Found) -> Self {
        Self {
            evaluation: format!("{} = {}", found.node, found.solution),
            assignment: found.solution,
            valid: found.valid,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SolveResponse {
    pub success: bool,
    pub outcome: &'static str,
    pub task_id: Option<TaskId>,
    pub cryptarithm: String,
    pub solutions: Vec<Solution>,
    pub solution_count: usize,
    pub error: Option<String>,
    pub execution_time_ms: ElapsedMs,
}

impl SolveResponse {
    pub fn from_report(cryptarithm: String, report: JobReport) -> Self {
        let solutions: Vec<Solution> = report.results.into_iter().map(Solution::from).collect();
        Self {
            success: report.outcome.is_success(),
            outcome: report.outcome.as_str(),
            error: error_of(&report.outcome),
            task_id: report.task_id,
            cryptarithm,
            solution_count: solutions.len(),
            solutions,
            execution_time_ms: report.elapsed_ms,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeneratedCryptarithm {
    pub cryptarithm: String,
    pub solution: String,
}

impl From<Found> for GeneratedCryptarithm {
    fn from(found: Found) -> Self {
        Self {
            cryptarithm: found.node,
            solution: found.solution,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponse {
    pub success: bool,
    pub outcome: &'static str,
    pub task_id: Option<TaskId>,
    pub cryptarithms: Vec<GeneratedCryptarithm>,
    pub count: usize,
    pub error: Option<String>,
    pub execution_time_ms: ElapsedMs,
}

impl From<JobReport> for GenerateResponse {
    fn from(report: JobReport) -> Self {
        let cryptarithms: Vec<GeneratedCryptarithm> = report
            .results
            .into_iter()
            .map(GeneratedCryptarithm::from)
            .collect();
        Self {
            success: report.outcome.is_success(),
            outcome: report.outcome.as_str(),
            error: error_of(&report.outcome),
            task_id: report.task_id,
            count: cryptarithms.len(),
            cryptarithms,
            execution_time_ms: report.elapsed_ms,
        }
    }
}

// ============================================================================
// Task responses
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelResponse {
    pub success: bool,
    pub message: &'static str,
    pub task_id: TaskId,
}

impl CancelResponse {
    pub fn new(task_id: TaskId, found: bool) -> Self {
        let message = if found {
            "Task cancelled successfully"
        } else {
            "Task not found or already completed"
        };
        Self {
            success: found,
            message,
            task_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusResponse {
    pub found: bool,
    pub task_id: TaskId,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<JobKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time_ms: Option<ElapsedMs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
    pub status: &'static str,
}

impl StatusResponse {
    pub fn new(task_id: TaskId, info: Option<TaskInfo>) -> Self {
        match info {
            Some(info) => Self {
                found: true,
                task_id,
                kind: Some(info.kind),
                elapsed_time_ms: Some(info.elapsed_time_ms),
                cancelled: Some(info.cancelled),
                status: info.status.as_str(),
            },
            None => Self {
                found: false,
                task_id,
                kind: None,
                elapsed_time_ms: None,
                cancelled: None,
                status: "NOT_FOUND",
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTasksParams {
    /// Filter by job kind (`SOLVE` or `GENERATE`).
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListTasksResponse {
    pub tasks: Vec<TaskInfo>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub platform: &'static str,
    pub arch: &'static str,
    pub running_tasks: usize,
    pub capacity: usize,
    pub available: usize,
}
