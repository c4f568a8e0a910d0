use serde::{Deserialize, Serialize};

use crate::{ElapsedMs, Found, JobKind, TaskId};

/// Terminal outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum JobOutcome {
    /// The engine returned normally.
    ///
    /// `exhausted` is `true` when the whole search space was explored,
    /// `false` when a result or time limit stopped it.
    Success { exhausted: bool },
    /// A cancel request was observed while the engine was reporting results.
    Cancelled,
    /// The engine (or input validation) reported an error.
    Failed { reason: String },
    /// Admission capacity was exhausted; no task was created.
    Rejected { capacity: usize },
}

impl JobOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Success { .. } => "success",
            JobOutcome::Cancelled => "cancelled",
            JobOutcome::Failed { .. } => "failed",
            JobOutcome::Rejected { .. } => "rejected",
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }
}

/// Everything a caller learns about a finished submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    /// `None` only for rejected submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub kind: JobKind,
    pub outcome: JobOutcome,
    /// Results accepted before the job stopped.
    pub results: Vec<Found>,
    pub elapsed_ms: ElapsedMs,
}

impl JobReport {
    pub fn rejected(kind: JobKind, capacity: usize) -> Self {
        Self {
            task_id: None,
            kind,
            outcome: JobOutcome::Rejected { capacity },
            results: Vec::new(),
            elapsed_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_is_internally_tagged() {
        let json = serde_json::to_value(JobOutcome::Rejected { capacity: 100 }).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["capacity"], 100);

        let json = serde_json::to_value(JobOutcome::Cancelled).unwrap();
        assert_eq!(json["status"], "cancelled");
    }

    #[test]
    fn rejected_report_has_no_task() {
        let report = JobReport::rejected(JobKind::Generate, 2);
        assert!(report.task_id.is_none());
        assert!(report.results.is_empty());
        assert_eq!(report.outcome.as_str(), "rejected");

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("taskId").is_none());
    }
}
