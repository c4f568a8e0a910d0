use serde::{Deserialize, Serialize};

/// Phase of a task that is still present in the registry.
///
/// Terminal outcomes are not statuses: a finished task is unregistered,
/// its outcome travels in the job report instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Registered, engine not started yet.
    Registered,
    /// Engine is running.
    Running,
    /// Cancel was requested; the job stops at the next result it reports.
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Registered => "REGISTERED",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }
}
