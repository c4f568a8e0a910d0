use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::{ElapsedMs, JobKind, TaskId, TaskStatus};

/// Read-only snapshot of a registered task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    /// Registry key.
    pub id: TaskId,
    /// Job category.
    #[serde(rename = "type")]
    pub kind: JobKind,
    /// Phase at snapshot time.
    pub status: TaskStatus,
    /// Whether cancel was requested.
    pub cancelled: bool,
    /// Wall-clock registration time.
    #[serde(with = "time_serde")]
    pub started_at: SystemTime,
    /// Time since registration, computed when the snapshot was taken.
    pub elapsed_time_ms: ElapsedMs,
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        (since_epoch.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis))
    }
}
