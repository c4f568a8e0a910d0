mod task_id;
pub use task_id::TaskId;

mod job_kind;
pub use job_kind::JobKind;

mod task_status;
pub use task_status::TaskStatus;

mod task_info;
pub use task_info::TaskInfo;

/// Elapsed time in milliseconds.
///
/// Used in task snapshots and job reports.
pub type ElapsedMs = u64;
