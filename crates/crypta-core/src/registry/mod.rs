//! Process-wide registry of in-flight tasks.
//!
//! The registry owns every task; a running job only holds a [`TaskLease`],
//! which carries the cancellation token it polls and removes the task on drop.
//!
//! ## Invariants
//! - An id maps to exactly one entry until unregistered. Re-registering a live id
//!   replaces the entry (last register wins); the registry does not check uniqueness.
//! - The cancellation flag only goes from unset to set.
//! - Entries are fully built before insertion, so readers never see a partial task.
mod lease;
pub use lease::TaskLease;

use std::{
    collections::HashMap,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Instant, SystemTime},
};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crypta_model::{JobKind, TaskId, TaskInfo, TaskStatus};

use crate::metrics::MetricsBackend;

/// In-memory task registry.
///
/// Cheap to clone; clones share the same map.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    tasks: RwLock<HashMap<TaskId, Arc<TaskEntry>>>,
    /// Source of registration sequence numbers.
    seq: AtomicU64,
    /// Receives the registered-task gauge; read while the map is write-locked.
    metrics: RwLock<Option<Arc<dyn MetricsBackend>>>,
}

pub(crate) struct TaskEntry {
    id: TaskId,
    kind: JobKind,
    seq: u64,
    started_at: SystemTime,
    started: Instant,
    running: AtomicBool,
    token: CancellationToken,
}

impl TaskEntry {
    fn snapshot(&self) -> TaskInfo {
        let cancelled = self.token.is_cancelled();
        let status = if cancelled {
            TaskStatus::Cancelled
        } else if self.running.load(Ordering::Acquire) {
            TaskStatus::Running
        } else {
            TaskStatus::Registered
        };

        TaskInfo {
            id: self.id.clone(),
            kind: self.kind,
            status,
            cancelled,
            started_at: self.started_at,
            elapsed_time_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task and return the id it was registered under.
    ///
    /// A non-blank `client_id` is used as is; otherwise a UUID v4 is generated.
    pub fn register(&self, kind: JobKind, client_id: Option<&str>) -> TaskId {
        self.insert(kind, client_id, None).id.clone()
    }

    /// Register a task and return a scoped handle that unregisters it on drop.
    pub fn lease(&self, kind: JobKind, client_id: Option<&str>) -> TaskLease {
        let entry = self.insert(kind, client_id, None);
        TaskLease::new(self.clone(), entry)
    }

    /// Like [`lease`](Self::lease), but cancelling `parent` also cancels the task.
    pub fn lease_linked(
        &self,
        kind: JobKind,
        client_id: Option<&str>,
        parent: &CancellationToken,
    ) -> TaskLease {
        let entry = self.insert(kind, client_id, Some(parent));
        TaskLease::new(self.clone(), entry)
    }

    /// Publish the number of registered tasks to `metrics` on every insert and removal.
    pub fn set_metrics(&self, metrics: Arc<dyn MetricsBackend>) {
        let tasks = self.write();
        metrics.tasks_registered(tasks.len());
        *self
            .inner
            .metrics
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(metrics);
    }

    fn insert(
        &self,
        kind: JobKind,
        client_id: Option<&str>,
        parent: Option<&CancellationToken>,
    ) -> Arc<TaskEntry> {
        let id = match client_id {
            Some(id) if !id.trim().is_empty() => TaskId::from(id),
            _ => TaskId::from(uuid::Uuid::new_v4().to_string()),
        };

        let entry = Arc::new(TaskEntry {
            id: id.clone(),
            kind,
            seq: self.inner.seq.fetch_add(1, Ordering::Relaxed),
            started_at: SystemTime::now(),
            started: Instant::now(),
            running: AtomicBool::new(false),
            token: parent.map_or_else(CancellationToken::new, CancellationToken::child_token),
        });

        let mut tasks = self.write();
        let replaced = tasks.insert(id.clone(), Arc::clone(&entry));
        self.publish(tasks.len());
        drop(tasks);
        if replaced.is_some() {
            warn!(task_id = %id, kind = %kind, "task id already registered; replacing previous entry");
        } else {
            debug!(task_id = %id, kind = %kind, "task registered");
        }
        entry
    }

    /// Current cancellation state; `false` for unknown ids.
    pub fn is_cancelled(&self, id: &TaskId) -> bool {
        self.read()
            .get(id)
            .is_some_and(|entry| entry.token.is_cancelled())
    }

    /// Request cancellation. Returns whether a task with that id was found.
    ///
    /// Idempotent: cancelling twice returns `true` twice and changes nothing the second time.
    pub fn cancel(&self, id: &TaskId) -> bool {
        let entry = self.read().get(id).cloned();
        match entry {
            Some(entry) => {
                if !entry.token.is_cancelled() {
                    entry.token.cancel();
                    info!(task_id = %id, kind = %entry.kind, "task cancelled");
                }
                true
            }
            None => {
                debug!(task_id = %id, "cancel requested for unknown task");
                false
            }
        }
    }

    /// Remove the task if present.
    pub fn unregister(&self, id: &TaskId) {
        let mut tasks = self.write();
        if tasks.remove(id).is_some() {
            self.publish(tasks.len());
            drop(tasks);
            debug!(task_id = %id, "task unregistered");
        }
    }

    /// Remove the entry only if it is still the registration `seq`.
    pub(crate) fn unregister_seq(&self, id: &TaskId, seq: u64) {
        let mut tasks = self.write();
        if tasks.get(id).is_some_and(|entry| entry.seq == seq) {
            tasks.remove(id);
            self.publish(tasks.len());
            drop(tasks);
            debug!(task_id = %id, "task unregistered");
        } else {
            drop(tasks);
            debug!(task_id = %id, "task entry was replaced; leaving newer registration in place");
        }
    }

    /// Snapshot of a task.
    pub fn get(&self, id: &TaskId) -> Option<TaskInfo> {
        self.read().get(id).map(|entry| entry.snapshot())
    }

    /// Number of registered tasks.
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Snapshots of all registered tasks, optionally filtered by kind, oldest first.
    pub fn list(&self, kind: Option<JobKind>) -> Vec<TaskInfo> {
        let tasks = self.read();
        let mut entries: Vec<&Arc<TaskEntry>> = tasks
            .values()
            .filter(|entry| kind.is_none_or(|k| entry.kind == k))
            .collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.snapshot()).collect()
    }

    // Callers hold the map's write lock, so gauge updates land in mutation order.
    fn publish(&self, count: usize) {
        let metrics = self
            .inner
            .metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(metrics) = metrics.as_ref() {
            metrics.tasks_registered(count);
        }
    }

    // Every mutation is a single insert or remove, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TaskId, Arc<TaskEntry>>> {
        self.inner.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TaskId, Arc<TaskEntry>>> {
        self.inner.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }
}
