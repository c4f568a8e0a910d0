use std::sync::{Arc, atomic::Ordering};

use tokio_util::sync::CancellationToken;

use crypta_model::{JobKind, TaskId};

use super::{TaskEntry, TaskRegistry};

/// Scoped registration of one task.
///
/// Dropping the lease unregisters the task, on every exit path including unwinding.
/// If the id was re-registered meanwhile, the newer entry is left alone.
pub struct TaskLease {
    registry: TaskRegistry,
    entry: Arc<TaskEntry>,
}

impl TaskLease {
    pub(super) fn new(registry: TaskRegistry, entry: Arc<TaskEntry>) -> Self {
        Self { registry, entry }
    }

    #[inline]
    pub fn id(&self) -> &TaskId {
        &self.entry.id
    }

    #[inline]
    pub fn kind(&self) -> JobKind {
        self.entry.kind
    }

    /// The token that `cancel(id)` sets for this registration.
    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.entry.token
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.entry.token.is_cancelled()
    }

    /// Record that the engine has started.
    pub fn mark_running(&self) {
        self.entry.running.store(true, Ordering::Release);
    }
}

impl Drop for TaskLease {
    fn drop(&mut self) {
        self.registry.unregister_seq(&self.entry.id, self.entry.seq);
    }
}
