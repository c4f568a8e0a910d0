//! # Admission control
//!
//! A bounded counting gate in front of every job submission.
//! Callers that find no free slot are rejected immediately: the gate sheds load,
//! it never queues or parks a caller.
//!
//! ## Invariants
//! - At most `capacity` permits are outstanding at any time.
//! - Each permit returns its slot exactly once, when released or dropped.
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::{trace, warn};

use crate::{config::RunnerConfig, error::CoreError};

/// Non-blocking bounded-concurrency gate.
///
/// Cheap to clone; clones share the same slots.
#[derive(Clone, Debug)]
pub struct AdmissionController {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionController {
    /// Create a gate with `capacity` slots.
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        RunnerConfig::default()
            .with_max_concurrent(capacity)
            .validate()?;
        Ok(Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Take a slot if one is free.
    ///
    /// Returns `None` right away when the gate is full.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        match Arc::clone(&self.slots).try_acquire_owned() {
            Ok(permit) => {
                trace!(available = self.available(), "admission slot acquired");
                Some(AdmissionPermit { _permit: permit })
            }
            Err(TryAcquireError::NoPermits) => {
                warn!(
                    capacity = self.capacity,
                    "request rejected: maximum concurrent requests limit reached"
                );
                None
            }
            // The semaphore is owned here and never closed.
            Err(TryAcquireError::Closed) => None,
        }
    }

    /// Configured number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now.
    #[inline]
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Slots currently held.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}

/// One admitted caller.
///
/// The slot goes back to the gate when the permit is released or dropped.
#[derive(Debug)]
#[must_use = "dropping the permit releases the admission slot immediately"]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionPermit {
    /// Return the slot now.
    pub fn release(self) {
        drop(self);
    }
}
