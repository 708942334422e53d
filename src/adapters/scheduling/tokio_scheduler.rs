//! Tokio-backed scheduler using real timers.

use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};

use crate::domain::foundation::Timestamp;
use crate::ports::{CancelHandle, Clock, ScheduledTask, Scheduler};

/// Runs each task on a spawned Tokio task after `tokio::time::sleep`.
///
/// Cancelling a handle leaves the sleeping task in place; it wakes, loses the
/// `try_fire` race, and exits without running the callback.
///
/// Every timer is an independent task, so tasks with equal deadlines may run in
/// any order on a multi-thread runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Binds to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns `TryCurrentError` when called outside a Tokio runtime.
    pub fn current() -> Result<Self, TryCurrentError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> CancelHandle {
        let handle = CancelHandle::new();
        let claim = handle.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if claim.try_fire() {
                task();
            }
        });
        handle
    }
}

impl Clock for TokioScheduler {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
