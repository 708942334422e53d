//! Scheduler port - Interface for deferred, fire-once callbacks.
//!
//! The order flow paces itself with short delays (typing, reveal, settlement).
//! Routing them through this port lets production use real timers while tests
//! drive a virtual clock.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A callback run once when its delay elapses.
pub type ScheduledTask = Box<dyn FnOnce() + Send + 'static>;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Handle to a scheduled task.
///
/// Exactly one of `cancel` or `try_fire` wins; the loser is a no-op. Clones
/// share the same state.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    /// Cancels the task. Returns false if it already fired or was cancelled.
    pub fn cancel(&self) -> bool {
        self.state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Claims the right to run the task. Schedulers call this just before
    /// running it and skip the task when it returns false.
    pub fn try_fire(&self) -> bool {
        self.state
            .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Port for running a task after a delay.
///
/// Implementations must ensure:
/// - A task runs at most once, and never after its handle was cancelled
/// - A task never runs inline inside `schedule` (callers may hold locks)
/// - A task never runs before its delay has elapsed
///
/// Ordering between tasks with equal deadlines is adapter-specific; callers
/// that need a fixed order must use distinct delays.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> CancelHandle;
}
