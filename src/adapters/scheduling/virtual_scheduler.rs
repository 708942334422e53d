//! Virtual-time scheduler.
//!
//! Time only moves when the owner calls [`VirtualScheduler::advance`] or
//! [`VirtualScheduler::run_until_idle`], which makes timed flows deterministic
//! in tests and replays.
//!
//! Tasks run on the caller's thread, outside the internal lock, so a task may
//! schedule further tasks. Tasks with equal deadlines run in the order they
//! were scheduled.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::ports::{CancelHandle, Clock, ScheduledTask, Scheduler};

/// Upper bound on tasks run by one `run_until_idle` call.
const MAX_IDLE_STEPS: usize = 10_000;

struct Entry {
    handle: CancelHandle,
    task: ScheduledTask,
}

#[derive(Default)]
struct VirtualState {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Entry>,
}

/// Scheduler and clock driven by explicit time advancement.
pub struct VirtualScheduler {
    epoch: Timestamp,
    state: Mutex<VirtualState>,
}

impl VirtualScheduler {
    /// Creates a scheduler whose clock reads the Unix epoch at time zero.
    pub fn new() -> Self {
        Self::with_epoch(Timestamp::from_unix_millis(0))
    }

    /// Creates a scheduler whose clock reads `epoch` at time zero.
    pub fn with_epoch(epoch: Timestamp) -> Self {
        Self {
            epoch,
            state: Mutex::new(VirtualState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VirtualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks that are scheduled and not cancelled.
    pub fn pending(&self) -> usize {
        self.lock()
            .queue
            .values()
            .filter(|e| e.handle.is_pending())
            .count()
    }

    /// Deadline of the earliest live task, relative to creation.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.lock()
            .queue
            .iter()
            .find(|(_, e)| e.handle.is_pending())
            .map(|((deadline, _), _)| *deadline)
    }

    /// Moves time forward by `by`, running every task that falls due, in
    /// deadline order. Tasks scheduled while advancing run too if they fall
    /// due within the window. Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut ran = 0;

        loop {
            let due = {
                let mut state = self.lock();
                let key = match state.queue.keys().next() {
                    Some(key) if key.0 <= target => *key,
                    _ => break,
                };
                state.now = key.0;
                state.queue.remove(&key)
            };

            if let Some(entry) = due {
                if entry.handle.try_fire() {
                    (entry.task)();
                    ran += 1;
                }
            }
        }

        let mut state = self.lock();
        if state.now < target {
            state.now = target;
        }
        ran
    }

    /// Advances until no live task remains. Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(deadline) = self.next_deadline() {
            let step = deadline.saturating_sub(self.elapsed());
            ran += self.advance(step);
            if ran >= MAX_IDLE_STEPS {
                tracing::warn!(ran, "Virtual scheduler did not go idle; stopping");
                break;
            }
        }
        self.lock().queue.retain(|_, e| e.handle.is_pending());
        ran
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> CancelHandle {
        let handle = CancelHandle::new();
        let mut state = self.lock();
        let key = (state.now + delay, state.next_seq);
        state.next_seq += 1;
        state.queue.insert(
            key,
            Entry {
                handle: handle.clone(),
                task,
            },
        );
        handle
    }
}

impl Clock for VirtualScheduler {
    fn now(&self) -> Timestamp {
        self.epoch.plus(self.elapsed())
    }
}
