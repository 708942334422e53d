//! Scheduler adapters.
//!
//! - `TokioScheduler` - real timers on a Tokio runtime
//! - `VirtualScheduler` - virtual clock advanced explicitly (tests, replays)

mod tokio_scheduler;
mod virtual_scheduler;

pub use tokio_scheduler::TokioScheduler;
pub use virtual_scheduler::VirtualScheduler;
