//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Scheduler` - Deferred fire-once callbacks with cancellation
//! - `Clock` - Current time for message timestamps

mod clock;
mod scheduler;

pub use clock::Clock;
pub use scheduler::{CancelHandle, ScheduledTask, Scheduler};
