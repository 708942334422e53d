//! Clock port - source of "now" for message timestamps.

use crate::domain::foundation::Timestamp;

/// Port for reading the current time.
///
/// Production reads the wall clock; tests read the virtual clock that also
/// drives the scheduler, so timestamps and timer firings agree.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
