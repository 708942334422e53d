//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier for an order session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a message within a conversation log.
///
/// Ordered by creation: a larger id was issued later, even when two
/// messages were created within the same clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Creates a MessageId from a raw sequence value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Monotonic source of [`MessageId`]s.
///
/// Ids start at 1 and are never reused for the lifetime of the sequence.
#[derive(Debug)]
pub struct MessageIdSequence {
    next: AtomicU64,
}

impl MessageIdSequence {
    /// Creates a sequence whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Issues the next id.
    pub fn next_id(&self) -> MessageId {
        MessageId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) will issue.
    pub fn peek(&self) -> MessageId {
        MessageId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for MessageIdSequence {
    fn default() -> Self {
        Self::new()
    }
}
