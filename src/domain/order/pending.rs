//! Guard set for timed, fire-once operations.
//!
//! Each operation can be in flight at most once. Starting an operation that is
//! already pending is rejected; finishing always releases.

use serde::Serialize;
use std::fmt;

use super::rejection::Rejection;

/// A deferred operation the session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    /// User message sent, scripted reply not yet delivered.
    AwaitingReply,
    /// Reply delivered, move to the invoice not yet made.
    AutoAdvance,
    /// Payment initiated, settlement not yet complete.
    Settlement,
}

impl fmt::Display for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AwaitingReply => "awaiting_reply",
            Self::AutoAdvance => "auto_advance",
            Self::Settlement => "settlement",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingOperations {
    awaiting_reply: bool,
    auto_advance: bool,
    settlement: bool,
}

impl PendingOperations {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, op: PendingOperation) -> &mut bool {
        match op {
            PendingOperation::AwaitingReply => &mut self.awaiting_reply,
            PendingOperation::AutoAdvance => &mut self.auto_advance,
            PendingOperation::Settlement => &mut self.settlement,
        }
    }

    pub fn is_pending(&self, op: PendingOperation) -> bool {
        match op {
            PendingOperation::AwaitingReply => self.awaiting_reply,
            PendingOperation::AutoAdvance => self.auto_advance,
            PendingOperation::Settlement => self.settlement,
        }
    }

    /// Marks an operation in flight.
    ///
    /// # Errors
    ///
    /// - `OperationPending` if it is already in flight
    pub fn begin(&mut self, op: PendingOperation) -> Result<(), Rejection> {
        let slot = self.slot(op);
        if *slot {
            return Err(Rejection::OperationPending(op));
        }
        *slot = true;
        Ok(())
    }

    /// Releases an operation. Returns whether it was in flight.
    pub fn finish(&mut self, op: PendingOperation) -> bool {
        std::mem::replace(self.slot(op), false)
    }

    /// Releases every operation.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True while the scripted reply is outstanding (typing indicator).
    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// True while settlement is in flight (processing indicator).
    pub fn processing_payment(&self) -> bool {
        self.settlement
    }

    pub fn is_idle(&self) -> bool {
        !(self.awaiting_reply || self.auto_advance || self.settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_set_is_idle() {
        let ops = PendingOperations::new();
        assert!(ops.is_idle());
        assert!(!ops.awaiting_reply());
        assert!(!ops.processing_payment());
    }

    #[test]
    fn begin_marks_pending() {
        let mut ops = PendingOperations::new();
        ops.begin(PendingOperation::AwaitingReply).unwrap();
        assert!(ops.awaiting_reply());
        assert!(!ops.is_idle());
    }

    #[test]
    fn begin_twice_is_rejected() {
        let mut ops = PendingOperations::new();
        ops.begin(PendingOperation::Settlement).unwrap();
        assert_eq!(
            ops.begin(PendingOperation::Settlement),
            Err(Rejection::OperationPending(PendingOperation::Settlement))
        );
        assert!(ops.processing_payment());
    }

    #[test]
    fn finish_releases_and_reports() {
        let mut ops = PendingOperations::new();
        ops.begin(PendingOperation::AutoAdvance).unwrap();
        assert!(ops.finish(PendingOperation::AutoAdvance));
        assert!(!ops.finish(PendingOperation::AutoAdvance));
        assert!(ops.is_idle());
    }

    #[test]
    fn operations_are_independent() {
        let mut ops = PendingOperations::new();
        ops.begin(PendingOperation::AwaitingReply).unwrap();
        ops.begin(PendingOperation::Settlement).unwrap();
        ops.finish(PendingOperation::AwaitingReply);
        assert!(ops.processing_payment());
        assert!(!ops.awaiting_reply());
    }

    #[test]
    fn clear_releases_everything() {
        let mut ops = PendingOperations::new();
        ops.begin(PendingOperation::AwaitingReply).unwrap();
        ops.begin(PendingOperation::Settlement).unwrap();
        ops.clear();
        assert!(ops.is_idle());
    }
}
