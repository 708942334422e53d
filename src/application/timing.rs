//! Pacing of the scripted flow.

use std::time::Duration;

/// Delays between the steps of the order flow.
///
/// ```text
/// submit ──reply_delay──▶ reply ──reveal_delay──▶ reveal ──advance_delay──▶ invoice
/// pay ──settlement_delay──▶ success
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoreographyTiming {
    /// Agent "typing" before the scripted reply appears.
    pub reply_delay: Duration,
    /// Lets a new message start its entrance before the view scrolls.
    pub reveal_delay: Duration,
    /// Pause after the reveal before the invoice slides in.
    pub advance_delay: Duration,
    /// Simulated payment processing.
    pub settlement_delay: Duration,
}

impl ChoreographyTiming {
    pub const fn from_millis(reply: u64, reveal: u64, advance: u64, settlement: u64) -> Self {
        Self {
            reply_delay: Duration::from_millis(reply),
            reveal_delay: Duration::from_millis(reveal),
            advance_delay: Duration::from_millis(advance),
            settlement_delay: Duration::from_millis(settlement),
        }
    }

    /// Time from an accepted submit until the invoice is shown.
    pub fn submit_to_invoice(&self) -> Duration {
        self.reply_delay + self.reveal_delay + self.advance_delay
    }
}

impl Default for ChoreographyTiming {
    fn default() -> Self {
        Self::from_millis(300, 100, 200, 500)
    }
}
