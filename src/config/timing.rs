//! Timing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::ChoreographyTiming;

/// No single step may be slower than this.
const MAX_DELAY_MS: u64 = 60_000;

/// Delays of the scripted flow, in milliseconds
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_reply_delay")]
    pub reply_delay_ms: u64,

    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: u64,

    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,

    #[serde(default = "default_settlement_delay")]
    pub settlement_delay_ms: u64,
}

impl TimingConfig {
    pub fn choreography(&self) -> ChoreographyTiming {
        ChoreographyTiming::from_millis(
            self.reply_delay_ms,
            self.reveal_delay_ms,
            self.advance_delay_ms,
            self.settlement_delay_ms,
        )
    }

    /// Validate timing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("reply_delay_ms", self.reply_delay_ms),
            ("reveal_delay_ms", self.reveal_delay_ms),
            ("advance_delay_ms", self.advance_delay_ms),
            ("settlement_delay_ms", self.settlement_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(ValidationError::DelayTooLong {
                    field,
                    max_ms: MAX_DELAY_MS,
                });
            }
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay(),
            reveal_delay_ms: default_reveal_delay(),
            advance_delay_ms: default_advance_delay(),
            settlement_delay_ms: default_settlement_delay(),
        }
    }
}

fn default_reply_delay() -> u64 {
    300
}

fn default_reveal_delay() -> u64 {
    100
}

fn default_advance_delay() -> u64 {
    200
}

fn default_settlement_delay() -> u64 {
    500
}
