//! Read model handed to the presentation layer.

use serde::Serialize;

use super::stage::OrderStage;
use crate::domain::conversation::Message;
use crate::domain::foundation::SessionId;

/// Everything the presentation layer needs to re-render a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub stage: OrderStage,
    pub messages: Vec<Message>,
    pub awaiting_reply: bool,
    pub processing_payment: bool,
    pub closed: bool,
}

impl SessionSnapshot {
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
