//! Message entity for the order conversation.
//!
//! Messages are immutable records of user/agent exchanges. Plain messages carry
//! text; rich-content messages carry none and are rendered from a registered
//! template instead.

use crate::domain::foundation::{DomainError, MessageId, Timestamp};
use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The customer typing into the chat.
    User,
    /// The scripted ordering agent.
    Agent,
}

/// How a message is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Literal text.
    Plain,
    /// Rendered via a content template (e.g. the product card).
    RichContent,
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `id` is unique and ordered by creation
/// - plain messages have non-blank `text`
/// - rich-content messages have empty `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    text: String,
    origin: Origin,
    kind: MessageKind,
    created_at: Timestamp,
}

impl Message {
    /// Creates a plain text message.
    ///
    /// The text is stored trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the text is blank after trimming
    pub fn plain(
        id: MessageId,
        origin: Origin,
        text: &str,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation(
                "text",
                "Message text cannot be empty",
            ));
        }

        Ok(Self {
            id,
            text: text.to_string(),
            origin,
            kind: MessageKind::Plain,
            created_at,
        })
    }

    /// Creates a plain message from the user.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the text is blank after trimming
    pub fn user(id: MessageId, text: &str, created_at: Timestamp) -> Result<Self, DomainError> {
        Self::plain(id, Origin::User, text, created_at)
    }

    /// Creates a plain message from the agent.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the text is blank after trimming
    pub fn agent(id: MessageId, text: &str, created_at: Timestamp) -> Result<Self, DomainError> {
        Self::plain(id, Origin::Agent, text, created_at)
    }

    /// Creates a rich-content message. It has no text of its own.
    pub fn rich_content(id: MessageId, origin: Origin, created_at: Timestamp) -> Self {
        Self {
            id,
            text: String::new(),
            origin,
            kind: MessageKind::RichContent,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    /// Returns true if this message is from the agent.
    pub fn is_agent(&self) -> bool {
        self.origin == Origin::Agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> Timestamp {
        Timestamp::from_unix_millis(0)
    }

    mod construction {
        use super::*;

        #[test]
        fn user_message_is_trimmed() {
            let msg = Message::user(MessageId::from_raw(1), "  I'll take it \n", at()).unwrap();
            assert_eq!(msg.text(), "I'll take it");
            assert!(msg.is_user());
            assert_eq!(msg.kind(), MessageKind::Plain);
        }

        #[test]
        fn agent_message_keeps_origin() {
            let msg = Message::agent(MessageId::from_raw(2), "Hi!", at()).unwrap();
            assert!(msg.is_agent());
            assert!(!msg.is_user());
        }

        #[test]
        fn rejects_empty_text() {
            assert!(Message::user(MessageId::from_raw(1), "", at()).is_err());
        }

        #[test]
        fn rejects_whitespace_only_text() {
            assert!(Message::user(MessageId::from_raw(1), " \t ", at()).is_err());
        }

        #[test]
        fn rich_content_has_no_text() {
            let msg = Message::rich_content(MessageId::from_raw(3), Origin::Agent, at());
            assert_eq!(msg.text(), "");
            assert_eq!(msg.kind(), MessageKind::RichContent);
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn origin_serializes_to_snake_case() {
            let json = serde_json::to_string(&Origin::Agent).unwrap();
            assert_eq!(json, "\"agent\"");
        }

        #[test]
        fn kind_serializes_to_snake_case() {
            let json = serde_json::to_string(&MessageKind::RichContent).unwrap();
            assert_eq!(json, "\"rich_content\"");
        }
    }
}
