//! Canned agent copy and the reset policy.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

pub const DEFAULT_GREETING: &str = "👋 Hi! Your AI assistant here. Save 20% On Your Takeouts with Crypto! \
Process crypto payments for you via chatbot. 10x cash back than credit cards!";

pub const DEFAULT_REPLY: &str = "Great choice! I'll prepare your order right away.";

/// The scripted lines the agent speaks.
///
/// Both lines are non-blank however the script was built, including when it
/// was deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOrderScript")]
pub struct OrderScript {
    greeting: String,
    reply: String,
}

#[derive(Deserialize)]
struct RawOrderScript {
    greeting: String,
    reply: String,
}

impl TryFrom<RawOrderScript> for OrderScript {
    type Error = ValidationError;

    fn try_from(raw: RawOrderScript) -> Result<Self, Self::Error> {
        Self::new(raw.greeting, raw.reply)
    }
}

impl OrderScript {
    /// Creates a script.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if either line is blank
    pub fn new(greeting: impl Into<String>, reply: impl Into<String>) -> Result<Self, ValidationError> {
        let greeting = greeting.into();
        let reply = reply.into();
        if greeting.trim().is_empty() {
            return Err(ValidationError::empty_field("greeting"));
        }
        if reply.trim().is_empty() {
            return Err(ValidationError::empty_field("reply"));
        }
        Ok(Self { greeting, reply })
    }

    /// Opening line seeded into every fresh conversation.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Line sent after every accepted user message.
    pub fn reply(&self) -> &str {
        &self.reply
    }
}

impl Default for OrderScript {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            reply: DEFAULT_REPLY.to_string(),
        }
    }
}

/// What "order more" does to the conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// History is kept; a returning customer sees the earlier chat.
    #[default]
    KeepConversation,
    /// History is replaced by a freshly seeded conversation.
    ClearConversation,
}
