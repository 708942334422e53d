//! Append-only conversation log.

use serde::Serialize;

use super::message::{Message, Origin};
use crate::domain::foundation::MessageId;

/// Ordered, append-only sequence of messages.
///
/// There is no API to mutate or remove a message once appended; iteration
/// always yields insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log pre-populated with seed messages, in the given order.
    pub fn with_seed(seed: impl IntoIterator<Item = Message>) -> Self {
        let mut log = Self::new();
        for message in seed {
            log.append(message);
        }
        log
    }

    /// Appends a message and returns its id.
    ///
    /// Callers supply ids from a monotonic source. An id that does not
    /// follow the current tail is still appended, but logged.
    pub fn append(&mut self, message: Message) -> MessageId {
        let id = message.id();
        if let Some(last) = self.messages.last() {
            if id <= last.id() {
                tracing::warn!(
                    message_id = %id,
                    tail_id = %last.id(),
                    "Appended message id does not follow log tail"
                );
            }
        }
        self.messages.push(message);
        id
    }

    /// Iterates over the current contents in insertion order.
    ///
    /// The iterator is finite and can be cloned to restart from the beginning.
    pub fn all(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Looks up a message by id.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages
            .binary_search_by_key(&id, Message::id)
            .ok()
            .and_then(|idx| self.messages.get(idx))
            .or_else(|| self.messages.iter().find(|m| m.id() == id))
    }

    /// Counts messages from one origin.
    pub fn count_from(&self, origin: Origin) -> usize {
        self.messages.iter().filter(|m| m.origin() == origin).count()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}
