//! Registry of rich-content templates keyed by message kind.
//!
//! The domain only stores and hands back templates; what a template contains
//! and how it renders is owned by the presentation layer.

use std::collections::HashMap;

use super::message::{Message, MessageKind};

/// Maps message kinds to presentation templates of type `T`.
#[derive(Debug, Clone)]
pub struct TemplateRegistry<T> {
    templates: HashMap<MessageKind, T>,
}

impl<T> TemplateRegistry<T> {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Registers a template, replacing any previous one for the same kind.
    pub fn register(&mut self, kind: MessageKind, template: T) -> Option<T> {
        self.templates.insert(kind, template)
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, kind: MessageKind, template: T) -> Self {
        self.register(kind, template);
        self
    }

    pub fn get(&self, kind: MessageKind) -> Option<&T> {
        self.templates.get(&kind)
    }

    /// Returns the template for a message, if its kind has one.
    pub fn resolve(&self, message: &Message) -> Option<&T> {
        self.get(message.kind())
    }

    pub fn contains(&self, kind: MessageKind) -> bool {
        self.templates.contains_key(&kind)
    }
}

impl<T> Default for TemplateRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Origin;
    use crate::domain::foundation::{MessageId, Timestamp};

    #[test]
    fn resolves_template_for_rich_content() {
        let registry = TemplateRegistry::new().with(MessageKind::RichContent, "card");
        let msg = Message::rich_content(
            MessageId::from_raw(1),
            Origin::Agent,
            Timestamp::from_unix_millis(0),
        );
        assert_eq!(registry.resolve(&msg), Some(&"card"));
    }

    #[test]
    fn plain_messages_have_no_template_by_default() {
        let registry = TemplateRegistry::new().with(MessageKind::RichContent, "card");
        let msg = Message::agent(MessageId::from_raw(1), "hi", Timestamp::from_unix_millis(0))
            .unwrap();
        assert!(registry.resolve(&msg).is_none());
        assert!(!registry.contains(MessageKind::Plain));
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = TemplateRegistry::new();
        assert_eq!(registry.register(MessageKind::RichContent, 1), None);
        assert_eq!(registry.register(MessageKind::RichContent, 2), Some(1));
        assert_eq!(registry.get(MessageKind::RichContent), Some(&2));
    }
}
