//! Conversation domain module.
//!
//! The append-only chat log between the customer and the scripted agent,
//! plus the template registry used to render rich-content messages.

mod log;
mod message;
mod templates;

pub use log::ConversationLog;
pub use message::{Message, MessageKind, Origin};
pub use templates::TemplateRegistry;
