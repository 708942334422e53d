//! Scripted copy and session policy

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::order::{OrderScript, ResetPolicy, DEFAULT_GREETING, DEFAULT_REPLY};

/// What the agent says
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_reply")]
    pub reply: String,

    /// Copy shown on the product card
    #[serde(default = "default_product_pitch")]
    pub product_pitch: String,
}

impl ScriptConfig {
    pub fn order_script(&self) -> Result<OrderScript, ValidationError> {
        OrderScript::new(&self.greeting, &self.reply).map_err(|_| self.missing_field())
    }

    fn missing_field(&self) -> ValidationError {
        if self.greeting.trim().is_empty() {
            ValidationError::MissingRequired("script.greeting")
        } else {
            ValidationError::MissingRequired("script.reply")
        }
    }

    /// Validate script configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.order_script().map(|_| ())
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            reply: default_reply(),
            product_pitch: default_product_pitch(),
        }
    }
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_reply() -> String {
    DEFAULT_REPLY.to_string()
}

fn default_product_pitch() -> String {
    "Our signature Deluxe Cheeseburger comes with a juicy beef patty, melted cheese, \
fresh lettuce, and tomatoes."
        .to_string()
}

/// Session lifecycle policy
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionConfig {
    /// Whether "order more" keeps the chat history
    #[serde(default)]
    pub reset_policy: ResetPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_defaults_build_order_script() {
        let script = ScriptConfig::default().order_script().unwrap();
        assert_eq!(script.reply(), DEFAULT_REPLY);
    }

    #[test]
    fn test_blank_greeting_is_reported() {
        let config = ScriptConfig {
            greeting: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("script.greeting"))
        );
    }

    #[test]
    fn test_blank_reply_is_reported() {
        let config = ScriptConfig {
            reply: String::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("script.reply"))
        );
    }

    #[test]
    fn test_session_config_deserialization() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"reset_policy": "clear_conversation"}"#).unwrap();
        assert_eq!(config.reset_policy, ResetPolicy::ClearConversation);
    }
}
