//! Logging configuration

use serde::Deserialize;

use super::error::ValidationError;

/// How the binary sets up its tracing subscriber
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directives; `RUST_LOG` overrides this at startup
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filter.trim().is_empty() {
            return Err(ValidationError::MissingRequired("logging.filter"));
        }
        if self.filter.split(',').any(|directive| directive.trim().is_empty()) {
            return Err(ValidationError::InvalidLogFilter(self.filter.clone()));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "info,chat_checkout=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info,chat_checkout=debug");
        assert!(!config.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_directive() {
        let config = LoggingConfig {
            filter: "info,,debug".to_string(),
            json: false,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidLogFilter(_))
        ));
    }

    #[test]
    fn test_rejects_blank_filter() {
        let config = LoggingConfig {
            filter: " ".to_string(),
            json: true,
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("logging.filter"))
        );
    }
}
