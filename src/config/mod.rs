//! Application configuration module
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `CHAT_CHECKOUT` prefix and nested values
//! use double underscores as separators. Every value has a default, so an empty
//! environment yields the stock burger demo.
//!
//! # Example
//!
//! ```no_run
//! use chat_checkout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Selling {} at {}", config.checkout.item_name, config.checkout.item_price);
//! ```

mod checkout;
mod error;
mod logging;
mod script;
mod timing;

pub use checkout::CheckoutConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use script::{ScriptConfig, SessionConfig};
pub use timing::TimingConfig;

use serde::Deserialize;

use crate::application::SessionOptions;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Catalog item, discount rate and payment option
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Delays between scripted steps
    #[serde(default)]
    pub timing: TimingConfig,

    /// Greeting, reply and product copy
    #[serde(default)]
    pub script: ScriptConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHAT_CHECKOUT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHAT_CHECKOUT__CHECKOUT__ITEM_PRICE=9.99` -> `checkout.item_price = 9.99`
    /// - `CHAT_CHECKOUT__TIMING__REPLY_DELAY_MS=0` -> `timing.reply_delay_ms = 0`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHAT_CHECKOUT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.checkout.validate()?;
        self.timing.validate()?;
        self.script.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the options a new order session starts with.
    pub fn session_options(&self) -> Result<SessionOptions, ValidationError> {
        Ok(SessionOptions {
            script: self.script.order_script()?,
            reset_policy: self.session.reset_policy,
            timing: self.timing.choreography(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::ResetPolicy;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("CHAT_CHECKOUT__CHECKOUT__ITEM_PRICE");
        env::remove_var("CHAT_CHECKOUT__CHECKOUT__DISCOUNT_RATE");
        env::remove_var("CHAT_CHECKOUT__TIMING__REPLY_DELAY_MS");
        env::remove_var("CHAT_CHECKOUT__SESSION__RESET_POLICY");
        env::remove_var("CHAT_CHECKOUT__LOGGING__JSON");
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.checkout.item_price, 12.99);
        assert_eq!(config.timing.reply_delay_ms, 300);
        assert_eq!(config.session.reset_policy, ResetPolicy::KeepConversation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CHAT_CHECKOUT__CHECKOUT__ITEM_PRICE", "9.5");
        env::set_var("CHAT_CHECKOUT__TIMING__REPLY_DELAY_MS", "0");
        env::set_var("CHAT_CHECKOUT__SESSION__RESET_POLICY", "clear_conversation");
        env::set_var("CHAT_CHECKOUT__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.checkout.item_price, 9.5);
        assert_eq!(config.timing.reply_delay_ms, 0);
        assert_eq!(config.session.reset_policy, ResetPolicy::ClearConversation);
        assert!(config.logging.json);
    }

    #[test]
    fn test_validate_reports_bad_discount() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CHAT_CHECKOUT__CHECKOUT__DISCOUNT_RATE", "1.5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidDiscountRate));
    }

    #[test]
    fn test_session_options_carry_timing_and_policy() {
        let mut config = AppConfig::default();
        config.timing.settlement_delay_ms = 50;
        config.session.reset_policy = ResetPolicy::ClearConversation;

        let options = config.session_options().unwrap();
        assert_eq!(options.timing.settlement_delay.as_millis(), 50);
        assert_eq!(options.reset_policy, ResetPolicy::ClearConversation);
    }
}
