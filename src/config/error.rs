//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Item price must be a finite, non-negative number")]
    InvalidItemPrice,

    #[error("Discount rate must be between 0 and 1")]
    InvalidDiscountRate,

    #[error("Delay '{field}' exceeds maximum of {max_ms}ms")]
    DelayTooLong { field: &'static str, max_ms: u64 },

    #[error("Invalid log filter directive: {0}")]
    InvalidLogFilter(String),
}
