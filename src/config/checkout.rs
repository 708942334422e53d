//! Checkout configuration (catalog item, discount, payment option)

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::pricing::{CatalogItem, PaymentOption};

/// What is sold and how it is priced
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// Price of the recommended item
    #[serde(default = "default_item_price")]
    pub item_price: f64,

    /// Fraction taken off the price when paying with crypto
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,

    #[serde(default = "default_item_name")]
    pub item_name: String,

    #[serde(default = "default_item_description")]
    pub item_description: String,

    /// Token offered as the payment method
    #[serde(default = "default_payment_token")]
    pub payment_token: String,

    #[serde(default = "default_payment_description")]
    pub payment_description: String,
}

impl CheckoutConfig {
    pub fn catalog_item(&self) -> CatalogItem {
        CatalogItem::new(&self.item_name, &self.item_description, self.item_price)
    }

    pub fn payment_option(&self) -> PaymentOption {
        PaymentOption::new(&self.payment_token, &self.payment_description)
    }

    /// Validate checkout configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.item_price.is_finite() || self.item_price < 0.0 {
            return Err(ValidationError::InvalidItemPrice);
        }
        if !(0.0..=1.0).contains(&self.discount_rate) {
            return Err(ValidationError::InvalidDiscountRate);
        }
        if self.item_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("checkout.item_name"));
        }
        if self.payment_token.trim().is_empty() {
            return Err(ValidationError::MissingRequired("checkout.payment_token"));
        }
        Ok(())
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            item_price: default_item_price(),
            discount_rate: default_discount_rate(),
            item_name: default_item_name(),
            item_description: default_item_description(),
            payment_token: default_payment_token(),
            payment_description: default_payment_description(),
        }
    }
}

fn default_item_price() -> f64 {
    12.99
}

fn default_discount_rate() -> f64 {
    0.20
}

fn default_item_name() -> String {
    "Deluxe Cheeseburger".to_string()
}

fn default_item_description() -> String {
    "Classic beef patty with cheese".to_string()
}

fn default_payment_token() -> String {
    "USDC".to_string()
}

fn default_payment_description() -> String {
    "Fast & Low Fees".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.item_price, 12.99);
        assert_eq!(config.discount_rate, 0.20);
        assert_eq!(config.catalog_item().name, "Deluxe Cheeseburger");
        assert_eq!(config.payment_option().token, "USDC");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_price() {
        let config = CheckoutConfig {
            item_price: -1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidItemPrice));
    }

    #[test]
    fn test_rejects_nan_price() {
        let config = CheckoutConfig {
            item_price: f64::NAN,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidItemPrice));
    }

    #[test]
    fn test_rejects_discount_above_one() {
        let config = CheckoutConfig {
            discount_rate: 1.01,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDiscountRate));
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: CheckoutConfig = serde_json::from_str(r#"{"item_price": 9.5}"#).unwrap();
        assert_eq!(config.item_price, 9.5);
        assert_eq!(config.discount_rate, 0.20);
    }
}
