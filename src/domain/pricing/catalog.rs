//! Catalog item and payment option shown on the invoice screen.

use serde::{Deserialize, Serialize};

use super::quote::{quote, PricingQuote};
use crate::domain::foundation::ValidationError;

/// The single item the agent recommends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }

    /// Prices this item at the given discount rate.
    pub fn quote(&self, discount_rate: f64) -> Result<PricingQuote, ValidationError> {
        quote(self.price, discount_rate)
    }
}

/// A way to pay, e.g. a stablecoin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOption {
    pub token: String,
    pub description: String,
}

impl PaymentOption {
    pub fn new(token: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            description: description.into(),
        }
    }
}
