//! Pricing - pure derived values for the invoice screen.

mod catalog;
mod quote;

pub use catalog::{CatalogItem, PaymentOption};
pub use quote::{format_amount, quote, PricingQuote};
