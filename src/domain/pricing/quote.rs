//! Derived pricing for the single catalog item.

use serde::Serialize;

use crate::domain::foundation::ValidationError;

/// Subtotal, discount and total derived from an item price and a discount rate.
///
/// Values are unrounded; formatting to cents happens only at display time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingQuote {
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

/// Computes a quote.
///
/// Defined for finite `item_price >= 0` and `0 <= discount_rate <= 1`.
///
/// # Errors
///
/// - `InvalidFormat` if either input is NaN or infinite
/// - `OutOfRange` if either input is outside its domain
pub fn quote(item_price: f64, discount_rate: f64) -> Result<PricingQuote, ValidationError> {
    if !item_price.is_finite() {
        return Err(ValidationError::invalid_format("item_price", "must be finite"));
    }
    if !discount_rate.is_finite() {
        return Err(ValidationError::invalid_format(
            "discount_rate",
            "must be finite",
        ));
    }
    if item_price < 0.0 {
        return Err(ValidationError::out_of_range(
            "item_price",
            0.0,
            f64::MAX,
            item_price,
        ));
    }
    if !(0.0..=1.0).contains(&discount_rate) {
        return Err(ValidationError::out_of_range(
            "discount_rate",
            0.0,
            1.0,
            discount_rate,
        ));
    }

    let subtotal = item_price;
    let discount = item_price * discount_rate;
    Ok(PricingQuote {
        subtotal,
        discount,
        total: subtotal - discount,
    })
}

/// Formats an amount as dollars with two decimals, e.g. `$10.39`.
pub fn format_amount(amount: f64) -> String {
    format!("${:.2}", amount)
}

impl PricingQuote {
    /// Display strings for subtotal, discount and total.
    pub fn formatted(&self) -> (String, String, String) {
        (
            format_amount(self.subtotal),
            format_amount(self.discount),
            format_amount(self.total),
        )
    }
}
