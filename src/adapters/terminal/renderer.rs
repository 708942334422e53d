//! Plain-text rendering of session snapshots.
//!
//! Rich-content messages carry no text of their own; their body comes from a
//! [`ContentTemplate`] registered for the message kind.

use std::fmt::Write as _;

use crate::domain::conversation::{Message, MessageKind, Origin, TemplateRegistry};
use crate::domain::foundation::ValidationError;
use crate::domain::order::{OrderStage, SessionSnapshot};
use crate::domain::pricing::{format_amount, CatalogItem, PaymentOption, PricingQuote};

/// Renders the body of a rich-content message.
pub trait ContentTemplate: Send + Sync {
    fn render(&self, message: &Message) -> String;
}

/// Product recommendation card shown after the greeting.
pub struct ProductCard {
    item: CatalogItem,
    pitch: String,
}

impl ProductCard {
    pub fn new(item: CatalogItem, pitch: impl Into<String>) -> Self {
        Self {
            item,
            pitch: pitch.into(),
        }
    }
}

impl ContentTemplate for ProductCard {
    fn render(&self, _message: &Message) -> String {
        format!(
            "[{}]\n{} Only {}!",
            self.item.name,
            self.pitch,
            format_amount(self.item.price)
        )
    }
}

/// Turns snapshots into the text of the current screen.
pub struct ScreenRenderer {
    templates: TemplateRegistry<Box<dyn ContentTemplate>>,
    item: CatalogItem,
    payment: PaymentOption,
    discount_rate: f64,
    quote: PricingQuote,
}

impl ScreenRenderer {
    /// # Errors
    ///
    /// Returns a `ValidationError` if the item cannot be priced at `discount_rate`.
    pub fn new(
        templates: TemplateRegistry<Box<dyn ContentTemplate>>,
        item: CatalogItem,
        payment: PaymentOption,
        discount_rate: f64,
    ) -> Result<Self, ValidationError> {
        let quote = item.quote(discount_rate)?;
        Ok(Self {
            templates,
            item,
            payment,
            discount_rate,
            quote,
        })
    }

    /// Renders the screen for the snapshot's current stage.
    pub fn render(&self, snapshot: &SessionSnapshot) -> String {
        match snapshot.stage {
            OrderStage::Chat => self.render_chat(snapshot),
            OrderStage::Invoice => self.render_invoice(snapshot),
            OrderStage::Success => self.render_success(),
        }
    }

    /// Renders one chat line, falling back to a placeholder for unregistered rich content.
    pub fn render_message(&self, message: &Message) -> String {
        let speaker = match message.origin() {
            Origin::User => "you",
            Origin::Agent => "agent",
        };
        let body = match message.kind() {
            MessageKind::Plain => message.text().to_string(),
            MessageKind::RichContent => match self.templates.resolve(message) {
                Some(template) => template.render(message),
                None => "[attachment]".to_string(),
            },
        };
        format!("{:>5}: {}", speaker, body.replace('\n', "\n       "))
    }

    fn render_chat(&self, snapshot: &SessionSnapshot) -> String {
        let mut out = String::from("=== Chat ===\n");
        for message in &snapshot.messages {
            let _ = writeln!(out, "{}", self.render_message(message));
        }
        if snapshot.awaiting_reply {
            out.push_str("  ...agent is typing\n");
        }
        out
    }

    fn render_invoice(&self, snapshot: &SessionSnapshot) -> String {
        let (subtotal, discount, total) = self.quote.formatted();
        let percent = (self.discount_rate * 100.0).round();

        let mut out = String::from("=== Invoice ===\n");
        let _ = writeln!(out, "{} - {}", self.item.name, self.item.description);
        let _ = writeln!(out, "Subtotal:        {}", subtotal);
        let _ = writeln!(out, "Discount ({}%):  -{}", percent, discount);
        let _ = writeln!(out, "Total:           {}", total);
        let _ = writeln!(
            out,
            "Pay with {} ({})",
            self.payment.token, self.payment.description
        );
        if snapshot.processing_payment {
            out.push_str("Processing payment...\n");
        } else {
            out.push_str("Type /pay to pay or /back to return to chat.\n");
        }
        out
    }

    fn render_success(&self) -> String {
        let mut out = String::from("=== Payment Successful! ===\n");
        let _ = writeln!(
            out,
            "Paid {} in {} for {}.",
            format_amount(self.quote.total),
            self.payment.token,
            self.item.name
        );
        out.push_str("Type /more to Order More.\n");
        out
    }
}
