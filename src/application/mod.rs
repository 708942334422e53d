//! Application layer - orchestrates the order session over time.
//!
//! Owns the [`OrderStageController`], which turns presentation-layer actions and
//! scheduler callbacks into session steps and publishes the results.

mod controller;
mod events;
mod timing;

pub use controller::{OrderStageController, SessionOptions};
pub use events::SessionEvent;
pub use timing::ChoreographyTiming;
