//! Adapters - Implementations of port interfaces and front ends.
//!
//! - `scheduling` - Tokio-backed and virtual-time schedulers
//! - `terminal` - Line-oriented command parsing and screen rendering

pub mod scheduling;
pub mod terminal;

pub use scheduling::{TokioScheduler, VirtualScheduler};
pub use terminal::{ContentTemplate, ProductCard, ScreenRenderer, TerminalCommand};
