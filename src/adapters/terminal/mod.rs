//! Terminal front end - command parsing and screen rendering.

mod commands;
mod renderer;

pub use commands::{TerminalCommand, HELP_TEXT};
pub use renderer::{ContentTemplate, ProductCard, ScreenRenderer};
