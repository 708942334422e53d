//! Line protocol for the terminal front end.
//!
//! - `/pay` - pay the invoice
//! - `/back` - return to the previous screen
//! - `/more` - order more after a successful payment
//! - `/quit` - end the session
//! - `/help` - list commands
//! - anything else - a chat message

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Free text typed into the chat box.
    Say(String),
    Pay,
    Back,
    OrderMore,
    Quit,
    Help,
    /// A slash command we do not know.
    Unknown(String),
}

impl TerminalCommand {
    /// Parses one input line.
    ///
    /// Blank lines parse as `Say("")` so the session can reject them itself.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return Self::Say(trimmed.to_string());
        };

        match command.to_ascii_lowercase().as_str() {
            "pay" => Self::Pay,
            "back" => Self::Back,
            "more" | "order-more" => Self::OrderMore,
            "quit" | "exit" | "q" => Self::Quit,
            "help" | "?" => Self::Help,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

/// Help text listing every command.
pub const HELP_TEXT: &str = "\
Commands:
  /pay    pay the invoice
  /back   go back one screen
  /more   order more after paying
  /quit   leave
Anything else is sent as a chat message.";
