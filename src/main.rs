//! Terminal demo of the chat-to-checkout flow.
//!
//! Reads commands from stdin, renders screens to stdout and logs to stderr.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chat_checkout::adapters::terminal::{
    ContentTemplate, ProductCard, ScreenRenderer, TerminalCommand, HELP_TEXT,
};
use chat_checkout::adapters::TokioScheduler;
use chat_checkout::application::OrderStageController;
use chat_checkout::config::{AppConfig, LoggingConfig};
use chat_checkout::domain::conversation::{MessageKind, TemplateRegistry};
use chat_checkout::domain::order::ActionOutcome;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    init_tracing(&config.logging);

    let renderer = build_renderer(&config)?;
    let scheduler = Arc::new(TokioScheduler::current()?);
    let controller = OrderStageController::start(
        config.session_options()?,
        scheduler.clone(),
        scheduler,
    )
    .context("Failed to start order session")?;

    let mut snapshots = controller.subscribe();
    let mut events = controller.events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", renderer.render(&controller.snapshot()));
    println!("{}", HELP_TEXT);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !dispatch(&controller, TerminalCommand::parse(&line)) {
                    break;
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                println!("{}", renderer.render(&snapshot));
            }
            event = events.recv() => match event {
                Ok(event) => tracing::debug!(?event, "Session event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    controller.close();
    tracing::info!("Session ended");
    Ok(())
}

/// Applies one command. Returns false when the user wants to leave.
fn dispatch(controller: &OrderStageController, command: TerminalCommand) -> bool {
    let outcome = match command {
        TerminalCommand::Say(text) => controller.submit_message(&text),
        TerminalCommand::Pay => controller.initiate_payment(),
        TerminalCommand::Back => controller.go_back(),
        TerminalCommand::OrderMore => controller.reset_to_chat(),
        TerminalCommand::Quit => return false,
        TerminalCommand::Help => {
            println!("{}", HELP_TEXT);
            return true;
        }
        TerminalCommand::Unknown(raw) => {
            println!("Unknown command {}. Type /help.", raw);
            return true;
        }
    };

    if let ActionOutcome::Ignored(reason) = outcome {
        println!("({})", reason);
    }
    true
}

fn build_renderer(config: &AppConfig) -> anyhow::Result<ScreenRenderer> {
    let item = config.checkout.catalog_item();
    let card: Box<dyn ContentTemplate> =
        Box::new(ProductCard::new(item.clone(), &config.script.product_pitch));
    let templates = TemplateRegistry::new().with(MessageKind::RichContent, card);

    ScreenRenderer::new(
        templates,
        item,
        config.checkout.payment_option(),
        config.checkout.discount_rate,
    )
    .context("Failed to price catalog item")
}

/// Logs go to stderr so they never interleave with rendered screens.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
