//! chatline - line-at-a-time chat-completion relay.
//!
//! Reads prompts from stdin one line at a time, relays each to the
//! configured chat-completion endpoint over TLS, and prints the
//! assistant's reply. One exchange at a time, one connection per
//! exchange.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatline::api::ChatClient;
use chatline::config::ApiConfig;
use chatline::transport::TlsTransport;

const SEPARATOR: &str = "------------------------------------------";

fn main() -> Result<()> {
    // Logs go to stderr so replies on stdout stay clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "chatline=info".to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let config = ApiConfig::load().context("Failed to load configuration")?;
    info!(
        "Relaying to https://{}:{}{} (model {})",
        config.host, config.port, config.endpoint, config.model
    );

    let transport = TlsTransport::new(&config).context("Failed to initialize TLS")?;
    let client = ChatClient::new(config, transport);

    println!("Ready! Type your prompt and press Enter...");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }

        println!("Sending...");
        match client.ask(prompt) {
            Ok(reply) => {
                println!("{reply}");
                println!("\n{SEPARATOR}\n");
            }
            // Failures are local to one exchange; keep reading prompts.
            Err(err) => error!("Exchange failed: {err}"),
        }
    }

    Ok(())
}
