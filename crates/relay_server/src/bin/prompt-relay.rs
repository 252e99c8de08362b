//! Prompt Relay - forwards a system/user prompt pair to Gemini.
//!
//! `serve` (the default) runs an HTTP host. `invoke` handles a single
//! function event read from a file or stdin and prints the response envelope,
//! which is how serverless function runtimes drive a handler.

use clap::{Parser, Subcommand};
use relay_core::{init_observability, init_tracing, shutdown_observability};
use relay_models::GeminiClient;
use relay_server::{PromptRelay, RelaySettings, create_router};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Command-line arguments for the relay.
#[derive(Parser, Debug)]
#[command(name = "prompt-relay")]
#[command(about = "Relay a system/user prompt pair to Gemini and return cleaned JSON text")]
#[command(version)]
struct Args {
    /// Path to a TOML settings file (defaults to ./relay.toml if present)
    #[arg(short, long, env = "RELAY_CONFIG_FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP host
    Serve {
        /// Address to bind, overriding settings
        #[arg(long)]
        bind: Option<String>,
    },
    /// Handle one function event and print the response envelope as JSON
    Invoke {
        /// Event file; reads stdin when omitted
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Validate settings and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let settings = RelaySettings::load(args.config.as_deref())?;
    init_tracing(*settings.log_format())?;
    init_observability("prompt-relay", 60)?;
    settings.validate()?;

    if settings.api_key().is_none() {
        warn!("GEMINI_API_KEY is not set - generation requests will return a configuration error");
    }

    let client = GeminiClient::new(&settings.client_config())?;
    let relay = Arc::new(PromptRelay::new(client, settings.relay_config()));

    match args.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Check => {
            info!(
                primary_model = %settings.primary_model(),
                fallback_model = %settings.fallback_model(),
                output_format = %settings.output_format(),
                "Settings are valid"
            );
        }
        Command::Invoke { event } => {
            let raw = match event {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let response = relay.handle_event(&raw).await;
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Serve { bind } => {
            let address = bind.unwrap_or_else(|| settings.bind_address().clone());
            let listener = tokio::net::TcpListener::bind(&address).await?;
            info!(address = %listener.local_addr()?, "Prompt relay listening");

            axum::serve(listener, create_router(relay))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            info!("Prompt relay stopped");
        }
    }

    if let Err(e) = shutdown_observability() {
        warn!(error = %e, "Metrics shutdown failed");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
