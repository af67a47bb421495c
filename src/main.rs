//! Users API service.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup                     per request
//!   ───────                     ───────────
//!   config (file + env)         request id → trace span
//!      │                              │
//!      ▼                              ▼
//!   schema init ◀── retry       handler ──▶ open connection
//!   (create + seed)  (fixed)          │            │
//!      │                              │      statement(s)
//!      ▼                              │            │
//!   bind 0.0.0.0:5000                 ◀──── close connection
//!      │                              │
//!      ▼                              ▼
//!   serve until SIGTERM/Ctrl+C   JSON response
//! ```

use std::path::PathBuf;

use clap::Parser;
use users_api::config::load_config;
use users_api::lifecycle::{signals, startup, Shutdown};
use users_api::observability::logging;

#[derive(Parser)]
#[command(name = "users-api")]
#[command(about = "HTTP API over the users table", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.observability)?;

    tracing::info!("users-api v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    startup::run(config, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
