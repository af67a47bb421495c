//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Initialize the schema and seed data, retrying with a fixed delay
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Initialization failure is not fatal: after the last attempt the
//!   listener starts anyway and requests see whatever the store has
//! - Bind failure is fatal

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ServiceConfig, StartupConfig};
use crate::db::{self, SeedOutcome, Store};
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::resilience::{retry_fixed, FixedDelay, RetryOutcome};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Create and seed the `users` table, retrying per `config`.
pub async fn initialize_store(
    store: &Store,
    config: &StartupConfig,
) -> RetryOutcome<SeedOutcome, sqlx::Error> {
    let policy = FixedDelay::new(
        config.max_attempts,
        Duration::from_secs(config.retry_delay_secs),
    );

    let outcome = retry_fixed("store initialization", policy, |_attempt| async move {
        let result = db::initialize(store).await;
        metrics::record_init_attempt(result.is_ok());
        result
    })
    .await;

    match &outcome {
        RetryOutcome::Succeeded { value, attempts } => {
            tracing::info!(attempts, outcome = ?value, "Database initialized successfully");
        }
        RetryOutcome::Exhausted { last_error, attempts } => {
            tracing::error!(
                attempts,
                error = %last_error.as_ref().map(ToString::to_string).unwrap_or_default(),
                "Giving up on database initialization; starting anyway"
            );
        }
    }

    outcome
}

/// Bring the service up and serve until `shutdown` fires.
pub async fn run(
    config: ServiceConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.redacted_url(),
        max_attempts = config.startup.max_attempts,
        retry_delay_secs = config.startup.retry_delay_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Store::from_config(&config.database);
    initialize_store(&store, &config.startup).await;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    HttpServer::new(config).run(listener, shutdown).await?;
    Ok(())
}
