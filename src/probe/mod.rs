//! One-shot store connectivity probe.
//!
//! # Responsibilities
//! - Open exactly one connection with fixed parameters and a connect timeout
//! - Read the server version on success
//! - Sort failures into "could not connect" and "something else"
//!
//! # Design Decisions
//! - No retry: the probe reports the first outcome
//! - The built-in target is deliberately unreachable

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "nonexistent-database-host";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DATABASE: &str = "test_db";
pub const DEFAULT_USER: &str = "test_user";
pub const DEFAULT_PASSWORD: &str = "test_password";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(10);

/// Where and how to connect.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub connect_timeout: Duration,
}

impl Default for ProbeTarget {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ProbeTarget {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connection to {host}:{port} timed out after {} seconds", .timeout.as_secs())]
    Timeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    #[error("{0}")]
    Connect(sqlx::Error),

    #[error("{0}")]
    Unexpected(sqlx::Error),
}

impl ProbeError {
    /// Sort a driver error into the two reported categories.
    pub fn classify(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Database(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => ProbeError::Connect(err),
            other => ProbeError::Unexpected(other),
        }
    }

    /// First line printed for this failure.
    pub fn headline(&self) -> &'static str {
        match self {
            ProbeError::Timeout { .. } | ProbeError::Connect(_) => {
                "ERROR: Failed to connect to database!"
            }
            ProbeError::Unexpected(_) => "ERROR: Unexpected error occurred!",
        }
    }
}

/// Connect once and return the server's version string.
pub async fn probe(target: &ProbeTarget) -> Result<String, ProbeError> {
    tracing::debug!(host = %target.host, port = target.port, "Probing store");

    let options = target.connect_options();
    let connect = PgConnection::connect_with(&options);
    let mut conn = match tokio::time::timeout(target.connect_timeout, connect).await {
        Ok(result) => result.map_err(ProbeError::classify)?,
        Err(_) => {
            return Err(ProbeError::Timeout {
                host: target.host.clone(),
                port: target.port,
                timeout: target.connect_timeout,
            })
        }
    };

    let version = sqlx::query_scalar::<_, String>("SELECT version();")
        .fetch_one(&mut conn)
        .await;
    let _ = conn.close().await;

    version.map_err(ProbeError::classify)
}
