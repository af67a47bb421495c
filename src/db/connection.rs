//! Per-request store connections.
//!
//! # Responsibilities
//! - Hold the connection string handed over by configuration
//! - Open a fresh connection for every caller
//! - Close connections explicitly so the server sees a clean terminate
//!
//! # Design Decisions
//! - No pool: every request pays the connect cost and gets its own session
//! - The connection string is owned here and never read from the environment

use sqlx::{Connection, PgConnection};

use crate::config::DatabaseConfig;

/// Opens connections to the relational store.
#[derive(Debug, Clone)]
pub struct Store {
    url: String,
}

impl Store {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.url.clone())
    }

    /// Open a new connection.
    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        PgConnection::connect(&self.url).await
    }

    /// Close a connection, logging instead of failing if the server has
    /// already gone away.
    pub async fn release(&self, conn: PgConnection) {
        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "Failed to close store connection cleanly");
        }
    }

    /// Open a connection, run the liveness query and close it again.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("SELECT 1").execute(&mut conn).await;
        self.release(conn).await;
        result.map(|_| ())
    }
}
