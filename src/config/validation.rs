//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the database connection string
//! - Validate value ranges (at least one initialization attempt)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("database.url: {0}")]
    InvalidDatabaseUrl(String),

    #[error("startup.max_attempts must be at least 1")]
    NoAttempts,
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if let Err(e) = check_database_url(&config.database.url) {
        errors.push(e);
    }

    if config.startup.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_database_url(raw: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ValidationError::InvalidDatabaseUrl(e.to_string()))?;

    match parsed.scheme() {
        "postgres" | "postgresql" => {}
        other => {
            return Err(ValidationError::InvalidDatabaseUrl(format!(
                "unsupported scheme '{}'",
                other
            )))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidDatabaseUrl("missing host".to_string()));
    }

    Ok(())
}
