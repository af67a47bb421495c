//! Response envelopes and error mapping.
//!
//! # Responsibilities
//! - Map handler errors to HTTP status codes
//! - Render every caught error as `{"error": "<text>"}`
//! - Stand in for the framework error page when a handler panics
//!
//! # Design Decisions
//! - Store errors are not classified: constraint violations and outages are
//!   all 500 with the driver's message
//! - "User not found" is the only 404 with a body

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors a handler reports to the client instead of propagating.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Anything the store or driver raised.
    #[error("{0}")]
    Store(#[from] sqlx::Error),

    /// The request body could not be turned into statement parameters.
    #[error("{0}")]
    Body(String),

    #[error("User not found")]
    UserNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Body(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Response used by the panic-catching layer for faults no handler caught.
pub fn unhandled_fault(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(fault = %detail, "Unhandled fault in request handler");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
