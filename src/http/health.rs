//! Store liveness endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Opens a connection, runs `SELECT 1`, closes it.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(HealthReport {
            status: "healthy",
            database: Some("connected"),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthReport {
                    status: "unhealthy",
                    database: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
