//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status
//! - `http_request_duration_seconds` (histogram): handler latency
//! - `store_init_attempts_total` (counter): schema initialization attempts by outcome
//!
//! # Design Decisions
//! - Recording is always on; without an installed exporter it is a no-op
//! - Route label is the matched template (`/users/{id}`), never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const STORE_INIT_ATTEMPTS: &str = "store_init_attempts_total";

/// Start the Prometheus scrape endpoint and register metric descriptions.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests handled");
    describe_histogram!(HTTP_REQUEST_DURATION, "HTTP handler latency in seconds");
    describe_counter!(STORE_INIT_ATTEMPTS, "Schema initialization attempts");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(HTTP_REQUEST_DURATION, &labels).record(start.elapsed().as_secs_f64());
}

/// Record one schema initialization attempt.
pub fn record_init_attempt(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(STORE_INIT_ATTEMPTS, "outcome" => outcome).increment(1);
}

/// Route-level middleware feeding [`record_request`].
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
