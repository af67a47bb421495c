//! Users API library.
//!
//! A small HTTP service over a single PostgreSQL `users` table, plus a
//! one-shot connectivity probe. Two endpoints fail on purpose.

pub mod config;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod resilience;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
