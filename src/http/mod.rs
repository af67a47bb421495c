//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, span)
//!     → index.rs / health.rs / users.rs / faults.rs (handlers)
//!     → response.rs (JSON envelopes, error mapping)
//!     → Send to client
//! ```

pub mod faults;
pub mod health;
pub mod index;
pub mod request;
pub mod response;
pub mod server;
pub mod users;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
