//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Request spans and request IDs are attached in http::request.
//! ```

pub mod logging;
pub mod metrics;
