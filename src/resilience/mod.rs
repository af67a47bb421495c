//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup schema initialization:
//!     → retries.rs (fixed-delay retry loop, bounded attempts)
//!     → outcome handed back to lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Retries exist only at startup; request handlers never retry
//! - Exhaustion is reported, not raised; the caller decides

pub mod retries;

pub use retries::{retry_fixed, FixedDelay, RetryOutcome};
