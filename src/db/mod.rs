//! Relational store access.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     init.rs (create table, seed if empty) on its own connection
//!
//! Per request:
//!     connection.rs opens a connection
//!     → users.rs runs the statement(s)
//!     → connection.rs closes it
//! ```
//!
//! # Design Decisions
//! - PostgreSQL via sqlx, one connection per unit of work
//! - Statement functions borrow a connection; they never open or close one
//! - Store errors are passed up untouched so handlers can echo their text

pub mod connection;
pub mod init;
pub mod types;
pub mod users;

pub use connection::Store;
pub use init::{initialize, SeedOutcome};
pub use types::{NewUser, User, SEED_USERS};
