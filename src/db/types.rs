//! Row types for the `users` table.

use serde::{Deserialize, Serialize};

/// A persisted user, as stored and as served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Values for a new row. `None` is bound as SQL NULL and left for the
/// column constraints to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// The rows inserted into an empty table on first initialization.
pub const SEED_USERS: [(&str, &str); 3] = [
    ("Alice Johnson", "alice@example.com"),
    ("Bob Smith", "bob@example.com"),
    ("Charlie Brown", "charlie@example.com"),
];
