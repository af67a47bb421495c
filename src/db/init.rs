//! Schema creation and seed data.

use sqlx::{Connection, PgConnection};

use crate::db::connection::Store;
use crate::db::types::SEED_USERS;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL
    )
"#;

/// What a successful initialization did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table was empty and the sample rows were inserted.
    Seeded(usize),
    /// The table already held this many rows; nothing was inserted.
    AlreadyPopulated(i64),
}

/// Ensure the `users` table exists and seed it if it is empty.
///
/// Runs in one transaction on a fresh connection, which is closed on every
/// path. Safe to call repeatedly.
pub async fn initialize(store: &Store) -> Result<SeedOutcome, sqlx::Error> {
    let mut conn = store.connect().await?;
    let result = create_and_seed(&mut conn).await;
    store.release(conn).await;
    result
}

async fn create_and_seed(conn: &mut PgConnection) -> Result<SeedOutcome, sqlx::Error> {
    let mut tx = conn.begin().await?;

    sqlx::query(CREATE_USERS_TABLE).execute(&mut *tx).await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *tx)
        .await?;

    let outcome = if count == 0 {
        for (name, email) in SEED_USERS {
            sqlx::query("INSERT INTO users (name, email) VALUES ($1, $2)")
                .bind(name)
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }
        SeedOutcome::Seeded(SEED_USERS.len())
    } else {
        SeedOutcome::AlreadyPopulated(count)
    };

    tx.commit().await?;
    Ok(outcome)
}
