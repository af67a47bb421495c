//! Statements against the `users` table.
//!
//! Every function takes a borrowed connection; opening and closing it is the
//! caller's job.

use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Connection, Executor, PgConnection, Row, TypeInfo, ValueRef};

use crate::db::types::{NewUser, User};

/// All users, in whatever order the store returns them.
pub async fn list(conn: &mut PgConnection) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, email FROM users")
        .fetch_all(conn)
        .await
}

/// A single user by id, or `None` if no row has it.
pub async fn find(conn: &mut PgConnection, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Insert a row and commit, returning what the store assigned.
pub async fn insert(conn: &mut PgConnection, new_user: &NewUser) -> Result<User, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
    )
    .bind(new_user.name.as_deref())
    .bind(new_user.email.as_deref())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(user)
}

/// Build the name-search statement by pasting `search` straight into the SQL
/// text. Quotes in `search` are not escaped.
pub fn unsafe_name_search_sql(search: &str) -> String {
    format!("SELECT * FROM users WHERE name = '{}'", search)
}

/// Run arbitrary SQL text and return every row as a positional JSON array.
pub async fn raw_rows(conn: &mut PgConnection, sql: &str) -> Result<Vec<Vec<Value>>, sqlx::Error> {
    // Through `Executor` directly: `RawSql::fetch_all` yields a future that is
    // not `Send` for every borrow lifetime, which axum handlers require.
    let rows = Executor::fetch_all(&mut *conn, sqlx::raw_sql(sql)).await?;
    Ok(rows.iter().map(row_to_values).collect())
}

fn row_to_values(row: &PgRow) -> Vec<Value> {
    (0..row.columns().len()).map(|i| column_value(row, i)).collect()
}

fn column_value(row: &PgRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };

    let decoded = match type_name.as_str() {
        "INT2" => row.try_get::<i16, _>(index).map(Value::from),
        "INT4" => row.try_get::<i32, _>(index).map(Value::from),
        "INT8" => row.try_get::<i64, _>(index).map(Value::from),
        "FLOAT4" => row.try_get::<f32, _>(index).map(|v| Value::from(f64::from(v))),
        "FLOAT8" => row.try_get::<f64, _>(index).map(Value::from),
        "BOOL" => row.try_get::<bool, _>(index).map(Value::from),
        // Simple-query rows arrive as text, so anything else reads as a string.
        _ => row.try_get_unchecked::<String, _>(index).map(Value::from),
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(column = %row.columns()[index].name(), error = %e, "Undecodable column");
        Value::Null
    })
}
