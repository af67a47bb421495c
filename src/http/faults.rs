//! Fault-injection endpoints.
//!
//! Both handlers fail by panicking. Nothing here catches the panic: it
//! reaches whatever the server stack does with handler panics (a bare 500
//! when `server.catch_panics` is on, a dropped connection otherwise). Their
//! store connection is not closed on that path.

use std::num::IntErrorKind;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::users;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CrashParams {
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Calculation {
    pub result: f64,
    pub message: &'static str,
}

/// `GET /crash?value=N` → `100 / N`. A missing value counts as `"0"`.
pub async fn crash(Query(params): Query<CrashParams>) -> Json<Calculation> {
    let raw = params.value.unwrap_or_else(|| "0".to_string());

    Json(Calculation {
        result: hundred_over(&raw),
        message: "Calculation successful",
    })
}

/// `100 / raw` for any integer literal, however large. Panics on zero or on
/// text that is not an integer.
pub fn hundred_over(raw: &str) -> f64 {
    let literal = raw.trim();
    match literal.parse::<i64>() {
        Ok(n) => divide_hundred(n),
        // Syntax already checked by the integer parser, so only precision is lost.
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            match literal.parse::<f64>() {
                Ok(divisor) => 100.0 / divisor,
                Err(e) => panic!("invalid literal for integer: {:?}: {}", raw, e),
            }
        }
        Err(e) => panic!("invalid literal for integer: {:?}: {}", raw, e),
    }
}

/// Panics on a zero divisor.
pub fn divide_hundred(divisor: i64) -> f64 {
    if divisor == 0 {
        panic!("division by zero");
    }
    100.0 / divisor as f64
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub results: Vec<Vec<Value>>,
}

/// `GET /dangerous-query?search=S`, with `S` pasted into the SQL text.
pub async fn dangerous_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResults> {
    let sql = users::unsafe_name_search_sql(&params.search);
    tracing::debug!(sql = %sql, "Running unparameterized search");

    let mut conn = match state.store.connect().await {
        Ok(conn) => conn,
        Err(e) => panic!("store connection failed: {}", e),
    };
    let results = match users::raw_rows(&mut conn, &sql).await {
        Ok(rows) => rows,
        Err(e) => panic!("query failed: {}", e),
    };
    state.store.release(conn).await;

    Json(SearchResults { results })
}
