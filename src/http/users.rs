//! `/users` handlers.
//!
//! Each handler opens its own store connection and closes it before
//! returning, whatever the outcome.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::db::{users, NewUser, User};
use crate::http::response::ApiError;
use crate::http::server::AppState;

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let mut conn = state.store.connect().await?;
    let result = users::list(&mut conn).await;
    state.store.release(conn).await;
    Ok(Json(result?))
}

/// Body is read as raw bytes so a wrong media type or malformed input
/// surfaces as a 500 with the reason rather than an extractor rejection.
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if !is_json_content_type(&headers) {
        return Err(ApiError::Body(
            "Unsupported Media Type: Did not attempt to load JSON data because the \
             request Content-Type was not 'application/json'."
                .to_string(),
        ));
    }
    let new_user = parse_new_user(&body)?;

    let mut conn = state.store.connect().await?;
    let result = users::insert(&mut conn, &new_user).await;
    state.store.release(conn).await;
    let user = result?;

    tracing::info!(id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, ApiError> {
    let Some(id) = parse_user_id(&segment) else {
        // Only integer segments name a user; anything else is not a route.
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let Some(id) = id else {
        return Err(ApiError::UserNotFound);
    };

    let mut conn = state.store.connect().await?;
    let result = users::find(&mut conn, id).await;
    state.store.release(conn).await;

    match result? {
        Some(user) => Ok(Json(user).into_response()),
        None => Err(ApiError::UserNotFound),
    }
}

/// `None` if the segment is not an unsigned integer; `Some(None)` if it is
/// one but too large to be any row's id.
pub fn parse_user_id(segment: &str) -> Option<Option<i64>> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(segment.parse().ok())
}

/// `application/json`, or any `application/*+json`, ignoring parameters.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Turn a request body into insert parameters.
///
/// Strings pass through, numbers and booleans become their text, missing or
/// null fields become SQL NULL. Anything that is not a JSON object fails.
pub fn parse_new_user(body: &[u8]) -> Result<NewUser, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::Body(format!("Failed to decode JSON object: {}", e)))?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(ApiError::Body(format!(
                "Expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(NewUser {
        name: coerce_text("name", fields.get("name"))?,
        email: coerce_text("email", fields.get("email"))?,
    })
}

fn coerce_text(field: &str, value: Option<&Value>) -> Result<Option<String>, ApiError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(ApiError::Body(format!(
            "can't adapt {} for field '{}'",
            json_kind(other),
            field
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
