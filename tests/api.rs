//! Router-level tests that need no running store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;
use users_api::observability::metrics::HTTP_REQUESTS_TOTAL;
use users_api::HttpServer;

mod common;

fn router(catch_panics: bool) -> Router {
    let mut config = common::config_for(&common::unreachable_store_url());
    config.server.catch_panics = catch_panics;
    HttpServer::new(config).router()
}

async fn send(router: Router, method: &str, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
    send_as(router, method, uri, Some("application/json"), body).await
}

async fn send_as(
    router: Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: Body,
) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }
    let request = request.body(body).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    send(router(true), "GET", uri, Body::empty()).await
}

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_home_lists_endpoints() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);

    let body = as_json(&body);
    assert_eq!(body["message"], "Backend API is running");
    assert_eq!(body["endpoints"]["/health"], "Health check");
    assert_eq!(body["endpoints"]["/users/<id>"], "Get user by ID");
    assert_eq!(body["endpoints"].as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn test_crash_with_nonzero_value_calculates() {
    let (status, body) = get("/crash?value=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!({"result": 20.0, "message": "Calculation successful"})
    );

    let (_, body) = get("/crash?value=-8").await;
    assert_eq!(as_json(&body)["result"], -12.5);
}

#[tokio::test]
async fn test_crash_with_value_beyond_i64_calculates() {
    let (status, body) = get("/crash?value=100000000000000000000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!({"result": 1e-18, "message": "Calculation successful"})
    );
}

#[tokio::test]
async fn test_crash_faults_become_bare_500() {
    for uri in ["/crash?value=0", "/crash", "/crash?value=abc", "/crash?value="] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body, b"Internal Server Error", "{}", uri);
    }
}

#[tokio::test]
#[should_panic(expected = "division by zero")]
async fn test_crash_fault_is_not_caught_by_handler() {
    let _ = send(router(false), "GET", "/crash?value=0", Body::empty()).await;
}

#[tokio::test]
#[should_panic(expected = "invalid literal for integer")]
async fn test_crash_parse_fault_is_not_caught_by_handler() {
    let _ = send(router(false), "GET", "/crash?value=ten", Body::empty()).await;
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let body = as_json(&body);
    assert_eq!(body["status"], "unhealthy");
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(body.get("database").is_none());
}

#[tokio::test]
async fn test_store_outage_is_json_500() {
    for uri in ["/users", "/users/1"] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert!(as_json(&body)["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_non_integer_user_segment_is_route_404() {
    let (status, body) = get("/users/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_create_user_with_unreadable_body_is_500() {
    let (status, body) = send(router(true), "POST", "/users", Body::from("{not json")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(as_json(&body)["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to decode JSON object"));
}

#[tokio::test]
async fn test_create_user_requires_json_content_type() {
    let body = r#"{"name": "Eve", "email": "eve@example.com"}"#;
    for content_type in [Some("text/plain"), None] {
        let (status, response) =
            send_as(router(true), "POST", "/users", content_type, Body::from(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{:?}", content_type);
        assert!(as_json(&response)["error"]
            .as_str()
            .unwrap()
            .starts_with("Unsupported Media Type"));
    }
}

#[tokio::test]
async fn test_dangerous_query_fault_without_store() {
    let (status, _) = get("/dangerous-query?search=Alice").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router(true).oneshot(request).await.unwrap();
    let id = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());

    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "client-chosen")
        .body(Body::empty())
        .unwrap();
    let response = router(true).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "client-chosen");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_faults_are_counted_with_their_status() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let (status, _) = get("/crash?value=0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = get("/crash?value=4").await;
    assert_eq!(status, StatusCode::OK);

    let rendered = handle.render();
    let counted = |status: &str| {
        rendered.lines().any(|line| {
            line.starts_with(HTTP_REQUESTS_TOTAL)
                && line.contains(r#"route="/crash""#)
                && line.contains(&format!(r#"status="{}""#, status))
                && line.ends_with(" 1")
        })
    };
    assert!(counted("500"), "{}", rendered);
    assert!(counted("200"), "{}", rendered);
}
