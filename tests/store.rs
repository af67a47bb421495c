//! End-to-end tests against a real PostgreSQL server.
//!
//! Each test creates its own empty database on the server named by
//! `TEST_DATABASE_URL`.
//! Run with: TEST_DATABASE_URL=postgresql://... cargo test --test store -- --ignored

use reqwest::StatusCode;
use serde_json::{json, Value};
use users_api::config::StartupConfig;
use users_api::db::{self, SeedOutcome, Store};
use users_api::lifecycle::initialize_store;

mod common;

async fn seeded_server() -> (String, users_api::Shutdown) {
    let url = common::fresh_database().await;
    let store = Store::new(url.clone());
    assert_eq!(db::initialize(&store).await.unwrap(), SeedOutcome::Seeded(3));

    let (addr, shutdown) = common::spawn_server(common::config_for(&url)).await;
    (format!("http://{}", addr), shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_seed_runs_once() {
    let url = common::fresh_database().await;
    let store = Store::new(url.clone());

    let config = StartupConfig {
        max_attempts: 1,
        retry_delay_secs: 0,
    };
    let first = initialize_store(&store, &config).await;
    assert!(first.is_success());
    assert_eq!(db::initialize(&store).await.unwrap(), SeedOutcome::AlreadyPopulated(3));

    let (addr, shutdown) = common::spawn_server(common::config_for(&url)).await;
    let users: Vec<Value> = client()
        .get(format!("http://{}/users", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let mut pairs: Vec<(String, String)> = users
        .iter()
        .map(|u| {
            (
                u["name"].as_str().unwrap().to_string(),
                u["email"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("Alice Johnson".to_string(), "alice@example.com".to_string()),
            ("Bob Smith".to_string(), "bob@example.com".to_string()),
            ("Charlie Brown".to_string(), "charlie@example.com".to_string()),
        ]
    );

    shutdown.trigger();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_created_user_can_be_fetched() {
    let (base, shutdown) = seeded_server().await;
    let client = client();

    let res = client
        .post(format!("{}/users", base))
        .json(&json!({"name": "Dana Scully", "email": "dana@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let res = client.get(format!("{}/users/{}", base, id)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"id": id, "name": "Dana Scully", "email": "dana@example.com"})
    );

    shutdown.trigger();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_unknown_id_is_404() {
    let (base, shutdown) = seeded_server().await;

    let res = client().get(format!("{}/users/999999", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"error": "User not found"}));

    shutdown.trigger();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_duplicate_email_is_500_and_keeps_existing_row() {
    let (base, shutdown) = seeded_server().await;
    let client = client();

    let res = client
        .post(format!("{}/users", base))
        .json(&json!({"name": "Impostor", "email": "alice@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = res.json::<Value>().await.unwrap()["error"].as_str().unwrap().to_string();
    assert!(error.contains("duplicate key"), "unexpected error: {}", error);

    let users: Vec<Value> = client.get(format!("{}/users", base)).send().await.unwrap().json().await.unwrap();
    let alice: Vec<&Value> = users.iter().filter(|u| u["email"] == "alice@example.com").collect();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0]["name"], "Alice Johnson");

    shutdown.trigger();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_missing_fields_hit_not_null_constraint() {
    let (base, shutdown) = seeded_server().await;

    let res = client()
        .post(format!("{}/users", base))
        .json(&json!({"name": "No Email"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("null value"));

    shutdown.trigger();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_health_with_reachable_store() {
    let (base, shutdown) = seeded_server().await;

    let res = client().get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"status": "healthy", "database": "connected"})
    );

    shutdown.trigger();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_dangerous_query_returns_tuples_and_is_injectable() {
    let (base, shutdown) = seeded_server().await;
    let client = client();

    let res = client
        .get(format!("{}/dangerous-query", base))
        .query(&[("search", "Bob Smith")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let rows = body["results"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Bob Smith");
    assert_eq!(rows[0][2], "bob@example.com");
    assert!(rows[0][0].is_i64());

    let res = client
        .get(format!("{}/dangerous-query", base))
        .query(&[("search", "x' OR '1'='1")])
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 3);

    let res = client
        .get(format!("{}/dangerous-query", base))
        .query(&[("search", "x' UNION SELECT 1, NULL, 't' --")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"results": [[1, null, "t"]]}));

    let res = client
        .get(format!("{}/dangerous-query", base))
        .query(&[("search", "O'Brien")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    shutdown.trigger();
}
