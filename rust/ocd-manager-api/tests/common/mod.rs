//! Shared setup for the HTTP integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use ocd_manager_api::config::{AppConfig, AuthConfig};
use ocd_manager_api::database::SqliteStore;
use ocd_manager_api::server::create_app_with_store;
use serde_json::{json, Value};

pub const SESSION_COOKIE: &str = "ocd-session";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            jwt_secret: Some("integration-test-secret-0123456789".into()),
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Server over a fresh in-memory store.
pub async fn server_with(config: AppConfig) -> (TestServer, SqliteStore) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = create_app_with_store(config, store.clone());
    (TestServer::new(app).unwrap(), store)
}

pub async fn server() -> TestServer {
    server_with(test_config()).await.0
}

/// Register `email` and return the session cookie value.
pub async fn register(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({"email": email, "name": "Test User", "password": PASSWORD}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.cookie(SESSION_COOKIE).value().to_string()
}

/// `Cookie` header value carrying `session`.
pub fn cookie(session: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{SESSION_COOKIE}={session}")).unwrap()
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

pub fn id_of(body: &Value, key: &str) -> i64 {
    body[key]["id"].as_i64().unwrap()
}
