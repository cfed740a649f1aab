//! The on-disk store keeps data across reopen.

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use ocd_manager_api::database::SqliteStore;
use ocd_manager_api::server::create_app;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_data_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("ocd.sqlite");

    let mut config = common::test_config();
    config.database.path = db_path.to_string_lossy().into_owned();

    let server = TestServer::new(create_app(config.clone()).await.unwrap()).unwrap();
    let session = common::register(&server, "sam@example.com").await;
    server
        .post("/api/habits")
        .add_header(header::COOKIE, common::cookie(&session))
        .json(&json!({"name": "Walk"}))
        .await
        .assert_status(StatusCode::CREATED);
    drop(server);

    assert!(db_path.exists());

    let server = TestServer::new(create_app(config).await.unwrap()).unwrap();
    let habits: Value = server
        .get("/api/habits")
        .add_header(header::COOKIE, common::cookie(&session))
        .await
        .json();
    assert_eq!(habits["habits"][0]["name"], "Walk");

    let reopened = SqliteStore::open(&db_path).await.unwrap();
    reopened.ping().await.unwrap();
}
