mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_create_category_uses_legacy_timestamp_field() {
    let app = TestApp::with_defaults();
    let server = app.server();

    let response = server
        .post("/api/categories")
        .json(&json!({ "name": "  Rust  ", "description": "   " }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["name"], "Rust");
    assert!(body["description"].is_null());
    assert!(body.get("create_time").is_some());
    assert_eq!(app.tracker.counter("categories"), 1);
}

#[tokio::test]
async fn test_create_category_empty_name() {
    let app = TestApp::with_defaults();
    let server = app.server();

    let response = server
        .post("/api/categories")
        .json(&json!({ "name": "" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_category_duplicate() {
    let app = TestApp::with_defaults();
    let server = app.server();

    server
        .post("/api/categories")
        .json(&json!({ "name": "Rust" }))
        .await;
    let response = server
        .post("/api/categories")
        .json(&json!({ "name": "Rust" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_and_delete_categories() {
    let app = TestApp::with_defaults();
    let server = app.server();

    let created = server
        .post("/api/categories")
        .json(&json!({ "name": "Go" }))
        .await
        .json::<serde_json::Value>();
    server
        .post("/api/categories")
        .json(&json!({ "name": "Zig" }))
        .await;

    let list = server.get("/api/categories").await.json::<serde_json::Value>();
    assert_eq!(list["pagination"]["total_items"], 2);
    assert_eq!(list["pagination"]["page_size"], 25);

    let id = created["id"].as_i64().unwrap();
    server
        .delete(&format!("/api/categories/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/categories/{id}"))
        .await
        .assert_status_not_found();
}
