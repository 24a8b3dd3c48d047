mod common;

use serde_json::json;

use blog_backend::domain::retention::RetentionPolicy;
use common::TestApp;

#[tokio::test]
async fn test_retention_status_lists_tables() {
    let app = TestApp::with_defaults();
    let server = app.server();

    server
        .post("/api/users")
        .json(&json!({ "username": "ada", "email": "ada@example.com", "password": "hunter22" }))
        .await;

    let response = server.get("/api/retention").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["threshold"], 500);
    assert_eq!(body["batch_size"], 250);
    assert_eq!(body["floor"], 250);
    assert_eq!(body["worker_running"], true);

    let tables = body["tables"].as_array().unwrap();
    let names: Vec<_> = tables.iter().map(|t| t["table"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["articles", "auth_tokens", "categories", "users"]);

    let users = &tables[3];
    assert_eq!(users["rows"], 1);
    assert_eq!(users["counter"], 1);
    assert_eq!(users["over_threshold"], false);
}

#[tokio::test]
async fn test_manual_evict_removes_oldest_and_resets_counter() {
    let app = TestApp::new(RetentionPolicy::new(10, 3).unwrap());
    let server = app.server();

    for i in 0..5 {
        server
            .post("/api/categories")
            .json(&json!({ "name": format!("cat{i}") }))
            .await;
    }
    assert_eq!(app.tracker.counter("categories"), 5);

    let response = server.post("/api/retention/categories/evict").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["table"], "categories");
    assert_eq!(body["removed"], 3);
    assert_eq!(app.tracker.counter("categories"), 0);

    let list = server.get("/api/categories").await.json::<serde_json::Value>();
    assert_eq!(list["pagination"]["total_items"], 2);
    assert_eq!(list["items"][0]["name"], "cat4");
    assert_eq!(list["items"][1]["name"], "cat3");
}

#[tokio::test]
async fn test_manual_evict_empty_table() {
    let app = TestApp::with_defaults();
    let server = app.server();

    let response = server.post("/api/retention/articles/evict").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["removed"], 0);
}

#[tokio::test]
async fn test_manual_evict_unknown_table() {
    let app = TestApp::with_defaults();
    let server = app.server();

    let response = server.post("/api/retention/comments/evict").await;

    response.assert_status_not_found();
}
