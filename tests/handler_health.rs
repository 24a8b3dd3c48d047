mod common;

use axum::http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = TestApp::with_defaults();
    let server = app.server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["checks"]["eviction_queue"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_worker_gone() {
    let app = TestApp::with_defaults();
    let server = app.server();
    let TestApp { jobs, .. } = app;
    drop(jobs);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["eviction_queue"]["status"], "error");
}
