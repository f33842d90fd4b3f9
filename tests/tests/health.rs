//! Tests for health check endpoints.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::fixtures::sample_page;
use integration_tests::mocks::MockFeed;
use integration_tests::setup::TestContext;

/// Test /health endpoint returns proper structure
#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();

    let status = body["status"].as_str().unwrap_or("");
    assert!(
        status == "healthy" || status == "degraded" || status == "unhealthy",
        "Status should be 'healthy', 'degraded', or 'unhealthy', got '{}'",
        status
    );
    assert_eq!(body["store_backend"], "mock");

    let names: Vec<&str> = body["components"]
        .as_array()
        .expect("components array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["feed", "store", "inference"]);
}

/// A successful run marks every component healthy
#[tokio::test]
async fn test_components_healthy_after_run() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.post("/run").await.assert_status_ok();

    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["runs_completed"].as_u64().unwrap() >= 1);

    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::OK);
}

/// Test /health/live endpoint always returns 200 when service is running
#[tokio::test]
async fn test_live_endpoint() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.get("/health/live").await.assert_status_ok();
}
