//! On-demand trigger and metrics endpoints.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::fixtures::{self, sample_page};
use integration_tests::mocks::{MockFeed, MockInference};
use integration_tests::setup::TestContext;
use std::time::Duration;
use worker::PipelineConfig;

/// POST /run executes a run and returns its report
#[tokio::test]
async fn test_post_run_returns_report() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/run").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["report"]["outcome"]["status"], "completed");
    assert_eq!(body["report"]["fetched"], 4);
    assert_eq!(body["report"]["persisted"], 4);
    assert!(body["report"]["run_id"].is_string());
    assert_eq!(ctx.store.records().len(), 4);
}

/// GET /run triggers the same run
#[tokio::test]
async fn test_get_run_is_accepted() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.post("/run").await.assert_status_ok();

    let response = server.get("/run").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["report"]["outcome"]["status"], "no_new_items");
    assert_eq!(body["report"]["persisted"], 0);
    assert_eq!(ctx.feed.fetch_count(), 2);
}

/// A client that gives up early does not cut the run short
#[tokio::test]
async fn test_run_completes_after_client_disconnects() {
    let ctx = TestContext::with(
        MockFeed::new(fixtures::items(4)),
        MockInference::new().with_delay(Duration::from_millis(300)),
        PipelineConfig { max_concurrency: 2 },
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let router = ctx.router.clone();
    let server = tokio::spawn(async move { axum::serve(listener, router).await });

    let client = reqwest::Client::new();
    let result = client
        .post(format!("http://{addr}/run"))
        .timeout(Duration::from_millis(100))
        .send()
        .await;
    assert!(result.is_err());

    ctx.pipeline.wait_idle().await;

    assert_eq!(ctx.inference.call_count(), 4);
    assert_eq!(ctx.store.ids(), vec![1, 2, 3, 4]);
    assert_eq!(ctx.store.insert_count(), 1);

    server.abort();
}

/// A failed fetch is reported as a gateway error with its code
#[tokio::test]
async fn test_failed_fetch_maps_to_bad_gateway() {
    let feed = MockFeed::new(sample_page());
    feed.set_should_fail(true);
    let ctx = TestContext::with_feed(feed);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/run").await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "FETCH_001");
    assert_eq!(body["stage"], "fetch");
    assert_eq!(body["report"]["outcome"]["status"], "failed");
}

/// A failed insert is reported as unavailable
#[tokio::test]
async fn test_failed_persist_maps_to_service_unavailable() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));
    ctx.store.set_insert_failure(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/run").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PERSIST_001");
    assert_eq!(body["report"]["enriched"], 4);
}

/// Other methods are rejected
#[tokio::test]
async fn test_run_rejects_delete() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .delete("/run")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

/// GET /metrics exposes the counters as JSON
#[tokio::test]
async fn test_metrics_snapshot() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    server.post("/run").await.assert_status_ok();

    let response = server.get("/metrics").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body["runs_started"].as_u64().unwrap() >= 1);
    assert!(body["records_persisted"].as_u64().unwrap() >= 4);
    assert!(body.get("inference_latency_mean_ms").is_some());
}
