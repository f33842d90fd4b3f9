//! Behavioural properties of a pipeline run.
//!
//! Collaborators are mocked, except where a property concerns the wire
//! exchange with the feed or the inference engine; those run the real HTTP
//! clients against `httpmock` servers.

use feed_source::{FeedClient, FeedConfig};
use geo_inference::{FallbackTier, GeoInferenceAdapter, InferenceConfig};
use geofeed_core::{GeoResult, Stage};
use httpmock::{Method::GET, Method::POST, MockServer};
use integration_tests::fixtures::{self, completion, feed_page, item, sample_page};
use integration_tests::mocks::{MockAnswer, MockFeed, MockInference, MockStore};
use integration_tests::setup::TestContext;
use std::sync::Arc;
use std::time::Duration;
use worker::{Pipeline, PipelineConfig, RunOutcome};

#[tokio::test]
async fn test_unchanged_page_persists_once() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));

    let first = ctx.pipeline.run().await;
    assert_eq!(first.outcome, RunOutcome::Completed);
    assert_eq!(first.persisted, 4);

    let second = ctx.pipeline.run().await;
    assert_eq!(second.outcome, RunOutcome::NoNewItems);
    assert_eq!(second.persisted, 0);

    assert_eq!(ctx.store.records().len(), 4);
    assert_eq!(ctx.inference.call_count(), 4);
}

#[tokio::test]
async fn test_only_new_items_on_next_page() {
    let feed = MockFeed::new(fixtures::items(3));
    let ctx = TestContext::with_feed(feed.clone());
    ctx.pipeline.run().await;

    feed.set_items(fixtures::items(5));
    let report = ctx.pipeline.run().await;

    assert_eq!(report.fetched, 5);
    assert_eq!(report.new, 2);
    assert_eq!(report.persisted, 2);
    assert_eq!(ctx.store.ids(), vec![1, 2, 3, 4, 5]);
    assert_eq!(ctx.inference.call_count(), 5);
}

#[tokio::test]
async fn test_malformed_item_is_isolated() {
    let inference = MockInference::new();
    inference.answer("布伦特", MockAnswer::Malformed);
    let ctx = TestContext::with(
        MockFeed::new(sample_page()),
        inference,
        PipelineConfig::default(),
    );

    let report = ctx.pipeline.run().await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.enriched, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.skipped_items[0].id, 4412303);
    assert_eq!(report.skipped_items[0].code, "ENRICH_002");
    assert_eq!(ctx.store.ids(), vec![4412302, 4412304, 4412305]);
}

#[tokio::test]
async fn test_inference_receives_plain_text() {
    let ctx = TestContext::with_feed(MockFeed::new(vec![
        item(7, "<b>【美联储】</b>鲍威尔在<a href=\"/dc\">华盛顿</a>表示"),
        item(8, "<p>沪铜收涨</p>"),
    ]));

    ctx.pipeline.run().await;

    let mut texts = ctx.inference.received_texts();
    texts.sort();
    assert_eq!(texts, vec!["【美联储】鲍威尔在华盛顿表示", "沪铜收涨"]);
    assert!(texts.iter().all(|t| !t.contains('<') && !t.contains('>')));

    // Stored records keep the original markup.
    let stored = ctx.store.record(8).expect("record 8");
    assert_eq!(stored.rich_text, "<p>沪铜收涨</p>");
}

#[tokio::test]
async fn test_skipped_item_is_retried_next_run() {
    let inference = MockInference::new();
    inference.answer("快讯 2", MockAnswer::Unreachable);
    let ctx = TestContext::with(
        MockFeed::new(fixtures::items(3)),
        inference,
        PipelineConfig::default(),
    );

    ctx.pipeline.run().await;
    assert_eq!(ctx.store.ids(), vec![1, 3]);

    let retry = ctx.pipeline.run().await;
    assert_eq!(retry.new, 1);
    assert_eq!(retry.skipped_items[0].id, 2);
}

#[tokio::test]
async fn test_no_new_items_short_circuits() {
    let ctx = TestContext::with_feed(MockFeed::new(vec![]));

    let report = ctx.pipeline.run().await;

    assert_eq!(report.outcome, RunOutcome::NoNewItems);
    assert_eq!(ctx.inference.call_count(), 0);
    assert_eq!(ctx.store.insert_count(), 0);
    assert_eq!(ctx.store.existence_query_count(), 0);
}

#[tokio::test]
async fn test_failed_insert_commits_nothing() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));
    ctx.store.set_insert_failure(true);

    let report = ctx.pipeline.run().await;

    match &report.outcome {
        RunOutcome::Failed { stage, code, .. } => {
            assert_eq!(*stage, Stage::Persist);
            assert_eq!(code, "PERSIST_001");
        }
        other => panic!("expected persist failure, got {other:?}"),
    }
    assert_eq!(ctx.store.insert_count(), 1);
    assert!(ctx.store.records().is_empty());
}

#[tokio::test]
async fn test_dedup_failure_fails_closed() {
    let ctx = TestContext::with_feed(MockFeed::new(sample_page()));
    ctx.store.set_existence_failure(true);

    let report = ctx.pipeline.run().await;

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed { stage: Stage::Dedup, .. }
    ));
    assert_eq!(ctx.inference.call_count(), 0);
    assert_eq!(ctx.store.insert_count(), 0);
}

#[tokio::test]
async fn test_fetch_failure_touches_nothing() {
    let feed = MockFeed::new(sample_page());
    feed.set_should_fail(true);
    let ctx = TestContext::with_feed(feed);

    let report = ctx.pipeline.run().await;

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed { stage: Stage::Fetch, .. }
    ));
    assert_eq!(ctx.store.existence_query_count(), 0);
    assert_eq!(ctx.inference.call_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_inference_is_bounded() {
    let inference = MockInference::new().with_delay(Duration::from_millis(25));
    let ctx = TestContext::with(
        MockFeed::new(fixtures::items(20)),
        inference,
        PipelineConfig { max_concurrency: 4 },
    );

    let report = ctx.pipeline.run().await;

    assert_eq!(report.persisted, 20);
    assert!(ctx.inference.max_in_flight() <= 4);
}

#[tokio::test]
async fn test_financial_item_resolves_to_exchange_city() {
    let engine = MockServer::start_async().await;
    let exchange_tier = engine
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_contains(FallbackTier::Exchange.instruction())
                .body_contains("布伦特原油期货跌1.5%");
            then.status(200).json_body(completion(
                r#"{"address": "伦敦", "lat": 51.5074, "lng": -0.1278}"#,
            ));
        })
        .await;

    let adapter =
        GeoInferenceAdapter::new(&InferenceConfig::new(engine.base_url(), "test-key")).unwrap();
    let store = MockStore::new();
    let pipeline = Pipeline::new(
        Arc::new(MockFeed::new(vec![item(4412303, "<b>布伦特原油期货跌1.5%</b>")])),
        Arc::new(store.clone()),
        Arc::new(adapter),
        &PipelineConfig::default(),
    );

    let report = pipeline.run().await;

    exchange_tier.assert_async().await;
    assert_eq!(report.persisted, 1);
    let record = store.record(4412303).unwrap();
    assert_eq!(record.address, "伦敦");
    assert_eq!(record.rich_text, "<b>布伦特原油期货跌1.5%</b>");
}

#[tokio::test]
async fn test_unresolvable_item_stored_as_unknown() {
    let engine = MockServer::start_async().await;
    engine
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .json_body(completion(r#"{"address":"未知","lat":0,"lng":0}"#));
        })
        .await;

    let adapter =
        GeoInferenceAdapter::new(&InferenceConfig::new(engine.base_url(), "test-key")).unwrap();
    let store = MockStore::new();
    let pipeline = Pipeline::new(
        Arc::new(MockFeed::new(vec![item(4412302, "关于价值投资的几点思考")])),
        Arc::new(store.clone()),
        Arc::new(adapter),
        &PipelineConfig::default(),
    );

    pipeline.run().await;

    let record = store.record(4412302).unwrap();
    let unknown = GeoResult::unknown();
    assert_eq!(
        (record.address.as_str(), record.latitude, record.longitude),
        (unknown.address.as_str(), 0.0, 0.0)
    );
}

#[tokio::test]
async fn test_http_feed_and_engine_end_to_end() {
    let source = MockServer::start_async().await;
    let page = sample_page();
    source
        .mock_async(|when, then| {
            when.method(GET).path("/api/zhibo/feed");
            then.status(200).json_body(feed_page(&page));
        })
        .await;

    let engine = MockServer::start_async().await;
    engine
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions").body_contains("沪金");
            then.status(200).json_body(completion(
                r#"{"address": "上海", "lat": 31.2304, "lng": 121.4737}"#,
            ));
        })
        .await;
    engine
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion("I could not find a location."));
        })
        .await;

    let feed = FeedClient::new(&FeedConfig {
        url: source.url("/api/zhibo/feed?zhibo_id=152&page_size=60"),
        ..FeedConfig::default()
    })
    .unwrap();
    let adapter =
        GeoInferenceAdapter::new(&InferenceConfig::new(engine.base_url(), "test-key")).unwrap();
    let store = MockStore::new();
    let pipeline = Pipeline::new(
        Arc::new(feed),
        Arc::new(store.clone()),
        Arc::new(adapter),
        &PipelineConfig::default(),
    );

    let report = pipeline.run().await;

    assert_eq!(report.fetched, 4);
    assert_eq!(report.persisted, 1);
    assert_eq!(report.skipped, 3);
    assert!(report
        .skipped_items
        .iter()
        .all(|s| s.code == "ENRICH_002"));
    assert_eq!(store.record(4412304).unwrap().address, "上海");
}
