//! Common test setup functions.

use api::{router, AppState};
use axum::Router;
use std::sync::Arc;
use worker::{Pipeline, PipelineConfig};

use crate::mocks::{MockFeed, MockInference, MockStore};

/// Test context with mocked collaborators behind the real pipeline and router.
pub struct TestContext {
    pub feed: MockFeed,
    pub store: MockStore,
    pub inference: MockInference,
    pub pipeline: Arc<Pipeline>,
    pub router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with(MockFeed::default(), MockInference::new(), PipelineConfig::default())
    }

    pub fn with_feed(feed: MockFeed) -> Self {
        Self::with(feed, MockInference::new(), PipelineConfig::default())
    }

    pub fn with(feed: MockFeed, inference: MockInference, config: PipelineConfig) -> Self {
        let store = MockStore::new();
        let pipeline = Arc::new(Pipeline::new(
            Arc::new(feed.clone()),
            Arc::new(store.clone()),
            Arc::new(inference.clone()),
            &config,
        ));
        let router = router(AppState::new(pipeline.clone(), "mock"));

        Self {
            feed,
            store,
            inference,
            pipeline,
            router,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
