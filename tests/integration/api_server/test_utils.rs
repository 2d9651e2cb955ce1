//! Test utilities for API server integration tests

use axum_test::TestServer;
use confluence_signals::core::http::{create_router, AppState};
use confluence_signals::metrics::Metrics;
use std::sync::Arc;

use super::test_utils::{sample_market, RecordingNotifier, TestScanner};

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    /// Server with health and metrics only; scan routes answer 503.
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let state = AppState::new(metrics.clone(), None);
        Self::serve(state, metrics)
    }

    /// Server backed by a scanner over the shared sample market.
    pub async fn with_scanner(tickers: &[&str]) -> Self {
        let scanner = TestScanner::new(tickers, sample_market(), RecordingNotifier::new());
        let state = AppState::new(scanner.metrics.clone(), Some(scanner.scanner.clone()));
        Self::serve(state, scanner.metrics)
    }

    fn serve(state: AppState, metrics: Arc<Metrics>) -> Self {
        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");
        Self { server, metrics }
    }
}
