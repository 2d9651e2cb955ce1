//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and the scan routes.

#[path = "test_utils.rs"]
mod test_utils;

#[path = "api_server/test_utils.rs"]
mod server_utils;

use serde_json::Value;

use server_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "confluence-signals");
}

#[tokio::test]
async fn metrics_endpoint_tracks_requests() {
    let app = TestApiServer::new().await;
    for _ in 0..3 {
        let _ = app.server.get("/health").await;
    }

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
    assert!(body.contains("signal_scans_total"));
    assert!(app.metrics.http_requests_total.get() >= 3.0);
}

#[tokio::test]
async fn scan_routes_unavailable_without_scanner() {
    let app = TestApiServer::new().await;

    let response = app
        .server
        .get("/api/report")
        .add_query_param("symbol", "BTC/USDT")
        .await;
    assert_eq!(response.status_code(), 503);

    let response = app.server.post("/api/scan").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn report_endpoint_returns_diagnostic() {
    let app = TestApiServer::with_scanner(&["BTC/USDT"]).await;

    let response = app
        .server
        .get("/api/report")
        .add_query_param("symbol", "btc/usdt")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["symbol"], "BTC/USDT");
    let report = body["report"].as_str().unwrap();
    assert!(report.contains("🔍 *BTC/USDT*"));
    assert!(report.contains("RSI"));
}

#[tokio::test]
async fn report_endpoint_validates_symbol() {
    let app = TestApiServer::with_scanner(&["BTC/USDT"]).await;

    let response = app
        .server
        .get("/api/report")
        .add_query_param("symbol", "  ")
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .get("/api/report")
        .add_query_param("symbol", "XYZ/USDT")
        .await;
    assert_eq!(response.status_code(), 502);
}

#[tokio::test]
async fn scan_endpoint_returns_outcome() {
    let app = TestApiServer::with_scanner(&["BTC/USDT", "XYZ/USDT", "SOL/USDT"]).await;

    let response = app.server.post("/api/scan").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["scanned"], 3);
    let signals = body["signals"].as_array().unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0]["symbol"], "BTC/USDT");
    assert_eq!(signals[0]["side"], "LONG");
    assert_eq!(body["failures"][0]["symbol"], "XYZ/USDT");
    assert_eq!(app.metrics.scans_total.get(), 1);
}
