//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::core::scanner::{MarketScanner, ScanOutcome};
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub scanner: Option<Arc<MarketScanner>>,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, scanner: Option<Arc<MarketScanner>>) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            scanner,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "confluence-signals"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Increment in-flight requests
    state.metrics.http_requests_in_flight.inc();

    // Process request
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    // Decrement in-flight requests
    state.metrics.http_requests_in_flight.dec();

    // Record metrics
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    // Log if error status
    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    symbol: String,
}

fn scanner(state: &AppState) -> Result<&Arc<MarketScanner>, StatusCode> {
    state.scanner.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// Diagnostic report for one instrument
async fn report(
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<Value>, StatusCode> {
    let scanner = scanner(&state)?;
    let symbol = params.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let report = scanner.inspect(&symbol).await.map_err(|e| {
        warn!(symbol = %symbol, error = %e, "Failed to build report");
        StatusCode::BAD_GATEWAY
    })?;

    Ok(Json(json!({
        "symbol": symbol,
        "report": report,
    })))
}

/// Run one scan immediately, without notifying subscribers
async fn trigger_scan(State(state): State<AppState>) -> Result<Json<ScanOutcome>, StatusCode> {
    let scanner = scanner(&state)?;
    Ok(Json(scanner.scan().await))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/report", get(report))
        .route("/api/scan", post(trigger_scan))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
