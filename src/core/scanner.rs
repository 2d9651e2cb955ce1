//! Market scan cycle: fetch, evaluate and deliver signals for every ticker.

use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::ScannerConfig;
use crate::indicators::IndicatorError;
use crate::metrics::Metrics;
use crate::models::signal::Signal;
use crate::services::market_data::{FetchError, MarketDataProvider};
use crate::services::notifier::Notifier;
use crate::services::subscribers::SubscriberStore;
use crate::signals::{format_digest, SignalEngine};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("indicator computation failed: {0}")]
    Indicators(#[from] IndicatorError),
}

#[derive(Debug, Clone, Serialize)]
pub struct InstrumentFailure {
    pub symbol: String,
    pub error: String,
}

/// Result of one pass over the ticker list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanOutcome {
    pub scanned: usize,
    pub signals: Vec<Signal>,
    pub failures: Vec<InstrumentFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub struct MarketScanner {
    provider: Arc<dyn MarketDataProvider>,
    engine: SignalEngine,
    config: ScannerConfig,
    store: Arc<dyn SubscriberStore>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<Metrics>,
}

impl MarketScanner {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        engine: SignalEngine,
        config: ScannerConfig,
        store: Arc<dyn SubscriberStore>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            provider,
            engine,
            config,
            store,
            notifier,
            metrics,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    async fn evaluate(&self, symbol: &str) -> Result<Option<Signal>, ScanError> {
        let candles = self
            .provider
            .get_candles(symbol, self.config.candle_limit)
            .await?;
        Ok(self.engine.evaluate_candles(symbol, &candles)?)
    }

    /// Evaluate every configured ticker. One instrument's failure is recorded
    /// and never stops the rest of the pass.
    pub async fn scan(&self) -> ScanOutcome {
        let started = Instant::now();
        info!(
            tickers = self.config.tickers.len(),
            "MarketScanner: scan cycle started for {} tickers",
            self.config.tickers.len()
        );

        let pacing = self.config.request_pacing;
        let results: Vec<(String, Result<Option<Signal>, ScanError>)> =
            stream::iter(self.config.tickers.iter().cloned())
                .map(move |symbol| async move {
                    let result = self.evaluate(&symbol).await;
                    tokio::time::sleep(pacing).await;
                    (symbol, result)
                })
                .buffered(self.config.max_concurrent_fetches.max(1))
                .collect()
                .await;

        let mut outcome = ScanOutcome {
            scanned: results.len(),
            ..ScanOutcome::default()
        };

        for (symbol, result) in results {
            match result {
                Ok(Some(signal)) => {
                    info!(
                        symbol = %symbol,
                        side = %signal.side,
                        score = signal.score,
                        "MarketScanner: signal found for {}",
                        symbol
                    );
                    self.metrics.record_signal(signal.side);
                    outcome.signals.push(signal);
                }
                Ok(None) => {}
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "MarketScanner: skipping {}", symbol);
                    self.metrics.instrument_failures_total.inc();
                    outcome.failures.push(InstrumentFailure {
                        symbol,
                        error: e.to_string(),
                    });
                }
            }
        }

        self.metrics.scans_total.inc();
        self.metrics
            .scan_duration_seconds
            .observe(started.elapsed().as_secs_f64());

        info!(
            signals = outcome.signals.len(),
            failures = outcome.failures.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "MarketScanner: scan cycle finished"
        );
        outcome
    }

    /// Broadcast one digest of `signals` to every subscriber. Each recipient
    /// is independent: a failed delivery is logged and the rest proceed.
    pub async fn deliver(&self, signals: &[Signal]) -> DeliveryReport {
        if signals.is_empty() {
            info!("MarketScanner: cycle complete, no signals");
            return DeliveryReport::default();
        }

        let subscribers = match self.store.list().await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!(error = %e, "MarketScanner: failed to load subscribers");
                return DeliveryReport::default();
            }
        };
        self.metrics.subscribers.set(subscribers.len() as i64);

        if subscribers.is_empty() {
            warn!(
                signals = signals.len(),
                "MarketScanner: signals found but there are no subscribers"
            );
            return DeliveryReport::default();
        }

        let digest = format_digest(signals);
        let mut report = DeliveryReport {
            recipients: subscribers.len(),
            ..DeliveryReport::default()
        };

        for chat_id in subscribers {
            match self.notifier.send(chat_id, &digest).await {
                Ok(()) => {
                    report.delivered += 1;
                    self.metrics.record_delivery(true);
                }
                Err(e) => {
                    report.failed += 1;
                    self.metrics.record_delivery(false);
                    error!(chat_id = chat_id, error = %e, "MarketScanner: delivery to {} failed", chat_id);
                }
            }
            tokio::time::sleep(self.config.delivery_pacing).await;
        }

        info!(
            signals = signals.len(),
            delivered = report.delivered,
            failed = report.failed,
            "MarketScanner: sent {} signals to {} subscribers",
            signals.len(),
            report.delivered
        );
        report
    }

    /// One full cycle: scan, then deliver whatever was found.
    pub async fn scan_and_notify(&self) -> (ScanOutcome, DeliveryReport) {
        let outcome = self.scan().await;
        let delivery = self.deliver(&outcome.signals).await;
        (outcome, delivery)
    }

    /// Diagnostic report for a single instrument.
    pub async fn inspect(&self, symbol: &str) -> Result<String, FetchError> {
        let candles = self
            .provider
            .get_candles(symbol, self.config.candle_limit)
            .await?;
        Ok(self.engine.build_report(symbol, &candles))
    }

    pub async fn refresh_subscriber_gauge(&self) {
        match self.store.count().await {
            Ok(count) => self.metrics.subscribers.set(count as i64),
            Err(e) => warn!(error = %e, "MarketScanner: failed to count subscribers"),
        }
    }
}
