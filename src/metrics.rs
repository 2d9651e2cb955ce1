//! Prometheus metrics for the HTTP surface and the scan loop.
//!
//! Everything is registered on a private registry so several instances can
//! coexist (tests build one per server).

use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry, TextEncoder,
};

use crate::models::signal::SignalDirection;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub http_requests_total: Counter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub scans_total: IntCounter,
    pub scan_duration_seconds: Histogram,
    /// Signals emitted, by side.
    pub signals_total: CounterVec,
    pub instrument_failures_total: IntCounter,
    /// Message deliveries, by outcome (`sent` / `failed`).
    pub deliveries_total: CounterVec,
    pub subscribers: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = Counter::with_opts(Opts::new(
            "http_requests_total",
            "Total number of HTTP requests",
        ))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let http_requests_in_flight = Gauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        ))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        let scans_total = IntCounter::with_opts(Opts::new(
            "signal_scans_total",
            "Completed market scans",
        ))?;
        registry.register(Box::new(scans_total.clone()))?;

        let scan_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("signal_scan_duration_seconds", "Duration of a full market scan")
                .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        )?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;

        let signals_total = CounterVec::new(
            Opts::new("signals_total", "Signals emitted by side"),
            &["side"],
        )?;
        registry.register(Box::new(signals_total.clone()))?;

        let instrument_failures_total = IntCounter::with_opts(Opts::new(
            "signal_instrument_failures_total",
            "Instruments skipped because data could not be fetched or evaluated",
        ))?;
        registry.register(Box::new(instrument_failures_total.clone()))?;

        let deliveries_total = CounterVec::new(
            Opts::new("signal_deliveries_total", "Message deliveries by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(deliveries_total.clone()))?;

        let subscribers = IntGauge::with_opts(Opts::new(
            "signal_subscribers",
            "Current number of subscribed chats",
        ))?;
        registry.register(Box::new(subscribers.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            scans_total,
            scan_duration_seconds,
            signals_total,
            instrument_failures_total,
            deliveries_total,
            subscribers,
        })
    }

    pub fn record_signal(&self, side: SignalDirection) {
        self.signals_total.with_label_values(&[side.as_str()]).inc();
    }

    pub fn record_delivery(&self, delivered: bool) {
        let outcome = if delivered { "sent" } else { "failed" };
        self.deliveries_total.with_label_values(&[outcome]).inc();
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
