//! Unit tests for the metrics registry

use confluence_signals::metrics::Metrics;
use confluence_signals::models::signal::SignalDirection;

#[test]
fn test_export_after_recording() {
    let metrics = Metrics::new().unwrap();
    metrics.scans_total.inc();
    metrics.record_signal(SignalDirection::Long);
    metrics.record_signal(SignalDirection::Long);
    metrics.record_signal(SignalDirection::Short);
    metrics.record_delivery(true);
    metrics.record_delivery(false);
    metrics.subscribers.set(3);

    let text = metrics.export().unwrap();
    assert!(text.contains("signal_scans_total 1"));
    assert!(text.contains("signals_total{side=\"LONG\"} 2"));
    assert!(text.contains("signals_total{side=\"SHORT\"} 1"));
    assert!(text.contains("signal_deliveries_total{outcome=\"sent\"} 1"));
    assert!(text.contains("signal_deliveries_total{outcome=\"failed\"} 1"));
    assert!(text.contains("signal_subscribers 3"));
}

#[test]
fn test_instances_are_independent() {
    let first = Metrics::new().unwrap();
    let second = Metrics::new().unwrap();
    first.instrument_failures_total.inc();

    assert_eq!(first.instrument_failures_total.get(), 1);
    assert_eq!(second.instrument_failures_total.get(), 0);
}
