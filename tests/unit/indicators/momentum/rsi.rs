//! Unit tests for RSI

use confluence_signals::indicators::momentum::rsi_series;

#[test]
fn test_rsi_warm_up() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let rsi = rsi_series(&closes, 14);
    assert_eq!(rsi.len(), 20);
    assert!(rsi[..13].iter().all(Option::is_none));
    assert!(rsi[13..].iter().all(Option::is_some));
}

#[test]
fn test_rsi_strictly_rising_reads_near_100() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let rsi = rsi_series(&closes, 14);
    let last = rsi[29].unwrap();
    assert!(last > 99.99, "rsi was {}", last);
    assert!(last <= 100.0);
}

#[test]
fn test_rsi_strictly_falling_reads_zero() {
    let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
    let rsi = rsi_series(&closes, 14);
    assert!(rsi[13..].iter().all(|v| v.unwrap().abs() < 1e-9));
}

#[test]
fn test_rsi_flat_series_reads_zero() {
    // Zero gains over a guarded zero loss
    let rsi = rsi_series(&[50.0; 20], 14);
    assert_eq!(rsi[19], Some(0.0));
}

#[test]
fn test_rsi_balanced_moves_read_fifty() {
    let closes: Vec<f64> = (0..30)
        .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
        .collect();
    let rsi = rsi_series(&closes, 14);
    // Window ending on index 29 holds 7 up moves and 7 down moves
    assert!((rsi[29].unwrap() - 50.0).abs() < 1e-9);
}

#[test]
fn test_rsi_bounded() {
    let closes: Vec<f64> = (0..60)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
        .collect();
    for value in rsi_series(&closes, 14).into_iter().flatten() {
        assert!((0.0..=100.0).contains(&value));
    }
}
