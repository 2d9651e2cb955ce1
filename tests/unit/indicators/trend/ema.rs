//! Unit tests for the EMA crossover pair

use confluence_signals::indicators::trend::{ema_cross_direction, ema_cross_series};

#[test]
fn test_ema_cross_uptrend_fast_above_slow() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
    let emas = ema_cross_series(&closes, 9, 21);
    assert_eq!(emas.fast.len(), 40);
    assert!(emas.fast[39] > emas.slow[39]);
    assert_eq!(ema_cross_direction(emas.fast[39], emas.slow[39]), 1);
}

#[test]
fn test_ema_cross_downtrend_fast_below_slow() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64 * 0.5).collect();
    let emas = ema_cross_series(&closes, 9, 21);
    assert_eq!(ema_cross_direction(emas.fast[39], emas.slow[39]), -1);
}

#[test]
fn test_ema_cross_first_point_equal() {
    let emas = ema_cross_series(&[100.0, 101.0], 9, 21);
    assert_eq!(emas.fast[0], emas.slow[0]);
    assert_eq!(ema_cross_direction(emas.fast[0], emas.slow[0]), 0);
}
