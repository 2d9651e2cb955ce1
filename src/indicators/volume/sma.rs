//! Volume moving average

use crate::common::math;

/// SMA of traded volume, the baseline for volume-spike detection.
pub fn volume_sma_series(volumes: &[f64], period: usize) -> Vec<Option<f64>> {
    math::sma(&math::defined(volumes), period)
}
