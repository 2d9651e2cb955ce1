//! Stochastic RSI: a stochastic oscillator run over the RSI series itself

use crate::common::math;

#[derive(Debug, Clone, PartialEq)]
pub struct StochRsiSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// Calculate Stochastic RSI %K and %D from an RSI series
///
/// raw = (RSI - min(RSI, period)) / (max(RSI, period) - min(RSI, period)) * 100
/// %K = SMA(raw, k_smoothing)
/// %D = SMA(%K, d_smoothing)
///
/// A flat RSI window has a zero range, which is replaced by
/// [`math::ZERO_DIVISOR_GUARD`] so raw reads 0 instead of NaN.
pub fn stoch_rsi_series(
    rsi: &[Option<f64>],
    period: usize,
    k_smoothing: usize,
    d_smoothing: usize,
) -> StochRsiSeries {
    let lowest = math::rolling_min(rsi, period);
    let highest = math::rolling_max(rsi, period);

    let raw: Vec<Option<f64>> = rsi
        .iter()
        .zip(lowest.iter().zip(&highest))
        .map(|(value, (lo, hi))| {
            let (value, lo, hi) = ((*value)?, (*lo)?, (*hi)?);
            Some(math::guarded_div(value - lo, hi - lo) * 100.0)
        })
        .collect();

    let k = math::sma(&raw, k_smoothing);
    let d = math::sma(&k, d_smoothing);

    StochRsiSeries { k, d }
}
