//! RSI (Relative Strength Index) indicator

use crate::common::math;

/// Calculate the RSI series over closing prices
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = SMA(gain, period) / SMA(loss, period)
///
/// The first candle has no predecessor and contributes a zero gain and a zero
/// loss, so the first defined value sits at index `period - 1`. A zero average
/// loss is replaced by [`math::ZERO_DIVISOR_GUARD`]: a strictly rising window
/// reads ~100 and a perfectly flat one reads 0.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    for (i, close) in closes.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { close - closes[i - 1] };
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gain = math::sma(&gains, period);
    let avg_loss = math::sma(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(gain, loss)| {
            let rs = math::guarded_div((*gain)?, (*loss)?);
            Some(100.0 - 100.0 / (1.0 + rs))
        })
        .collect()
}
