//! EMA (Exponential Moving Average) crossover pair

use crate::common::math;

/// Fast and slow EMAs of the close, computed independently of MACD's EMAs.
#[derive(Debug, Clone, PartialEq)]
pub struct EmaCrossSeries {
    pub fast: Vec<f64>,
    pub slow: Vec<f64>,
}

pub fn ema_cross_series(closes: &[f64], fast_period: usize, slow_period: usize) -> EmaCrossSeries {
    EmaCrossSeries {
        fast: math::ema(closes, fast_period),
        slow: math::ema(closes, slow_period),
    }
}

/// Check the EMA relationship at one point: 1 when fast is above slow,
/// -1 when below, 0 when equal
pub fn ema_cross_direction(fast: f64, slow: f64) -> i32 {
    if fast > slow {
        1
    } else if fast < slow {
        -1
    } else {
        0
    }
}
