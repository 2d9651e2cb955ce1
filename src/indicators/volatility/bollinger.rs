//! Bollinger Bands indicator

use crate::common::math;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub lower: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * sample standard deviation)
/// Lower Band = Middle - (std_dev * sample standard deviation)
pub fn bollinger_series(closes: &[f64], period: usize, std_dev: f64) -> BollingerSeries {
    let closes = math::defined(closes);
    let middle = math::sma(&closes, period);
    let std = math::rolling_std(&closes, period);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&std)
            .map(|(mid, sd)| Some((*mid)? + sign * std_dev * (*sd)?))
            .collect()
    };

    BollingerSeries {
        lower: band(-1.0),
        upper: band(1.0),
        middle,
    }
}
