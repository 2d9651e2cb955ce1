//! Indicator battery: runs every indicator family over a candle sequence and
//! annotates each candle with the results.

use crate::config::IndicatorConfig;
use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{macd_series, rsi_series, stoch_rsi_series};
use crate::indicators::trend::ema_cross_series;
use crate::indicators::volatility::bollinger_series;
use crate::indicators::volume::volume_sma_series;
use crate::models::indicators::{Candle, IndicatorRow};

/// Computes the six indicator families with a fixed set of window lengths.
#[derive(Debug, Clone, Default)]
pub struct IndicatorBattery {
    config: IndicatorConfig,
}

impl IndicatorBattery {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Annotate `candles` (oldest first) with indicator values.
    ///
    /// Returns one row per candle, or an error and no rows at all when the
    /// input is empty or malformed.
    pub fn compute(&self, candles: &[Candle]) -> Result<Vec<IndicatorRow>, IndicatorError> {
        for (name, period) in self.config.periods() {
            if period == 0 {
                return Err(IndicatorError::InvalidPeriod { name });
            }
        }
        validate_candles(candles)?;

        let cfg = &self.config;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        let rsi = rsi_series(&closes, cfg.rsi_period);
        let bands = bollinger_series(&closes, cfg.bb_length, cfg.bb_std);
        let macd = macd_series(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);
        let emas = ema_cross_series(&closes, cfg.ema_fast, cfg.ema_slow);
        let vol_sma = volume_sma_series(&volumes, cfg.volume_sma_period);
        let stoch = stoch_rsi_series(&rsi, cfg.stoch_rsi_period, cfg.stoch_rsi_k, cfg.stoch_rsi_d);

        let rows = candles
            .iter()
            .enumerate()
            .map(|(i, candle)| IndicatorRow {
                candle: *candle,
                rsi: rsi[i],
                bb_lower: bands.lower[i],
                bb_mid: bands.middle[i],
                bb_upper: bands.upper[i],
                macd_line: Some(macd.line[i]),
                macd_signal: Some(macd.signal[i]),
                macd_hist: Some(macd.histogram[i]),
                ema_fast: Some(emas.fast[i]),
                ema_slow: Some(emas.slow[i]),
                vol_sma: vol_sma[i],
                stoch_rsi_k: stoch.k[i],
                stoch_rsi_d: stoch.d[i],
            })
            .collect();

        Ok(rows)
    }
}

/// Convenience wrapper over [`IndicatorBattery::compute`].
pub fn compute_indicators(
    candles: &[Candle],
    config: &IndicatorConfig,
) -> Result<Vec<IndicatorRow>, IndicatorError> {
    IndicatorBattery::new(config.clone()).compute(candles)
}

fn validate_candles(candles: &[Candle]) -> Result<(), IndicatorError> {
    if candles.is_empty() {
        return Err(IndicatorError::EmptySeries);
    }

    for (index, candle) in candles.iter().enumerate() {
        let fields = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
            ("volume", candle.volume),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(IndicatorError::NonFiniteValue { index, field });
        }
        if index > 0 && candle.timestamp <= candles[index - 1].timestamp {
            return Err(IndicatorError::OutOfOrder { index });
        }
    }

    Ok(())
}
