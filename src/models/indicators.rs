use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV interval. `timestamp` is the interval open time in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// A candle annotated with every indicator value known at its close.
///
/// Fields are `None` until the relevant window has enough history. Values on
/// row `i` depend only on candles `0..=i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub candle: Candle,
    pub rsi: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_upper: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub vol_sma: Option<f64>,
    pub stoch_rsi_k: Option<f64>,
    pub stoch_rsi_d: Option<f64>,
}

impl IndicatorRow {
    /// A row with no indicator values yet.
    pub fn bare(candle: Candle) -> Self {
        Self {
            candle,
            rsi: None,
            bb_lower: None,
            bb_mid: None,
            bb_upper: None,
            macd_line: None,
            macd_signal: None,
            macd_hist: None,
            ema_fast: None,
            ema_slow: None,
            vol_sma: None,
            stoch_rsi_k: None,
            stoch_rsi_d: None,
        }
    }

    pub fn close(&self) -> f64 {
        self.candle.close
    }

    pub fn volume(&self) -> f64 {
        self.candle.volume
    }

    /// Snapshot of the fields the confluence scorer needs, or `None` while any
    /// of them is still undefined.
    pub fn snapshot(&self) -> Option<IndicatorSnapshot> {
        Some(IndicatorSnapshot {
            close: self.candle.close,
            volume: self.candle.volume,
            rsi: self.rsi?,
            bb_lower: self.bb_lower?,
            bb_upper: self.bb_upper?,
            macd_line: self.macd_line,
            macd_signal: self.macd_signal,
            macd_hist: self.macd_hist?,
            ema_fast: self.ema_fast?,
            ema_slow: self.ema_slow?,
            vol_sma: self.vol_sma?,
            stoch_rsi_k: self.stoch_rsi_k,
        })
    }
}

/// Fully defined view of a closed row. `macd_line`, `macd_signal` and
/// `stoch_rsi_k` stay optional: an undefined value simply fails its rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub volume: f64,
    pub rsi: f64,
    pub bb_lower: f64,
    pub bb_upper: f64,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub vol_sma: f64,
    pub stoch_rsi_k: Option<f64>,
}
