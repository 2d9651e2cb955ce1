//! Market data provider interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::indicators::Candle;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited by upstream")]
    RateLimited,
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected http status {0}")]
    Status(u16),
    #[error("exchange api error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("malformed kline payload: {0}")]
    Decode(String),
    #[error("unsupported timeframe '{0}'")]
    UnsupportedTimeframe(String),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Only rate limiting and transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RateLimited => true,
            FetchError::Http(e) => !e.is_builder(),
            _ => false,
        }
    }
}

/// Source of closed OHLCV history, oldest first.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the most recent `limit` candles for a symbol
    async fn get_candles(&self, symbol: &str, limit: usize) -> Result<Vec<Candle>, FetchError>;
}
