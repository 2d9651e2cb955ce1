//! Bybit REST client for kline history

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use super::messages::KlineResponse;
use crate::config::DEFAULT_BYBIT_URL;
use crate::models::indicators::Candle;
use crate::services::market_data::FetchError;

/// Per-request deadline, covering connect, headers and body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounded exponential backoff for retryable fetch failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: usize,
    /// Delay before the second attempt; doubles on each further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_factor(2.0)
            .with_max_times(self.attempts.saturating_sub(1))
    }
}

pub struct BybitRestClient {
    base_url: String,
    http: Client,
    retry: RetryPolicy,
}

impl BybitRestClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BYBIT_URL)
    }

    /// Client for `base_url` with the default [`REQUEST_TIMEOUT`].
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Client for `base_url` whose requests fail with a transport error once
    /// `timeout` elapses, so a stalled connection cannot hold up a scan.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the latest `limit` linear-perpetual klines, oldest first.
    ///
    /// Rate limiting (HTTP 429) and transport errors are retried with
    /// exponential backoff; everything else fails on the first attempt.
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, FetchError> {
        let url = &self.kline_url(symbol, timeframe, limit)?;

        (|| async move { self.fetch_once(url).await })
            .retry(self.retry.backoff())
            .when(FetchError::is_retryable)
            .notify(|err: &FetchError, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "BybitRestClient: fetch failed for {}, retrying in {:?}",
                    symbol,
                    delay
                );
            })
            .await
    }

    fn kline_url(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Url, FetchError> {
        let interval = bybit_interval(timeframe)?;
        let mut url = Url::parse(&self.base_url)?.join("/v5/market/kline")?;
        url.query_pairs_mut()
            .append_pair("category", "linear")
            .append_pair("symbol", &bybit_symbol(symbol))
            .append_pair("interval", &interval)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<Candle>, FetchError> {
        debug!(url = %url, "BybitRestClient: GET kline");
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: KlineResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        payload.into_candles()
    }
}

impl Default for BybitRestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// `BTC/USDT` -> `BTCUSDT`.
pub fn bybit_symbol(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

/// Map a ccxt-style timeframe to a Bybit kline interval:
/// minutes pass through, hours become minutes, `1d`/`1w`/`1M` become `D`/`W`/`M`.
pub fn bybit_interval(timeframe: &str) -> Result<String, FetchError> {
    let unsupported = || FetchError::UnsupportedTimeframe(timeframe.to_string());

    match timeframe {
        "1d" => return Ok("D".to_string()),
        "1w" => return Ok("W".to_string()),
        "1M" => return Ok("M".to_string()),
        _ => {}
    }

    let (split, _) = timeframe.char_indices().last().ok_or_else(unsupported)?;
    let (count, unit) = timeframe.split_at(split);
    let count: u32 = count.parse().map_err(|_| unsupported())?;
    if count == 0 {
        return Err(unsupported());
    }

    match unit {
        "m" => Ok(count.to_string()),
        "h" => Ok((count * 60).to_string()),
        _ => Err(unsupported()),
    }
}
