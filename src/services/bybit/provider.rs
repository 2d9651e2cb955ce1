//! Bybit-backed market data provider bound to one timeframe

use std::sync::Arc;

use async_trait::async_trait;

use super::client::BybitRestClient;
use crate::models::indicators::Candle;
use crate::services::market_data::{FetchError, MarketDataProvider};

pub struct BybitMarketDataProvider {
    client: Arc<BybitRestClient>,
    timeframe: String,
}

impl BybitMarketDataProvider {
    pub fn new(client: Arc<BybitRestClient>, timeframe: impl Into<String>) -> Self {
        Self {
            client,
            timeframe: timeframe.into(),
        }
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn client(&self) -> &Arc<BybitRestClient> {
        &self.client
    }
}

#[async_trait]
impl MarketDataProvider for BybitMarketDataProvider {
    async fn get_candles(&self, symbol: &str, limit: usize) -> Result<Vec<Candle>, FetchError> {
        self.client.fetch_klines(symbol, &self.timeframe, limit).await
    }
}
