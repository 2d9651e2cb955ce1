//! Bybit v5 public market data (USDT-linear perpetuals).

pub mod client;
pub mod messages;
pub mod provider;

pub use client::{bybit_interval, bybit_symbol, BybitRestClient, RetryPolicy};
pub use provider::BybitMarketDataProvider;
