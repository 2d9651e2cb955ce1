//! External collaborators: market data, subscriber persistence and chat delivery.

pub mod bybit;
pub mod market_data;
pub mod notifier;
pub mod subscribers;
pub mod telegram;

pub use bybit::{BybitMarketDataProvider, BybitRestClient};
pub use market_data::{FetchError, MarketDataProvider};
pub use notifier::{Notifier, NotifyError};
pub use subscribers::{InMemorySubscriberStore, RedisSubscriberStore, StoreError, SubscriberStore};
pub use telegram::{CommandHandler, CommandPoller, TelegramClient};
