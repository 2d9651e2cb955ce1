//! Persistent set of chat ids that receive signal digests.

use std::collections::BTreeSet;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

pub const SUBSCRIBERS_KEY: &str = "confluence:subscribers";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Add a chat id. Returns `false` when it was already subscribed.
    async fn add(&self, chat_id: i64) -> Result<bool, StoreError>;

    /// Remove a chat id. Returns `false` when it was not subscribed.
    async fn remove(&self, chat_id: i64) -> Result<bool, StoreError>;

    async fn list(&self) -> Result<Vec<i64>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }
}

/// Process-local store; subscriptions are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySubscriberStore {
    chats: RwLock<BTreeSet<i64>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn add(&self, chat_id: i64) -> Result<bool, StoreError> {
        Ok(self.chats.write().await.insert(chat_id))
    }

    async fn remove(&self, chat_id: i64) -> Result<bool, StoreError> {
        Ok(self.chats.write().await.remove(&chat_id))
    }

    async fn list(&self) -> Result<Vec<i64>, StoreError> {
        Ok(self.chats.read().await.iter().copied().collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.chats.read().await.len())
    }
}

/// Redis SET backed store, shared across restarts and replicas.
#[derive(Clone)]
pub struct RedisSubscriberStore {
    conn: ConnectionManager,
    key: String,
}

impl RedisSubscriberStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("RedisSubscriberStore: connected");
        Ok(Self {
            conn,
            key: SUBSCRIBERS_KEY.to_string(),
        })
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

#[async_trait]
impl SubscriberStore for RedisSubscriberStore {
    async fn add(&self, chat_id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let added: i64 = conn.sadd(&self.key, chat_id).await?;
        Ok(added > 0)
    }

    async fn remove(&self, chat_id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.srem(&self.key, chat_id).await?;
        Ok(removed > 0)
    }

    async fn list(&self) -> Result<Vec<i64>, StoreError> {
        let mut conn = self.conn.clone();
        let mut chats: Vec<i64> = conn.smembers(&self.key).await?;
        chats.sort_unstable();
        Ok(chats)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.scard(&self.key).await?)
    }
}
