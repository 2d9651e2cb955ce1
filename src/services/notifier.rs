//! Outbound message delivery.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("delivery rejected ({code}): {description}")]
    Rejected { code: i64, description: String },
    #[error("malformed bot api response: {0}")]
    Decode(String),
}

/// A channel that can deliver a text message to one chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), NotifyError>;
}
