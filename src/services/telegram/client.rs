//! Minimal Telegram Bot API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::messages::{ApiResponse, GetUpdatesRequest, SendMessageRequest, Update};
use crate::services::notifier::{Notifier, NotifyError};

pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

pub struct TelegramClient {
    base_url: String,
    token: String,
    http: Client,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_client(DEFAULT_TELEGRAM_URL, token, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, NotifyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        // Bot API errors come back as JSON with a 4xx status, so parse either way.
        let text = response.text().await?;
        let parsed: ApiResponse<T> =
            serde_json::from_str(&text).map_err(|e| NotifyError::Decode(e.to_string()))?;

        if !parsed.ok {
            return Err(NotifyError::Rejected {
                code: parsed.error_code.unwrap_or_default(),
                description: parsed.description.unwrap_or_default(),
            });
        }

        parsed
            .result
            .ok_or_else(|| NotifyError::Decode(format!("{}: missing result", method)))
    }

    /// Send a Markdown-formatted message to one chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "Markdown",
        };
        let _: serde_json::Value = self
            .call("sendMessage", &request, Duration::from_secs(10))
            .await?;
        debug!(chat_id = chat_id, "TelegramClient: message delivered");
        Ok(())
    }

    /// Long-poll for updates with id >= `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, NotifyError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };
        // Leave headroom over the server-side long-poll timeout.
        let timeout = Duration::from_secs(timeout_secs + 10);
        self.call("getUpdates", &request, timeout).await
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        self.send_message(chat_id, text).await
    }
}
