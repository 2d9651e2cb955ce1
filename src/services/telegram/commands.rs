//! Chat command surface: subscription management and on-demand reports.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::client::TelegramClient;
use super::messages::Update;
use crate::core::scanner::MarketScanner;
use crate::services::subscribers::SubscriberStore;
use crate::signals::format::escape_markdown;

pub const HELP_TEXT: &str = "🤖 *Confluence signal bot*\n\
/start - subscribe to signal digests\n\
/stop - unsubscribe\n\
/status - bot status and subscriber count\n\
/check SYMBOL - indicator report for one instrument (e.g. /check BTC/USDT)\n\
/help - this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Status,
    Check(Option<String>),
    Help,
}

impl Command {
    /// Parse a chat message. Non-command text and unknown commands yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        // Group chats address commands as `/start@BotName`.
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        match name.as_str() {
            "start" => Some(Command::Start),
            "stop" => Some(Command::Stop),
            "status" => Some(Command::Status),
            "check" => Some(Command::Check(parts.next().map(|s| s.to_uppercase()))),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// Executes commands against the subscriber store and the scanner.
pub struct CommandHandler {
    store: Arc<dyn SubscriberStore>,
    scanner: Arc<MarketScanner>,
}

impl CommandHandler {
    pub fn new(store: Arc<dyn SubscriberStore>, scanner: Arc<MarketScanner>) -> Self {
        Self { store, scanner }
    }

    /// Produce the reply text for `command` issued from `chat_id`.
    pub async fn handle(&self, chat_id: i64, command: Command) -> String {
        match command {
            Command::Start => match self.store.add(chat_id).await {
                Ok(true) => {
                    info!(chat_id = chat_id, "CommandHandler: new subscriber {}", chat_id);
                    self.scanner.refresh_subscriber_gauge().await;
                    "✅ You are subscribed to trading signals!".to_string()
                }
                Ok(false) => "⚠️ You are already subscribed.".to_string(),
                Err(e) => {
                    error!(chat_id = chat_id, error = %e, "CommandHandler: failed to subscribe");
                    "⚠️ Subscription failed, please try again later.".to_string()
                }
            },
            Command::Stop => match self.store.remove(chat_id).await {
                Ok(removed) => {
                    if removed {
                        info!(chat_id = chat_id, "CommandHandler: chat {} unsubscribed", chat_id);
                        self.scanner.refresh_subscriber_gauge().await;
                    }
                    "❌ You are unsubscribed from trading signals.".to_string()
                }
                Err(e) => {
                    error!(chat_id = chat_id, error = %e, "CommandHandler: failed to unsubscribe");
                    "⚠️ Unsubscribe failed, please try again later.".to_string()
                }
            },
            Command::Status => match self.store.count().await {
                Ok(count) => format!("🤖 Bot is running.\n📈 Current subscribers: {}", count),
                Err(e) => {
                    error!(error = %e, "CommandHandler: failed to count subscribers");
                    "🤖 Bot is running.\n📈 Subscriber count unavailable.".to_string()
                }
            },
            Command::Check(None) => "Usage: /check BTC/USDT".to_string(),
            Command::Check(Some(symbol)) => match self.scanner.inspect(&symbol).await {
                Ok(report) => report,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "CommandHandler: report failed for {}", symbol);
                    format!(
                        "⚠️ Could not load data for {}: {}",
                        escape_markdown(&symbol),
                        escape_markdown(&e.to_string())
                    )
                }
            },
            Command::Help => HELP_TEXT.to_string(),
        }
    }
}

/// Long-polls the Bot API for commands and replies to them.
pub struct CommandPoller {
    client: Arc<TelegramClient>,
    handler: CommandHandler,
    poll_timeout_secs: u64,
    error_pause: Duration,
}

impl CommandPoller {
    pub fn new(client: Arc<TelegramClient>, handler: CommandHandler) -> Self {
        Self {
            client,
            handler,
            poll_timeout_secs: 30,
            error_pause: Duration::from_secs(5),
        }
    }

    pub fn with_timing(mut self, poll_timeout_secs: u64, error_pause: Duration) -> Self {
        self.poll_timeout_secs = poll_timeout_secs;
        self.error_pause = error_pause;
        self
    }

    /// Poll forever. Errors are logged and polling resumes after a pause.
    pub async fn run(&self) {
        info!("CommandPoller: started");
        let mut offset = 0;
        loop {
            match self.poll_once(offset).await {
                Ok(next) => offset = next,
                Err(e) => {
                    error!(error = %e, "CommandPoller: getUpdates failed");
                    tokio::time::sleep(self.error_pause).await;
                }
            }
        }
    }

    /// Fetch one batch of updates, answer every command in it and return the
    /// offset that acknowledges the whole batch.
    pub async fn poll_once(&self, offset: i64) -> Result<i64, crate::services::notifier::NotifyError> {
        let updates = self.client.get_updates(offset, self.poll_timeout_secs).await?;

        let mut next = offset;
        for update in updates {
            next = next.max(update.update_id + 1);
            self.dispatch(update).await;
        }
        Ok(next)
    }

    async fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(command) = message.text.as_deref().and_then(Command::parse) else {
            return;
        };

        let chat_id = message.chat.id;
        debug!(chat_id = chat_id, command = ?command, "CommandPoller: dispatching command");
        let reply = self.handler.handle(chat_id, command).await;
        if let Err(e) = self.client.send_message(chat_id, &reply).await {
            warn!(chat_id = chat_id, error = %e, "CommandPoller: failed to reply to {}", chat_id);
        }
    }
}
