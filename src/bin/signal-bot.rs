//! Confluence Signal Bot
//!
//! Long-running daemon: scans the configured tickers on a cron cadence,
//! broadcasts signal digests to Telegram subscribers, answers chat commands
//! and serves health/metrics/report endpoints over HTTP.

use confluence_signals::config::Settings;
use confluence_signals::core::http::{start_server, AppState};
use confluence_signals::core::scanner::MarketScanner;
use confluence_signals::core::scheduler::ScanScheduler;
use confluence_signals::logging;
use confluence_signals::metrics::Metrics;
use confluence_signals::services::bybit::{BybitMarketDataProvider, BybitRestClient, RetryPolicy};
use confluence_signals::services::telegram::{CommandHandler, CommandPoller, TelegramClient};
use confluence_signals::services::{
    InMemorySubscriberStore, Notifier, RedisSubscriberStore, SubscriberStore,
};
use confluence_signals::signals::SignalEngine;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let settings = Settings::from_env()?;
    let token = settings.bot.require_token()?.to_string();

    let env = confluence_signals::config::get_environment();
    info!("Starting Confluence Signal Bot");
    info!(environment = %env, "Environment");
    info!(
        tickers = settings.scanner.tickers.len(),
        timeframe = %settings.scanner.timeframe,
        schedule = %settings.scanner.schedule,
        "Scanning {} tickers on {} candles",
        settings.scanner.tickers.len(),
        settings.scanner.timeframe
    );

    let metrics = Arc::new(Metrics::new()?);

    // Subscriber store: Redis when configured, otherwise process-local
    let store: Arc<dyn SubscriberStore> = match settings.bot.redis_url.as_deref() {
        Some(url) => match RedisSubscriberStore::connect(url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %e, "Failed to connect to Redis - subscriptions will not survive restarts");
                Arc::new(InMemorySubscriberStore::new())
            }
        },
        None => {
            info!("REDIS_URL not set, using in-memory subscriber store");
            Arc::new(InMemorySubscriberStore::new())
        }
    };

    let telegram = Arc::new(TelegramClient::new(token));
    let bybit = BybitRestClient::with_base_url(settings.bot.bybit_base_url.clone())
        .with_retry(RetryPolicy {
            attempts: settings.scanner.fetch_attempts,
            base_delay: settings.scanner.retry_base_delay,
        });
    let provider = Arc::new(BybitMarketDataProvider::new(
        Arc::new(bybit),
        settings.scanner.timeframe.clone(),
    ));

    let scanner = Arc::new(MarketScanner::new(
        provider,
        SignalEngine::new(settings.engine.clone()),
        settings.scanner.clone(),
        store.clone(),
        telegram.clone(),
        metrics.clone(),
    ));

    // The admin is always subscribed and told the bot is up
    if let Some(admin) = settings.bot.admin_chat_id {
        if let Err(e) = store.add(admin).await {
            error!(error = %e, "Failed to subscribe admin chat");
        }
        let text = format!(
            "✅ Signal bot started.\nInterval: *{}*.",
            settings.scanner.timeframe
        );
        if let Err(e) = telegram.send(admin, &text).await {
            error!(error = %e, "Failed to send startup message to admin");
        }
    }
    scanner.refresh_subscriber_gauge().await;

    let scheduler = ScanScheduler::new(scanner.clone(), &settings.scanner.schedule)
        .map_err(|e| e.to_string())?;
    scheduler.start().await.map_err(|e| e.to_string())?;
    if let Some(next) = scheduler.next_tick() {
        info!(next_tick = %next, "First scan scheduled at {}", next);
    }

    let poller = CommandPoller::new(
        telegram.clone(),
        CommandHandler::new(store.clone(), scanner.clone()),
    );
    let poller_handle = tokio::spawn(async move { poller.run().await });

    let port = settings.bot.http_port;
    let state = AppState::new(metrics.clone(), Some(scanner.clone()));
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    // Graceful shutdown
    info!("Signal bot started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down signal bot...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    scheduler.stop().await;
    poller_handle.abort();
    info!("Signal bot stopped");

    Ok(())
}
