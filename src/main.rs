//! One-shot scan: fetch live candles, print the diagnostic report for every
//! instrument and list the signals that qualify right now.
//!
//! Usage: `confluence [SYMBOL ...]` (defaults to the configured tickers).

use std::sync::Arc;

use confluence_signals::config::Settings;
use confluence_signals::logging;
use confluence_signals::services::bybit::{BybitMarketDataProvider, BybitRestClient, RetryPolicy};
use confluence_signals::services::MarketDataProvider;
use confluence_signals::signals::{format_digest, SignalEngine};
use dotenvy::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let settings = Settings::from_env()?;
    let symbols: Vec<String> = {
        let args: Vec<String> = std::env::args().skip(1).map(|s| s.to_uppercase()).collect();
        if args.is_empty() {
            settings.scanner.tickers.clone()
        } else {
            args
        }
    };

    let client = BybitRestClient::with_base_url(settings.bot.bybit_base_url.clone())
        .with_retry(RetryPolicy {
            attempts: settings.scanner.fetch_attempts,
            base_delay: settings.scanner.retry_base_delay,
        });
    let provider = BybitMarketDataProvider::new(Arc::new(client), settings.scanner.timeframe.clone());
    let engine = SignalEngine::new(settings.engine.clone());

    info!(
        symbols = symbols.len(),
        timeframe = %settings.scanner.timeframe,
        "Running one-shot scan over {} symbols",
        symbols.len()
    );

    let mut signals = Vec::new();
    for symbol in &symbols {
        match provider.get_candles(symbol, settings.scanner.candle_limit).await {
            Ok(candles) => {
                println!("{}\n", engine.build_report(symbol, &candles));
                match engine.evaluate_candles(symbol, &candles) {
                    Ok(Some(signal)) => signals.push(signal),
                    Ok(None) => {}
                    Err(e) => warn!(symbol = %symbol, error = %e, "Skipping {}", symbol),
                }
            }
            Err(e) => warn!(symbol = %symbol, error = %e, "Failed to fetch {}", symbol),
        }
        tokio::time::sleep(settings.scanner.request_pacing).await;
    }

    if signals.is_empty() {
        println!("No signals this cycle.");
    } else {
        println!("{}", format_digest(&signals));
    }

    Ok(())
}
