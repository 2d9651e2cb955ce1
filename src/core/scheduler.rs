//! Cron-based scheduler that runs one scan-and-notify cycle per tick

use crate::core::scanner::MarketScanner;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Convert a plain interval to a 6-field cron expression
/// (second minute hour day month weekday).
pub fn cron_for_interval(
    interval_seconds: u64,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    if interval_seconds == 0 {
        return Err("Scheduler disabled: interval_seconds is 0".into());
    }

    let expr = if interval_seconds >= 60 {
        format!("0 */{} * * * *", interval_seconds / 60)
    } else {
        format!("*/{} * * * * *", interval_seconds)
    };
    Ok(expr)
}

/// Scheduler that periodically runs a full market scan
pub struct ScanScheduler {
    scanner: Arc<MarketScanner>,
    schedule: Schedule,
    expression: String,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ScanScheduler {
    /// Create a scheduler from a cron expression, e.g. `0 0,15,30,45 * * * *`
    pub fn new(
        scanner: Arc<MarketScanner>,
        cron_expr: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            cron = %cron_expr,
            tickers = scanner.config().tickers.len(),
            "ScanScheduler: created with cron {}",
            cron_expr
        );

        Ok(Self {
            scanner,
            schedule,
            expression: cron_expr.to_string(),
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a scheduler firing every `interval_seconds`
    pub fn from_interval(
        scanner: Arc<MarketScanner>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let expr = cron_for_interval(interval_seconds)?;
        Self::new(scanner, &expr)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Next tick strictly after now, in UTC
    pub fn next_tick(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.schedule.upcoming(chrono::Utc).next()
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut slot = self.handle.write().await;
        if slot.is_some() {
            return Err("ScanScheduler is already running".into());
        }

        let scanner = self.scanner.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("ScanScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    error!("ScanScheduler: schedule has no upcoming ticks");
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!("ScanScheduler: cron tick, starting scan cycle");
                let (outcome, delivery) = scanner.scan_and_notify().await;
                info!(
                    signals = outcome.signals.len(),
                    failures = outcome.failures.len(),
                    delivered = delivery.delivered,
                    "ScanScheduler: cycle done"
                );
            }
        });

        *slot = Some(handle);
        info!("ScanScheduler: started successfully");
        Ok(())
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ScanScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
