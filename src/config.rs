//! Static configuration loaded once at process start.
//!
//! Engine parameters are plain values handed to [`SignalEngine`] at
//! construction; nothing here is mutated after [`Settings::from_env`] returns.
//!
//! [`SignalEngine`]: crate::signals::engine::SignalEngine

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BYBIT_URL: &str = "https://api.bybit.com";
pub const DEFAULT_SCHEDULE: &str = "0 0,15,30,45 * * * *";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },
}

/// Window lengths for the indicator battery.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub bb_length: usize,
    pub bb_std: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub volume_sma_period: usize,
    pub stoch_rsi_period: usize,
    pub stoch_rsi_k: usize,
    pub stoch_rsi_d: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            bb_length: 20,
            bb_std: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_fast: 9,
            ema_slow: 21,
            volume_sma_period: 20,
            stoch_rsi_period: 14,
            stoch_rsi_k: 3,
            stoch_rsi_d: 3,
        }
    }
}

impl IndicatorConfig {
    /// Every window length paired with its name, for validation and logging.
    pub fn periods(&self) -> [(&'static str, usize); 11] {
        [
            ("rsi_period", self.rsi_period),
            ("bb_length", self.bb_length),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("volume_sma_period", self.volume_sma_period),
            ("stoch_rsi_period", self.stoch_rsi_period),
            ("stoch_rsi_k", self.stoch_rsi_k),
            ("stoch_rsi_d", self.stoch_rsi_d),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, period) in self.periods() {
            if period == 0 {
                return Err(ConfigError::OutOfRange {
                    name,
                    reason: "window length must be at least 1".to_string(),
                });
            }
        }
        if self.bb_length < 2 {
            return Err(ConfigError::OutOfRange {
                name: "bb_length",
                reason: "sample deviation needs at least 2 values".to_string(),
            });
        }
        if !(self.bb_std.is_finite() && self.bb_std > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "bb_std",
                reason: format!("{} is not a positive multiplier", self.bb_std),
            });
        }
        Ok(())
    }
}

/// Rule thresholds shared by the scorer and the diagnostic report markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub stoch_oversold: f64,
    pub stoch_overbought: f64,
    pub volume_spike_multiplier: f64,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
            volume_spike_multiplier: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Points (out of 6) a side needs before a signal is emitted.
    pub min_confluence_score: u8,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub thresholds: ScoringThresholds,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_confluence_score: 3,
            stop_loss_pct: 0.015,
            take_profit_pct: 0.030,
            thresholds: ScoringThresholds::default(),
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_confluence_score > 6 {
            return Err(ConfigError::OutOfRange {
                name: "min_confluence_score",
                reason: format!("{} exceeds the 6 available points", self.min_confluence_score),
            });
        }
        for (name, pct) in [
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
        ] {
            if !(pct > 0.0 && pct < 1.0) {
                return Err(ConfigError::OutOfRange {
                    name,
                    reason: format!("{} must be a fraction in (0, 1)", pct),
                });
            }
        }
        Ok(())
    }
}

/// Everything the pure engine needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.signals.validate()
    }
}

/// Polling cadence and pacing for the market scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    pub tickers: Vec<String>,
    pub timeframe: String,
    pub candle_limit: usize,
    pub request_pacing: Duration,
    pub delivery_pacing: Duration,
    pub max_concurrent_fetches: usize,
    pub fetch_attempts: usize,
    pub retry_base_delay: Duration,
    pub schedule: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            timeframe: "15m".to_string(),
            candle_limit: 100,
            request_pacing: Duration::from_millis(500),
            delivery_pacing: Duration::from_millis(100),
            max_concurrent_fetches: 1,
            fetch_attempts: 3,
            retry_base_delay: Duration::from_secs(2),
            schedule: DEFAULT_SCHEDULE.to_string(),
        }
    }
}

pub fn default_tickers() -> Vec<String> {
    [
        "BTC/USDT", "ETH/USDT", "SOL/USDT", "XRP/USDT", "ADA/USDT", "AVAX/USDT", "DOGE/USDT",
        "DOT/USDT", "LINK/USDT", "MATIC/USDT", "MET/USDT", "TOWNS/USDT",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Chat bot, storage and HTTP wiring for the daemon.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub bot_token: Option<String>,
    pub admin_chat_id: Option<i64>,
    pub redis_url: Option<String>,
    pub http_port: u16,
    pub bybit_base_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_chat_id: None,
            redis_url: None,
            http_port: 8080,
            bybit_base_url: DEFAULT_BYBIT_URL.to_string(),
        }
    }
}

impl BotConfig {
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub engine: EngineConfig,
    pub scanner: ScannerConfig,
    pub bot: BotConfig,
}

impl Settings {
    /// Build settings from the process environment. Call `dotenvy::dotenv()` first
    /// if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        let ind = &mut settings.engine.indicators;
        override_with(&lookup, "RSI_PERIOD", &mut ind.rsi_period)?;
        override_with(&lookup, "BB_LENGTH", &mut ind.bb_length)?;
        override_with(&lookup, "BB_STD", &mut ind.bb_std)?;
        override_with(&lookup, "MACD_FAST", &mut ind.macd_fast)?;
        override_with(&lookup, "MACD_SLOW", &mut ind.macd_slow)?;
        override_with(&lookup, "MACD_SIGNAL", &mut ind.macd_signal)?;
        override_with(&lookup, "EMA_FAST", &mut ind.ema_fast)?;
        override_with(&lookup, "EMA_SLOW", &mut ind.ema_slow)?;
        override_with(&lookup, "VOLUME_SMA_PERIOD", &mut ind.volume_sma_period)?;
        override_with(&lookup, "STOCH_RSI_PERIOD", &mut ind.stoch_rsi_period)?;
        override_with(&lookup, "STOCH_RSI_K", &mut ind.stoch_rsi_k)?;
        override_with(&lookup, "STOCH_RSI_D", &mut ind.stoch_rsi_d)?;

        let sig = &mut settings.engine.signals;
        override_with(&lookup, "MIN_CONFLUENCE_SCORE", &mut sig.min_confluence_score)?;
        override_with(&lookup, "STOP_LOSS_PCT", &mut sig.stop_loss_pct)?;
        override_with(&lookup, "TAKE_PROFIT_PCT", &mut sig.take_profit_pct)?;

        let scan = &mut settings.scanner;
        if let Some(raw) = lookup("TICKERS") {
            let tickers: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if tickers.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "TICKERS".to_string(),
                    value: raw,
                });
            }
            scan.tickers = tickers;
        }
        if let Some(timeframe) = lookup("TIMEFRAME") {
            scan.timeframe = timeframe.trim().to_string();
        }
        if let Some(schedule) = lookup("SCAN_SCHEDULE") {
            scan.schedule = schedule.trim().to_string();
        }
        override_with(&lookup, "CANDLE_LIMIT", &mut scan.candle_limit)?;
        override_with(&lookup, "MAX_CONCURRENT_FETCHES", &mut scan.max_concurrent_fetches)?;
        override_with(&lookup, "FETCH_ATTEMPTS", &mut scan.fetch_attempts)?;
        override_millis(&lookup, "REQUEST_PACING_MS", &mut scan.request_pacing)?;
        override_millis(&lookup, "DELIVERY_PACING_MS", &mut scan.delivery_pacing)?;

        let bot = &mut settings.bot;
        bot.bot_token = lookup("BOT_TOKEN").filter(|t| !t.is_empty());
        bot.redis_url = lookup("REDIS_URL").filter(|u| !u.is_empty());
        if let Some(raw) = lookup("ADMIN_ID") {
            let id: i64 = parse_value("ADMIN_ID", &raw)?;
            bot.admin_chat_id = (id != 0).then_some(id);
        }
        override_with(&lookup, "PORT", &mut bot.http_port)?;
        if let Some(url) = lookup("BYBIT_BASE_URL") {
            bot.bybit_base_url = url.trim_end_matches('/').to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.scanner.max_concurrent_fetches == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_concurrent_fetches",
                reason: "at least one fetch must be allowed".to_string(),
            });
        }
        if self.scanner.fetch_attempts == 0 {
            return Err(ConfigError::OutOfRange {
                name: "fetch_attempts",
                reason: "at least one attempt is required".to_string(),
            });
        }
        if self.scanner.candle_limit < 2 {
            return Err(ConfigError::OutOfRange {
                name: "candle_limit",
                reason: "scoring needs a closed and a forming candle".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn override_with<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        *slot = parse_value(key, &raw)?;
    }
    Ok(())
}

fn override_millis<F>(lookup: &F, key: &str, slot: &mut Duration) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        *slot = Duration::from_millis(parse_value(key, &raw)?);
    }
    Ok(())
}

/// Deployment environment name (`sandbox` unless `ENVIRONMENT` says otherwise).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}
