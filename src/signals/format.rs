//! Text rendering for signals and per-instrument diagnostics.
//!
//! Output targets Telegram's legacy Markdown: `*bold*`, `_italic_` and
//! `` `code` `` spans.

use crate::config::SignalConfig;
use crate::indicators::trend::ema_cross_direction;
use crate::models::indicators::IndicatorRow;
use crate::models::signal::{ScoreResult, Signal};
use crate::signals::scoring::MAX_SCORE;

pub const DIGEST_HEADER: &str = "⚡️ *New trading signals:*";

/// Backslash-escape the characters legacy Markdown treats as entity
/// delimiters, so user or exchange supplied text cannot break a message.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '[' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Directional reading of a single indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Bullish,
    Bearish,
    Neutral,
    /// Confirms whichever side is active (volume).
    Spike,
}

impl Marker {
    pub fn icon(&self) -> &'static str {
        match self {
            Marker::Bullish => "🟢",
            Marker::Bearish => "🔴",
            Marker::Neutral => "⚪",
            Marker::Spike => "⚡",
        }
    }

    fn from_sides(bullish: bool, bearish: bool) -> Self {
        match (bullish, bearish) {
            (true, false) => Marker::Bullish,
            (false, true) => Marker::Bearish,
            _ => Marker::Neutral,
        }
    }
}

/// Render one signal as a fixed multi-line block.
pub fn format_signal(signal: &Signal) -> String {
    format!(
        "{} *{}: {}* {} {} ({}/{})\nEntry: `{:?}`\n🎯 TP: `{:.4}` | 🛡 SL: `{:.4}`\n📊 _{}_",
        signal.side.icon(),
        signal.side,
        escape_markdown(&signal.symbol),
        signal.strength.icon(),
        signal.strength,
        signal.score,
        MAX_SCORE,
        signal.entry_price,
        signal.take_profit,
        signal.stop_loss,
        signal.reasons.join(" | "),
    )
}

/// Combine all signals of one scan into a single broadcast message.
pub fn format_digest(signals: &[Signal]) -> String {
    let blocks: Vec<String> = signals.iter().map(format_signal).collect();
    format!("{}\n\n{}", DIGEST_HEADER, blocks.join("\n\n"))
}

pub fn render_unavailable(symbol: &str, reason: &str) -> String {
    format!(
        "⚠️ *{}*: no data ({})",
        escape_markdown(symbol),
        escape_markdown(reason)
    )
}

pub fn rsi_marker(rsi: Option<f64>, config: &SignalConfig) -> Marker {
    let t = &config.thresholds;
    match rsi {
        Some(v) => Marker::from_sides(v < t.rsi_oversold, v > t.rsi_overbought),
        None => Marker::Neutral,
    }
}

pub fn band_marker(row: &IndicatorRow) -> Marker {
    match (row.bb_lower, row.bb_upper) {
        (Some(lower), Some(upper)) => Marker::from_sides(row.close() < lower, row.close() > upper),
        _ => Marker::Neutral,
    }
}

pub fn macd_marker(row: &IndicatorRow) -> Marker {
    let hist = row.macd_hist.unwrap_or_default();
    let (bull_cross, bear_cross) = match (row.macd_line, row.macd_signal) {
        (Some(line), Some(signal)) => (line > signal, line < signal),
        _ => (false, false),
    };
    Marker::from_sides(hist > 0.0 || bull_cross, hist < 0.0 || bear_cross)
}

pub fn ema_marker(row: &IndicatorRow) -> Marker {
    match (row.ema_fast, row.ema_slow) {
        (Some(fast), Some(slow)) => match ema_cross_direction(fast, slow) {
            1 => Marker::Bullish,
            -1 => Marker::Bearish,
            _ => Marker::Neutral,
        },
        _ => Marker::Neutral,
    }
}

pub fn volume_marker(row: &IndicatorRow, config: &SignalConfig) -> Marker {
    match row.vol_sma {
        Some(avg) if row.volume() > avg * config.thresholds.volume_spike_multiplier => Marker::Spike,
        _ => Marker::Neutral,
    }
}

pub fn stoch_marker(k: Option<f64>, config: &SignalConfig) -> Marker {
    let t = &config.thresholds;
    match k {
        Some(v) => Marker::from_sides(v < t.stoch_oversold, v > t.stoch_overbought),
        None => Marker::Neutral,
    }
}

fn value(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

/// Render the diagnostic report for the closed `row`.
///
/// `scores` carries the (LONG, SHORT) results when the row was scoreable.
pub fn render_diagnostic(
    symbol: &str,
    row: &IndicatorRow,
    scores: Option<&(ScoreResult, ScoreResult)>,
    signal: Option<&Signal>,
    config: &SignalConfig,
) -> String {
    let mut lines = vec![format!(
        "🔍 *{}* | close `{:?}`",
        escape_markdown(symbol),
        row.close()
    )];

    lines.push(format!(
        "{} RSI: {}",
        rsi_marker(row.rsi, config).icon(),
        value(row.rsi, 1)
    ));
    lines.push(format!(
        "{} BB: {} / {} / {}",
        band_marker(row).icon(),
        value(row.bb_lower, 4),
        value(row.bb_mid, 4),
        value(row.bb_upper, 4)
    ));
    lines.push(format!(
        "{} MACD: hist {} (line {}, signal {})",
        macd_marker(row).icon(),
        value(row.macd_hist, 4),
        value(row.macd_line, 4),
        value(row.macd_signal, 4)
    ));
    lines.push(format!(
        "{} EMA: fast {} / slow {}",
        ema_marker(row).icon(),
        value(row.ema_fast, 4),
        value(row.ema_slow, 4)
    ));
    let ratio = row.vol_sma.filter(|avg| *avg > 0.0).map(|avg| row.volume() / avg);
    lines.push(format!(
        "{} Volume: {} (SMA {}, x{})",
        volume_marker(row, config).icon(),
        row.volume(),
        value(row.vol_sma, 2),
        value(ratio, 2)
    ));
    lines.push(format!(
        "{} StochRSI: %K {} / %D {}",
        stoch_marker(row.stoch_rsi_k, config).icon(),
        value(row.stoch_rsi_k, 0),
        value(row.stoch_rsi_d, 0)
    ));

    match scores {
        Some((long, short)) => lines.push(format!(
            "📈 LONG {}/{} | 📉 SHORT {}/{}",
            long.score, MAX_SCORE, short.score, MAX_SCORE
        )),
        None => lines.push("⚠️ not enough history to score".to_string()),
    }

    match signal {
        Some(signal) => lines.push(format_signal(signal)),
        None => lines.push(format!(
            "⚪ no signal (needs {}/{})",
            config.min_confluence_score, MAX_SCORE
        )),
    }

    lines.join("\n")
}
