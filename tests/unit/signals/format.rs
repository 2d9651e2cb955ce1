//! Unit tests for signal and diagnostic formatting

use confluence_signals::config::SignalConfig;
use confluence_signals::models::indicators::{Candle, IndicatorRow};
use confluence_signals::models::signal::{ScoreResult, Signal, SignalDirection, SignalStrength};
use confluence_signals::signals::format::{
    band_marker, escape_markdown, format_digest, format_signal, render_diagnostic,
    render_unavailable, rsi_marker, volume_marker, Marker, DIGEST_HEADER,
};

fn long_signal() -> Signal {
    Signal {
        symbol: "BTC/USDT".to_string(),
        side: SignalDirection::Long,
        score: 4,
        strength: SignalStrength::Strong,
        entry_price: 163.0,
        stop_loss: 163.0 * 0.985,
        take_profit: 163.0 * 1.03,
        reasons: vec!["RSI=0.0 (<30)".to_string(), "volume spike".to_string()],
        candle_timestamp: 0,
    }
}

fn short_signal() -> Signal {
    Signal {
        symbol: "ETH/USDT".to_string(),
        side: SignalDirection::Short,
        score: 5,
        strength: SignalStrength::Powerful,
        entry_price: 2000.5,
        stop_loss: 2030.5075,
        take_profit: 1940.485,
        reasons: vec!["MACD bearish".to_string()],
        candle_timestamp: 0,
    }
}

#[test]
fn test_strength_grades() {
    assert_eq!(SignalStrength::from_score(6), SignalStrength::Powerful);
    assert_eq!(SignalStrength::from_score(5), SignalStrength::Powerful);
    assert_eq!(SignalStrength::from_score(4), SignalStrength::Strong);
    assert_eq!(SignalStrength::from_score(3), SignalStrength::Moderate);
    assert_eq!(SignalStrength::from_score(2), SignalStrength::Weak);
    assert_eq!(SignalStrength::from_score(0), SignalStrength::Weak);
}

#[test]
fn test_format_long_signal() {
    let text = format_signal(&long_signal());
    assert_eq!(
        text,
        "🟢 *LONG: BTC/USDT* 💪 strong (4/6)\n\
         Entry: `163.0`\n\
         🎯 TP: `167.8900` | 🛡 SL: `160.5550`\n\
         📊 _RSI=0.0 (<30) | volume spike_"
    );
}

#[test]
fn test_format_short_signal() {
    let text = format_signal(&short_signal());
    assert!(text.starts_with("🔴 *SHORT: ETH/USDT* 🔥 powerful (5/6)"));
    assert!(text.contains("Entry: `2000.5`"));
    assert!(text.contains("TP: `1940.4850`"));
    assert!(text.contains("SL: `2030.5075`"));
}

#[test]
fn test_digest_joins_signals() {
    let digest = format_digest(&[long_signal(), short_signal()]);
    assert!(digest.starts_with(DIGEST_HEADER));
    let blocks: Vec<&str> = digest.split("\n\n").collect();
    assert_eq!(blocks.len(), 3);
    assert!(blocks[1].contains("BTC/USDT"));
    assert!(blocks[2].contains("ETH/USDT"));
}

fn sample_row() -> IndicatorRow {
    IndicatorRow {
        rsi: Some(75.0),
        bb_lower: Some(90.0),
        bb_mid: Some(95.0),
        bb_upper: Some(99.0),
        macd_line: Some(-0.2),
        macd_signal: Some(0.1),
        macd_hist: Some(-0.3),
        ema_fast: Some(98.0),
        ema_slow: Some(97.0),
        vol_sma: Some(1000.0),
        stoch_rsi_k: Some(50.0),
        stoch_rsi_d: None,
        ..IndicatorRow::bare(Candle::new(0, 100.0, 101.0, 99.0, 100.0, 1500.0))
    }
}

#[test]
fn test_markers() {
    let config = SignalConfig::default();
    let row = sample_row();
    assert_eq!(rsi_marker(row.rsi, &config), Marker::Bearish);
    assert_eq!(rsi_marker(Some(25.0), &config), Marker::Bullish);
    assert_eq!(rsi_marker(None, &config), Marker::Neutral);
    assert_eq!(band_marker(&row), Marker::Bearish);
    assert_eq!(volume_marker(&row, &config), Marker::Spike);
}

#[test]
fn test_diagnostic_lists_every_indicator() {
    let config = SignalConfig::default();
    let row = sample_row();
    let long = ScoreResult {
        score: 2,
        reasons: vec![],
        side: SignalDirection::Long,
    };
    let short = ScoreResult {
        score: 4,
        reasons: vec![],
        side: SignalDirection::Short,
    };
    let report = render_diagnostic("SOL/USDT", &row, Some(&(long, short)), None, &config);

    assert!(report.contains("*SOL/USDT*"));
    assert!(report.contains("🔴 RSI: 75.0"));
    assert!(report.contains("BB: 90.0000 / 95.0000 / 99.0000"));
    assert!(report.contains("🔴 MACD"));
    assert!(report.contains("🟢 EMA"));
    assert!(report.contains("⚡ Volume"));
    assert!(report.contains("%D n/a"));
    assert!(report.contains("LONG 2/6 | 📉 SHORT 4/6"));
    assert!(report.contains("no signal"));
}

#[test]
fn test_diagnostic_includes_signal_block() {
    let config = SignalConfig::default();
    let signal = long_signal();
    let report = render_diagnostic("BTC/USDT", &sample_row(), None, Some(&signal), &config);
    assert!(report.contains(&format_signal(&signal)));
}

#[test]
fn test_whole_number_prices_keep_decimal_point() {
    let text = format_signal(&long_signal());
    assert!(text.contains("Entry: `163.0`"));

    let config = SignalConfig::default();
    let report = render_diagnostic("SOL/USDT", &sample_row(), None, None, &config);
    assert!(report.contains("close `100.0`"));
}

#[test]
fn test_escape_markdown() {
    assert_eq!(escape_markdown("BTC/USDT"), "BTC/USDT");
    assert_eq!(escape_markdown("FOO_BAR"), "FOO\\_BAR");
    assert_eq!(escape_markdown("a*b[c`d"), "a\\*b\\[c\\`d");
}

#[test]
fn test_user_text_is_escaped_in_messages() {
    let report = render_unavailable("FOO_BAR", "bad *payload*");
    assert_eq!(report, "⚠️ *FOO\\_BAR*: no data (bad \\*payload\\*)");

    let mut signal = long_signal();
    signal.symbol = "1000_PEPE/USDT".to_string();
    assert!(format_signal(&signal).contains("*LONG: 1000\\_PEPE/USDT*"));
}
