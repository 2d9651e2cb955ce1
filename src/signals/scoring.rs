//! Confluence scoring: each satisfied rule is worth exactly one point.

use crate::config::{ScoringThresholds, SignalConfig};
use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::{ScoreResult, SignalDirection};

/// Highest score a side can reach.
pub const MAX_SCORE: u8 = 6;

/// The six rule families, in reason order. Each has a LONG form and a
/// mirrored SHORT form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    RsiExtreme,
    BandBreak,
    MacdMomentum,
    EmaTrend,
    VolumeSpike,
    StochRsiExtreme,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::RsiExtreme,
        Condition::BandBreak,
        Condition::MacdMomentum,
        Condition::EmaTrend,
        Condition::VolumeSpike,
        Condition::StochRsiExtreme,
    ];

    /// Whether the condition holds for `side` on this snapshot.
    pub fn holds(
        self,
        side: SignalDirection,
        s: &IndicatorSnapshot,
        t: &ScoringThresholds,
    ) -> bool {
        use Condition::*;
        use SignalDirection::{Long, Short};

        match (self, side) {
            (_, SignalDirection::None) => false,
            (RsiExtreme, Long) => s.rsi < t.rsi_oversold,
            (RsiExtreme, Short) => s.rsi > t.rsi_overbought,
            (BandBreak, Long) => s.close < s.bb_lower,
            (BandBreak, Short) => s.close > s.bb_upper,
            (MacdMomentum, Long) => s.macd_hist > 0.0 || greater(s.macd_line, s.macd_signal),
            (MacdMomentum, Short) => s.macd_hist < 0.0 || greater(s.macd_signal, s.macd_line),
            (EmaTrend, Long) => s.ema_fast > s.ema_slow,
            (EmaTrend, Short) => s.ema_fast < s.ema_slow,
            (VolumeSpike, _) => s.volume > s.vol_sma * t.volume_spike_multiplier,
            (StochRsiExtreme, Long) => s.stoch_rsi_k.is_some_and(|k| k < t.stoch_oversold),
            (StochRsiExtreme, Short) => s.stoch_rsi_k.is_some_and(|k| k > t.stoch_overbought),
        }
    }

    /// Reason text reported when the condition holds.
    pub fn reason(self, side: SignalDirection, s: &IndicatorSnapshot, t: &ScoringThresholds) -> String {
        use Condition::*;

        let long = side == SignalDirection::Long;
        match self {
            RsiExtreme if long => format!("RSI={:.1} (<{})", s.rsi, t.rsi_oversold),
            RsiExtreme => format!("RSI={:.1} (>{})", s.rsi, t.rsi_overbought),
            BandBreak if long => "price below BB lower band".to_string(),
            BandBreak => "price above BB upper band".to_string(),
            MacdMomentum if long => "MACD bullish".to_string(),
            MacdMomentum => "MACD bearish".to_string(),
            EmaTrend if long => "EMA fast > EMA slow".to_string(),
            EmaTrend => "EMA fast < EMA slow".to_string(),
            VolumeSpike => "volume spike".to_string(),
            StochRsiExtreme if long => {
                format!("StochRSI={:.0} (<{})", s.stoch_rsi_k.unwrap_or_default(), t.stoch_oversold)
            }
            StochRsiExtreme => {
                format!("StochRSI={:.0} (>{})", s.stoch_rsi_k.unwrap_or_default(), t.stoch_overbought)
            }
        }
    }
}

fn greater(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// Score one side of a snapshot. The result's `side` is always `side`,
/// whatever the score.
pub fn score_side(
    side: SignalDirection,
    snapshot: &IndicatorSnapshot,
    thresholds: &ScoringThresholds,
) -> ScoreResult {
    let mut score = 0;
    let mut reasons = Vec::new();

    for condition in Condition::ALL {
        if condition.holds(side, snapshot, thresholds) {
            score += 1;
            reasons.push(condition.reason(side, snapshot, thresholds));
        }
    }

    ScoreResult {
        score,
        reasons,
        side,
    }
}

/// Apply the decision policy: LONG is checked first and wins outright when it
/// reaches the threshold; SHORT is only considered otherwise.
pub fn decide(snapshot: &IndicatorSnapshot, config: &SignalConfig) -> ScoreResult {
    let long = score_side(SignalDirection::Long, snapshot, &config.thresholds);
    if long.score >= config.min_confluence_score {
        return long;
    }

    let short = score_side(SignalDirection::Short, snapshot, &config.thresholds);
    if short.score >= config.min_confluence_score {
        return short;
    }

    ScoreResult::none()
}

/// Stop-loss and take-profit levels `(stop_loss, take_profit)` around `entry`.
pub fn exit_levels(side: SignalDirection, entry: f64, config: &SignalConfig) -> Option<(f64, f64)> {
    match side {
        SignalDirection::Long => Some((
            entry * (1.0 - config.stop_loss_pct),
            entry * (1.0 + config.take_profit_pct),
        )),
        SignalDirection::Short => Some((
            entry * (1.0 + config.stop_loss_pct),
            entry * (1.0 - config.take_profit_pct),
        )),
        SignalDirection::None => None,
    }
}
