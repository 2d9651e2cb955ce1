use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Long,
    Short,
    None,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Long => "LONG",
            SignalDirection::Short => "SHORT",
            SignalDirection::None => "NONE",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SignalDirection::Long => "🟢",
            SignalDirection::Short => "🔴",
            SignalDirection::None => "⚪",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable grade of a confluence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
    Powerful,
}

impl SignalStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 5 => SignalStrength::Powerful,
            4 => SignalStrength::Strong,
            3 => SignalStrength::Moderate,
            _ => SignalStrength::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalStrength::Weak => "weak",
            SignalStrength::Moderate => "moderate",
            SignalStrength::Strong => "strong",
            SignalStrength::Powerful => "powerful",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SignalStrength::Weak => "⚠️",
            SignalStrength::Moderate => "👍",
            SignalStrength::Strong => "💪",
            SignalStrength::Powerful => "🔥",
        }
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of scoring one closed row for one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub reasons: Vec<String>,
    pub side: SignalDirection,
}

impl ScoreResult {
    pub fn none() -> Self {
        Self {
            score: 0,
            reasons: Vec::new(),
            side: SignalDirection::None,
        }
    }

    pub fn is_signal(&self) -> bool {
        self.side != SignalDirection::None
    }
}

/// A qualifying LONG or SHORT call on the last closed candle of an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub side: SignalDirection,
    pub score: u8,
    pub strength: SignalStrength,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub reasons: Vec<String>,
    /// Open time (epoch ms) of the evaluated candle.
    pub candle_timestamp: i64,
}
