//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{Candle, IndicatorRow, IndicatorSnapshot};
pub use signal::{ScoreResult, Signal, SignalDirection, SignalStrength};
