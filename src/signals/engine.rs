//! Main signal evaluation engine: indicator battery plus confluence scorer.

use crate::config::{EngineConfig, SignalConfig};
use crate::indicators::{IndicatorBattery, IndicatorError};
use crate::models::indicators::{Candle, IndicatorRow};
use crate::models::signal::{ScoreResult, Signal, SignalDirection, SignalStrength};
use crate::signals::format;
use crate::signals::scoring;

/// Rows needed before anything can be scored: one closed candle plus the
/// still-forming one.
pub const MIN_ROWS: usize = 2;

/// Pure, stateless evaluator configured once at construction.
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    battery: IndicatorBattery,
    signals: SignalConfig,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            battery: IndicatorBattery::new(config.indicators),
            signals: config.signals,
        }
    }

    pub fn signal_config(&self) -> &SignalConfig {
        &self.signals
    }

    /// Annotate candles with indicator values.
    pub fn compute_indicators(&self, candles: &[Candle]) -> Result<Vec<IndicatorRow>, IndicatorError> {
        self.battery.compute(candles)
    }

    /// The most recent fully closed row. The last row is the candle still
    /// forming and is never scored.
    pub fn closed_row(rows: &[IndicatorRow]) -> Option<&IndicatorRow> {
        if rows.len() < MIN_ROWS {
            return None;
        }
        rows.get(rows.len() - 2)
    }

    /// Score the closed row for both sides, independent of the threshold.
    ///
    /// `None` when there are too few rows or a required indicator is still
    /// undefined on the closed row.
    pub fn score_both(&self, rows: &[IndicatorRow]) -> Option<(ScoreResult, ScoreResult)> {
        let snapshot = Self::closed_row(rows)?.snapshot()?;
        let thresholds = &self.signals.thresholds;
        Some((
            scoring::score_side(SignalDirection::Long, &snapshot, thresholds),
            scoring::score_side(SignalDirection::Short, &snapshot, thresholds),
        ))
    }

    /// Evaluate the closed row and emit a signal if either side reaches the
    /// minimum confluence score. Insufficient data is "no signal", not an error.
    pub fn evaluate_signal(&self, symbol: &str, rows: &[IndicatorRow]) -> Option<Signal> {
        let row = Self::closed_row(rows)?;
        let snapshot = row.snapshot()?;

        let result = scoring::decide(&snapshot, &self.signals);
        let entry = row.close();
        let (stop_loss, take_profit) = scoring::exit_levels(result.side, entry, &self.signals)?;

        Some(Signal {
            symbol: symbol.to_string(),
            side: result.side,
            score: result.score,
            strength: SignalStrength::from_score(result.score),
            entry_price: entry,
            stop_loss,
            take_profit,
            reasons: result.reasons,
            candle_timestamp: row.candle.timestamp,
        })
    }

    /// Compute indicators and evaluate in one step.
    pub fn evaluate_candles(&self, symbol: &str, candles: &[Candle]) -> Result<Option<Signal>, IndicatorError> {
        let rows = self.compute_indicators(candles)?;
        Ok(self.evaluate_signal(symbol, &rows))
    }

    /// Diagnostic text for one instrument: every indicator value on the closed
    /// row with its directional marker, both side scores and the signal (if any).
    pub fn build_report(&self, symbol: &str, candles: &[Candle]) -> String {
        let rows = match self.compute_indicators(candles) {
            Ok(rows) => rows,
            Err(e) => return format::render_unavailable(symbol, &e.to_string()),
        };

        let Some(row) = Self::closed_row(&rows) else {
            return format::render_unavailable(symbol, "not enough candles to evaluate");
        };

        let scores = self.score_both(&rows);
        let signal = self.evaluate_signal(symbol, &rows);
        format::render_diagnostic(symbol, row, scores.as_ref(), signal.as_ref(), &self.signals)
    }
}
