//! Indicator computation errors

use thiserror::Error;

/// Why a candle sequence could not be turned into indicator rows.
///
/// Any of these means "skip this instrument this cycle"; callers must never
/// substitute zero-valued indicators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("candle sequence is empty")]
    EmptySeries,
    #[error("candle {index} has a non-finite {field}")]
    NonFiniteValue { index: usize, field: &'static str },
    #[error("candle {index} is not later than its predecessor")]
    OutOfOrder { index: usize },
    #[error("window length {name} must be at least 1")]
    InvalidPeriod { name: &'static str },
}
