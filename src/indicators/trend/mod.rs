//! Trend indicators: EMA crossover pair

pub mod ema;

pub use ema::*;
