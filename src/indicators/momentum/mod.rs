//! Momentum indicators: RSI, MACD, Stochastic RSI

pub mod macd;
pub mod rsi;
pub mod stoch_rsi;

pub use macd::*;
pub use rsi::*;
pub use stoch_rsi::*;
