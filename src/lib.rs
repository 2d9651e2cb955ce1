//! Confluence signal engine.
//!
//! Turns OHLCV candles into indicator rows, scores the last closed candle
//! against LONG/SHORT rule sets and delivers qualifying signals to chat
//! subscribers on a fixed cadence.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
