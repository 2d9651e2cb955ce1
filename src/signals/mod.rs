//! Signal evaluation interfaces.

pub mod engine;
pub mod format;
pub mod scoring;

pub use engine::SignalEngine;
pub use format::{format_digest, format_signal};
pub use scoring::{decide, score_side, Condition};
