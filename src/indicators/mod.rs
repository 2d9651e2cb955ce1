pub mod battery;
pub mod error;

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use battery::{compute_indicators, IndicatorBattery};
pub use error::IndicatorError;
