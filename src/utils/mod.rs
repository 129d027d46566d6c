//! Utility modules for configuration and diagnostics

pub mod config;
pub mod throttle;

pub use config::{ConfigError, SequencerConfig};
pub use throttle::Throttle;
