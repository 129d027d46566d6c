//! Core types and constants for the setpoint sequencer

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
