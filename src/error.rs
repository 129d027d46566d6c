//! Crate-level error type

use crate::algorithms::sequencer::SequencerError;
use crate::processing::waypoints::WaypointError;
use crate::utils::config::ConfigError;
use thiserror::Error;

/// Any error that prevents the sequencer from starting
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Waypoints(#[from] WaypointError),
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}

pub type Result<T> = std::result::Result<T, Error>;
