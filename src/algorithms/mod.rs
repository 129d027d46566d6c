//! Waypoint capture and sequencing

pub mod distance;
pub mod sequencer;

pub use distance::DistanceMode;
pub use sequencer::{Sequencer, SequencerError, SequencerEvent, SequencerState};
