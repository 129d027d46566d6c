//! Frame lookup error types

use crate::core::Timestamp;
use thiserror::Error;

/// Reasons a transform lookup can fail.
///
/// All of them are transient from the sequencer's point of view: the cycle
/// is skipped and the lookup is retried on the next tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// No transform involving this frame has been received
    #[error("frame '{frame}' is unknown to the frame graph")]
    UnknownFrame { frame: String },
    /// Both frames exist but no chain of transforms joins them
    #[error("frames '{parent}' and '{child}' are not connected")]
    NotConnected { parent: String, child: String },
    /// The requested time lies outside the retained history of a frame
    #[error(
        "lookup of frame '{frame}' at {requested_ns} ns is outside its history [{oldest_ns}, {newest_ns}] ns"
    )]
    Extrapolation {
        frame: String,
        requested_ns: u64,
        oldest_ns: u64,
        newest_ns: u64,
    },
}

impl LookupError {
    pub(crate) fn extrapolation(
        frame: &str,
        requested: Timestamp,
        oldest: Timestamp,
        newest: Timestamp,
    ) -> Self {
        LookupError::Extrapolation {
            frame: frame.to_string(),
            requested_ns: requested.as_nanos(),
            oldest_ns: oldest.as_nanos(),
            newest_ns: newest.as_nanos(),
        }
    }
}

/// Result type for frame lookups
pub type LookupResult<T> = Result<T, LookupError>;
