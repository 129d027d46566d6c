//! Agent position sources
//!
//! The sequencer never talks to the outside world directly. It is handed a
//! position by a [`PositionSource`], which either caches what was last pushed
//! to it ([`PushFeed`]) or queries the frame graph on demand
//! ([`PolledTransform`]). Either way the result is a position or a reason why
//! there is none this cycle.

pub mod polled;
pub mod push;

pub use polled::PolledTransform;
pub use push::PushFeed;

use crate::core::Position;
use crate::frames::LookupError;
use thiserror::Error;

/// Why a source could not produce a position this cycle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Unavailable {
    /// Nothing has been pushed yet
    #[error("no position received yet")]
    NoFixYet,
    /// The frame-graph lookup failed
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// When the driver should feed a source's positions to the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationTrigger {
    /// Poll and evaluate on every tick of the loop
    EveryTick,
    /// Positions are evaluated as they arrive; the loop only publishes
    OnArrival,
}

/// Capability shared by every position source
pub trait PositionSource: Send {
    /// Current agent position, or the reason there is none
    fn poll(&mut self) -> Result<Position, Unavailable>;

    fn trigger(&self) -> EvaluationTrigger {
        EvaluationTrigger::EveryTick
    }
}
