//! Pose transport
//!
//! Everything the sequencer emits or consumes travels as a
//! [`TransformStamped`] on a named topic. Publishing is fire-and-forget:
//! implementations never report delivery back to the caller.

pub mod bus;
pub mod jsonl;
pub mod recorder;

pub use bus::{LocalBus, MessageCallback, SubscriptionHandle};
pub use jsonl::{Envelope, JsonLinesWriter, PumpStats};
pub use recorder::Recorder;

use crate::core::TransformStamped;

/// Sink for outgoing pose messages
pub trait Publisher: Send + Sync {
    /// Publish `message` on `topic`
    fn publish(&self, topic: &str, message: &TransformStamped);
}
