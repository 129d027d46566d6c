//! Waypoint Setpoint Sequencer
//!
//! Drives an agent through an ordered list of waypoints. The agent position
//! comes either from pushed pose messages or from frame-graph lookups; each
//! time the agent enters the capture radius of the active waypoint the next
//! one becomes active. The active waypoint is republished at a fixed rate as
//! a setpoint, and a single completion notice is sent at the end of the path.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod frames;
pub mod source;
pub mod output;
pub mod driver;
pub mod transport;
pub mod utils;
pub mod error;

// Re-export commonly used types
pub use crate::core::{Position, Timestamp, TransformStamped, Waypoint};
pub use algorithms::{DistanceMode, Sequencer, SequencerEvent, SequencerState};
pub use processing::{WaypointError, WaypointTable};
pub use frames::{LookupError, TransformBuffer, TransformLookup};
pub use source::{PolledTransform, PositionSource, PushFeed, Unavailable};
pub use output::{CompletionNotifier, SetpointEmitter};
pub use driver::{Driver, Mission, RunOutcome, RunReport, ShutdownSignal};
pub use transport::{LocalBus, Publisher};
pub use utils::{ConfigError, SequencerConfig};
pub use error::{Error, Result};
