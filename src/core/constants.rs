//! Default topics, frames and timings

use std::time::Duration;

/// Default publish loop cadence (Hz)
pub const DEFAULT_RATE_HZ: f64 = 100.0;

pub const DEFAULT_SETPOINT_TOPIC: &str = "setpoints";
pub const DEFAULT_POSE_TOPIC: &str = "pose";
pub const DEFAULT_OBSERVED_POSE_TOPIC: &str = "observed_pose";
pub const DEFAULT_COMPLETION_TOPIC: &str = "setpoint_complete";
pub const DEFAULT_TRANSFORMS_TOPIC: &str = "tf";

/// Parent frame stamped on emitted setpoints
pub const DEFAULT_SETPOINT_PARENT_FRAME: &str = "world";
/// Child frame stamped on emitted setpoints
pub const DEFAULT_SETPOINT_CHILD_FRAME: &str = "setpoint";

/// Marker used for both frame ids of the completion message
pub const COMPLETION_FRAME: &str = "path_complete";

/// Minimum interval between distance-to-target debug messages
pub const DISTANCE_LOG_INTERVAL: Duration = Duration::from_millis(500);

/// How long the frame graph keeps transform history
pub const DEFAULT_TRANSFORM_CACHE: Duration = Duration::from_secs(10);
