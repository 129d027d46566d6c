//! Live setpoint rendering

use crate::core::{Timestamp, TransformStamped, Waypoint};

/// Holds the active waypoint rendered as a pose message.
///
/// The buffer is re-rendered every cycle and handed out as an owned copy
/// with a fresh stamp, so subscribers always see a live signal even while
/// the active waypoint does not change.
#[derive(Debug, Clone)]
pub struct SetpointEmitter {
    buffer: TransformStamped,
    last_stamp: Option<Timestamp>,
}

impl SetpointEmitter {
    /// Emitter initialised with `initial`, publishing `child_frame` in `parent_frame`
    pub fn new(
        initial: &Waypoint,
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
    ) -> Self {
        Self {
            buffer: TransformStamped::new(
                Timestamp::LATEST,
                parent_frame,
                child_frame,
                initial.position.into(),
                initial.orientation.into(),
            ),
            last_stamp: None,
        }
    }

    /// Copy `waypoint` into the pose buffer
    pub fn render(&mut self, waypoint: &Waypoint) {
        self.buffer.translation = waypoint.position.into();
        self.buffer.rotation = waypoint.orientation.into();
    }

    /// Stamp the buffer and return it.
    ///
    /// Stamps never repeat or go backwards: if `now` is not later than the
    /// previous stamp, the previous stamp plus one nanosecond is used.
    pub fn stamped(&mut self, now: Timestamp) -> TransformStamped {
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last.next(),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        self.buffer.stamp = stamp;
        self.buffer.clone()
    }

    /// The rendered pose as of the last call to [`render`](Self::render)
    pub fn current(&self) -> &TransformStamped {
        &self.buffer
    }
}
