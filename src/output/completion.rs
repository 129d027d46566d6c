//! One-shot "path complete" signal

use crate::core::{Timestamp, TransformStamped, Waypoint, COMPLETION_FRAME};
use crate::transport::Publisher;
use log::info;
use std::sync::Arc;

/// Publishes the completion sentinel. Firing consumes the notifier.
pub struct CompletionNotifier {
    publisher: Arc<dyn Publisher>,
    topic: String,
}

impl CompletionNotifier {
    pub fn new(publisher: Arc<dyn Publisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    /// Sentinel message: the final waypoint pose, both frames set to the
    /// completion marker, stamped `at`
    pub fn sentinel(final_waypoint: &Waypoint, at: Timestamp) -> TransformStamped {
        TransformStamped::new(
            at,
            COMPLETION_FRAME,
            COMPLETION_FRAME,
            final_waypoint.position.into(),
            final_waypoint.orientation.into(),
        )
    }

    /// Publish the sentinel and return it
    pub fn fire(self, final_waypoint: &Waypoint, at: Timestamp) -> TransformStamped {
        let message = Self::sentinel(final_waypoint, at);
        self.publisher.publish(&self.topic, &message);
        info!("path complete, notified on '{}'", self.topic);
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Translation;
    use crate::transport::Recorder;

    #[test]
    fn test_sentinel_content() {
        let recorder = Arc::new(Recorder::new());
        let notifier = CompletionNotifier::new(recorder.clone(), "setpoint_complete");
        let last = Waypoint::new(5.0, 0.0, 1.5, 0.0, 0.0, 1.0, 0.0);

        let message = notifier.fire(&last, Timestamp::from_nanos(77));

        assert_eq!(message.frame_id, COMPLETION_FRAME);
        assert_eq!(message.child_frame_id, COMPLETION_FRAME);
        assert_eq!(message.stamp, Timestamp::from_nanos(77));
        assert_eq!(message.translation, Translation { x: 5.0, y: 0.0, z: 1.5 });
        assert_eq!(message.rotation.z, 1.0);

        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.on_topic("setpoint_complete"), vec![message]);
    }
}
