//! Position source backed by frame-graph lookups

use crate::core::{Position, Timestamp};
use crate::frames::TransformLookup;
use crate::source::{PositionSource, Unavailable};
use crate::transport::Publisher;
use std::sync::Arc;

struct ObservedPoseChannel {
    publisher: Arc<dyn Publisher>,
    topic: String,
}

/// Looks up the agent frame relative to a parent frame on every poll
pub struct PolledTransform {
    lookup: Arc<dyn TransformLookup>,
    parent_frame: String,
    child_frame: String,
    observed: Option<ObservedPoseChannel>,
}

impl PolledTransform {
    pub fn new(
        lookup: Arc<dyn TransformLookup>,
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
    ) -> Self {
        Self {
            lookup,
            parent_frame: parent_frame.into(),
            child_frame: child_frame.into(),
            observed: None,
        }
    }

    /// Forward every resolved transform to `topic` before it is used
    pub fn with_observer(mut self, publisher: Arc<dyn Publisher>, topic: impl Into<String>) -> Self {
        self.observed = Some(ObservedPoseChannel {
            publisher,
            topic: topic.into(),
        });
        self
    }

    pub fn parent_frame(&self) -> &str {
        &self.parent_frame
    }

    pub fn child_frame(&self) -> &str {
        &self.child_frame
    }
}

impl PositionSource for PolledTransform {
    fn poll(&mut self) -> Result<Position, Unavailable> {
        let transform =
            self.lookup
                .lookup_transform(&self.parent_frame, &self.child_frame, Timestamp::LATEST)?;

        if let Some(channel) = &self.observed {
            channel.publisher.publish(&channel.topic, &transform);
        }

        Ok(transform.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rotation, Translation, TransformStamped};
    use crate::frames::{LookupError, ScriptedLookup, TransformBuffer};
    use crate::source::EvaluationTrigger;
    use crate::transport::Recorder;
    use nalgebra::Vector3;

    fn camera_at(x: f64, y: f64, z: f64) -> TransformStamped {
        TransformStamped::new(
            Timestamp::from_nanos(42),
            "world",
            "camera",
            Translation { x, y, z },
            Rotation {
                x: 0.0,
                y: 0.0,
                z: 0.6,
                w: 0.8,
            },
        )
    }

    #[test]
    fn test_lookup_failures_are_unavailable() {
        let lookup = Arc::new(ScriptedLookup::new());
        lookup
            .push_err(LookupError::UnknownFrame {
                frame: "camera".to_string(),
            })
            .push_err(LookupError::NotConnected {
                parent: "world".to_string(),
                child: "camera".to_string(),
            })
            .push_ok(camera_at(1.0, 2.0, 3.0));

        let mut source = PolledTransform::new(lookup.clone(), "world", "camera");
        assert_eq!(source.trigger(), EvaluationTrigger::EveryTick);

        assert!(matches!(
            source.poll(),
            Err(Unavailable::Lookup(LookupError::UnknownFrame { .. }))
        ));
        assert!(matches!(
            source.poll(),
            Err(Unavailable::Lookup(LookupError::NotConnected { .. }))
        ));
        assert_eq!(source.poll(), Ok(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(lookup.calls(), 3);
    }

    #[test]
    fn test_observed_pose_is_forwarded_verbatim() {
        let lookup = Arc::new(ScriptedLookup::new());
        lookup
            .push_err(LookupError::UnknownFrame {
                frame: "camera".to_string(),
            })
            .push_ok(camera_at(4.0, 0.0, -1.0));
        let recorder = Arc::new(Recorder::new());

        let mut source = PolledTransform::new(lookup, "world", "camera")
            .with_observer(recorder.clone(), "observed_pose");

        assert!(source.poll().is_err());
        assert!(recorder.is_empty());

        source.poll().unwrap();
        let observed = recorder.on_topic("observed_pose");
        assert_eq!(observed, vec![camera_at(4.0, 0.0, -1.0)]);
    }

    #[test]
    fn test_reads_latest_from_frame_buffer() {
        let buffer = Arc::new(TransformBuffer::new());
        let mut source = PolledTransform::new(buffer.clone(), "world", "camera");
        assert!(matches!(source.poll(), Err(Unavailable::Lookup(_))));

        let mut first = camera_at(1.0, 0.0, 0.0);
        first.stamp = Timestamp::from_secs_f64(100.0);
        let mut second = camera_at(3.0, 0.0, 0.0);
        second.stamp = Timestamp::from_secs_f64(100.5);
        buffer.insert(&first);
        buffer.insert(&second);

        let position = source.poll().unwrap();
        assert!((position - Vector3::new(3.0, 0.0, 0.0)).norm() < 1e-9);
    }
}
