//! Position source fed by incoming pose messages

use crate::core::{Position, Timestamp, TransformStamped};
use crate::driver::SharedMission;
use crate::source::{EvaluationTrigger, PositionSource, Unavailable};
use crate::transport::{LocalBus, SubscriptionHandle};
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

/// Caches the most recently received position.
///
/// Clones share the same cache, so one clone can be handed to whatever
/// delivers positions while another is polled. The driver never evaluates
/// a push feed on its ticks: positions are evaluated once, when they arrive
/// through [`PushFeed::attach`].
#[derive(Debug, Clone)]
pub struct PushFeed {
    latest: Arc<Mutex<Option<Position>>>,
}

impl PushFeed {
    pub fn new() -> Self {
        Self {
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the cached position
    pub fn deliver(&self, position: Position) {
        *self.latest.lock() = Some(position);
    }

    pub fn latest(&self) -> Option<Position> {
        *self.latest.lock()
    }

    /// Subscribe to `topic` and evaluate every arriving pose against `mission`.
    ///
    /// Positions handed to [`PushFeed::deliver`] directly are cached but not
    /// evaluated.
    pub fn attach(&self, bus: &LocalBus, topic: &str, mission: SharedMission) -> SubscriptionHandle {
        let feed = self.clone();

        bus.subscribe(
            topic,
            Box::new(move |message: &TransformStamped| {
                let position = message.position();
                feed.deliver(position);
                let event = mission.lock().apply(&position, Timestamp::now());
                debug!("pose from '{}' evaluated: {:?}", message.child_frame_id, event);
            }),
        )
    }
}

impl Default for PushFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for PushFeed {
    fn poll(&mut self) -> Result<Position, Unavailable> {
        self.latest().ok_or(Unavailable::NoFixYet)
    }

    fn trigger(&self) -> EvaluationTrigger {
        EvaluationTrigger::OnArrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::distance::DistanceMode;
    use crate::algorithms::sequencer::Sequencer;
    use crate::core::{Rotation, Translation};
    use crate::driver::Mission;
    use crate::output::SetpointEmitter;
    use crate::processing::waypoints::WaypointTable;
    use crate::transport::Publisher;
    use nalgebra::Vector3;

    fn shared_mission() -> SharedMission {
        let table = Arc::new(WaypointTable::parse("0 0 0 0 0 0 1\n5 0 0 0 0 0 1").unwrap());
        let sequencer = Sequencer::new(table.clone(), 0.1, DistanceMode::Full3d).unwrap();
        let emitter = SetpointEmitter::new(table.first(), "world", "setpoint");
        Arc::new(Mutex::new(Mission::new(sequencer, emitter)))
    }

    #[test]
    fn test_unavailable_until_first_delivery() {
        let mut feed = PushFeed::new();
        assert_eq!(feed.poll(), Err(Unavailable::NoFixYet));
        assert_eq!(feed.trigger(), EvaluationTrigger::OnArrival);

        feed.deliver(Vector3::new(1.0, 2.0, 3.0));
        feed.deliver(Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(feed.poll(), Ok(Vector3::new(4.0, 5.0, 6.0)));
        assert_eq!(feed.poll(), Ok(Vector3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn test_clones_share_cache() {
        let mut feed = PushFeed::new();
        let sender = feed.clone();
        sender.deliver(Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(feed.poll(), Ok(Vector3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_attached_feed_evaluates_on_arrival() {
        let bus = LocalBus::new();
        let mission = shared_mission();
        let mut feed = PushFeed::new();
        feed.attach(&bus, "pose", mission.clone());

        assert_eq!(feed.trigger(), EvaluationTrigger::OnArrival);
        assert_eq!(bus.subscriber_count("pose"), 1);

        let pose = |x: f64| {
            TransformStamped::new(
                Timestamp::from_nanos(1),
                "world",
                "agent",
                Translation { x, y: 0.0, z: 0.0 },
                Rotation::default(),
            )
        };

        bus.publish("pose", &pose(0.0));
        assert_eq!(mission.lock().active_index(), 1);

        bus.publish("pose", &pose(2.0));
        assert_eq!(mission.lock().active_index(), 1);
        assert_eq!(feed.poll(), Ok(Vector3::new(2.0, 0.0, 0.0)));

        bus.publish("pose", &pose(5.0));
        assert!(mission.lock().is_done());
    }

    #[test]
    fn test_other_topics_are_ignored() {
        let bus = LocalBus::new();
        let mission = shared_mission();
        let mut feed = PushFeed::new();
        feed.attach(&bus, "pose", mission.clone());

        let transform = TransformStamped::new(
            Timestamp::from_nanos(1),
            "world",
            "agent",
            Translation::default(),
            Rotation::default(),
        );
        bus.publish("tf", &transform);
        assert_eq!(feed.poll(), Err(Unavailable::NoFixYet));
        assert_eq!(mission.lock().active_index(), 0);
    }
}
