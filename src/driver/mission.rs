//! Sequencer and setpoint buffer guarded as one unit

use crate::algorithms::sequencer::{Sequencer, SequencerEvent};
use crate::core::{Position, Timestamp, TransformStamped, Waypoint, DISTANCE_LOG_INTERVAL};
use crate::output::SetpointEmitter;
use crate::utils::throttle::Throttle;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;

/// Mission shared between the publish loop and arrival callbacks
pub type SharedMission = Arc<Mutex<Mission>>;

/// Progress of one run through the waypoint table.
///
/// Evaluation and setpoint rendering both happen through `&mut self`, so a
/// single lock around the mission covers "evaluate + update emitter buffer".
pub struct Mission {
    sequencer: Sequencer,
    emitter: SetpointEmitter,
    distance_log: Throttle,
    completed_at: Option<Timestamp>,
}

impl Mission {
    pub fn new(sequencer: Sequencer, emitter: SetpointEmitter) -> Self {
        Self {
            sequencer,
            emitter,
            distance_log: Throttle::new(DISTANCE_LOG_INTERVAL),
            completed_at: None,
        }
    }

    pub fn shared(self) -> SharedMission {
        Arc::new(Mutex::new(self))
    }

    /// Evaluate `position` observed at `now`
    pub fn apply(&mut self, position: &Position, now: Timestamp) -> SequencerEvent {
        if !self.sequencer.is_done() && self.distance_log.ready() {
            debug!(
                "distance to waypoint {}: {:.3}",
                self.sequencer.active_index(),
                self.sequencer.distance_to_target(position)
            );
        }

        let event = self.sequencer.evaluate(position);
        match event {
            SequencerEvent::NoChange => {}
            SequencerEvent::Advanced(index) => {
                self.emitter.render(self.sequencer.active_waypoint());
                debug!(
                    "advanced to waypoint {} of {}",
                    index,
                    self.sequencer.table().len()
                );
            }
            SequencerEvent::Completed => {
                self.completed_at = Some(now);
                info!(
                    "reached final waypoint {}",
                    self.sequencer.active_index()
                );
            }
        }
        event
    }

    /// Render the active waypoint and stamp it for publishing
    pub fn setpoint(&mut self, now: Timestamp) -> TransformStamped {
        self.emitter.render(self.sequencer.active_waypoint());
        self.emitter.stamped(now)
    }

    /// Final waypoint and completion time, once the last waypoint was reached
    pub fn completion(&self) -> Option<(Waypoint, Timestamp)> {
        self.completed_at
            .map(|at| (*self.sequencer.active_waypoint(), at))
    }

    pub fn is_done(&self) -> bool {
        self.sequencer.is_done()
    }

    pub fn active_index(&self) -> usize {
        self.sequencer.active_index()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::distance::DistanceMode;
    use crate::algorithms::sequencer::SequencerState;
    use crate::core::Translation;
    use crate::processing::waypoints::WaypointTable;
    use nalgebra::Vector3;

    fn mission(text: &str, radius: f64) -> Mission {
        let table = Arc::new(WaypointTable::parse(text).unwrap());
        let sequencer = Sequencer::new(table.clone(), radius, DistanceMode::Full3d).unwrap();
        let emitter = SetpointEmitter::new(table.first(), "world", "setpoint");
        Mission::new(sequencer, emitter)
    }

    #[test]
    fn test_setpoint_follows_active_waypoint() {
        let mut mission = mission("0 0 0 0 0 0 1\n5 0 0 0 0 0 1", 0.1);
        let before = mission.setpoint(Timestamp::from_nanos(1));
        assert_eq!(before.translation, Translation::default());

        mission.apply(&Vector3::zeros(), Timestamp::from_nanos(2));
        let after = mission.setpoint(Timestamp::from_nanos(3));
        assert_eq!(after.translation, Translation { x: 5.0, y: 0.0, z: 0.0 });
        assert_eq!(after.child_frame_id, "setpoint");
    }

    #[test]
    fn test_completion_records_time_once() {
        let mut mission = mission("1 1 1 0 0 0 1", 0.5);
        assert_eq!(mission.completion(), None);

        assert_eq!(
            mission.apply(&Vector3::new(1.0, 1.0, 1.2), Timestamp::from_nanos(40)),
            SequencerEvent::Completed
        );
        assert_eq!(
            mission.apply(&Vector3::new(1.0, 1.0, 1.0), Timestamp::from_nanos(90)),
            SequencerEvent::NoChange
        );

        let (waypoint, at) = mission.completion().unwrap();
        assert_eq!(at, Timestamp::from_nanos(40));
        assert_eq!(waypoint.position, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(
            mission.sequencer().state(),
            SequencerState::Done { final_index: 0 }
        );
    }

    #[test]
    fn test_setpoint_after_completion_holds_last_waypoint() {
        let mut mission = mission("0 0 0 0 0 0 1\n0 3 0 0 0 0 1", 0.1);
        mission.apply(&Vector3::zeros(), Timestamp::from_nanos(1));
        mission.apply(&Vector3::new(0.0, 3.0, 0.0), Timestamp::from_nanos(2));
        assert!(mission.is_done());

        let pose = mission.setpoint(Timestamp::from_nanos(3));
        assert_eq!(pose.translation, Translation { x: 0.0, y: 3.0, z: 0.0 });
    }
}
