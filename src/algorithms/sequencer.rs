//! Waypoint-advance state machine
//!
//! The sequencer walks an ordered waypoint table one entry at a time. Each
//! position fed to [`Sequencer::evaluate`] is compared with the active waypoint;
//! once the agent is strictly inside the capture radius the next waypoint
//! becomes active. Reaching the last waypoint moves the sequencer into its
//! terminal `Done` state, after which every evaluation is a no-op.

use crate::algorithms::distance::DistanceMode;
use crate::core::{Position, Waypoint};
use crate::processing::waypoints::WaypointTable;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a sequencer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequencerError {
    #[error("capture radius must be a positive finite number, got {radius}")]
    InvalidRadius { radius: f64 },
}

/// Progress through the waypoint table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Steering towards `active_index`
    Running { active_index: usize },
    /// The last waypoint was reached; terminal
    Done { final_index: usize },
}

impl SequencerState {
    pub fn active_index(&self) -> usize {
        match *self {
            SequencerState::Running { active_index } => active_index,
            SequencerState::Done { final_index } => final_index,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, SequencerState::Done { .. })
    }
}

/// Outcome of a single evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Nothing changed
    NoChange,
    /// The given waypoint index is now active
    Advanced(usize),
    /// The final waypoint was reached. Emitted once per sequencer.
    Completed,
}

/// State machine owning the active waypoint index
#[derive(Debug, Clone)]
pub struct Sequencer {
    table: Arc<WaypointTable>,
    capture_radius: f64,
    mode: DistanceMode,
    state: SequencerState,
}

impl Sequencer {
    /// Create a sequencer positioned on the first waypoint
    pub fn new(
        table: Arc<WaypointTable>,
        capture_radius: f64,
        mode: DistanceMode,
    ) -> Result<Self, SequencerError> {
        if !capture_radius.is_finite() || capture_radius <= 0.0 {
            return Err(SequencerError::InvalidRadius {
                radius: capture_radius,
            });
        }

        Ok(Self {
            table,
            capture_radius,
            mode,
            state: SequencerState::Running { active_index: 0 },
        })
    }

    /// Compare `position` with the active waypoint and advance at most one step.
    ///
    /// A distance equal to the capture radius counts as not yet arrived.
    pub fn evaluate(&mut self, position: &Position) -> SequencerEvent {
        let active_index = match self.state {
            SequencerState::Done { .. } => return SequencerEvent::NoChange,
            SequencerState::Running { active_index } => active_index,
        };

        let distance = self.distance_to_target(position);

        // NaN compares false here, so a garbage position never advances
        if !(distance < self.capture_radius) {
            return SequencerEvent::NoChange;
        }

        if active_index < self.table.last_index() {
            let next = active_index + 1;
            self.state = SequencerState::Running { active_index: next };
            SequencerEvent::Advanced(next)
        } else {
            self.state = SequencerState::Done {
                final_index: active_index,
            };
            SequencerEvent::Completed
        }
    }

    /// Distance from `position` to the active waypoint under the configured mode
    pub fn distance_to_target(&self, position: &Position) -> f64 {
        self.mode.distance(position, &self.active_waypoint().position)
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index()
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Waypoint currently being steered to (the last one once done)
    pub fn active_waypoint(&self) -> &Waypoint {
        self.table
            .get(self.active_index())
            .unwrap_or(self.table.last())
    }

    pub fn table(&self) -> &Arc<WaypointTable> {
        &self.table
    }

    pub fn capture_radius(&self) -> f64 {
        self.capture_radius
    }

    pub fn distance_mode(&self) -> DistanceMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn line_table(count: usize, spacing: f64) -> Arc<WaypointTable> {
        let waypoints = (0..count)
            .map(|i| Waypoint::new(i as f64 * spacing, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0))
            .collect();
        Arc::new(WaypointTable::new(waypoints).unwrap())
    }

    #[test]
    fn test_rejects_bad_radius() {
        let table = line_table(2, 1.0);
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = Sequencer::new(table.clone(), radius, DistanceMode::Full3d);
            assert!(matches!(result, Err(SequencerError::InvalidRadius { .. })));
        }
    }

    #[test]
    fn test_outside_radius_is_no_change() {
        let mut sequencer = Sequencer::new(line_table(3, 10.0), 1.0, DistanceMode::Full3d).unwrap();

        for position in [
            Vector3::new(1.5, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(100.0, 100.0, 100.0),
        ] {
            assert_eq!(sequencer.evaluate(&position), SequencerEvent::NoChange);
            assert_eq!(sequencer.active_index(), 0);
        }
    }

    #[test]
    fn test_boundary_does_not_advance() {
        let mut sequencer = Sequencer::new(line_table(2, 10.0), 0.5, DistanceMode::Full3d).unwrap();

        assert_eq!(
            sequencer.evaluate(&Vector3::new(0.5, 0.0, 0.0)),
            SequencerEvent::NoChange
        );
        assert_eq!(sequencer.active_index(), 0);

        assert_eq!(
            sequencer.evaluate(&Vector3::new(0.4999, 0.0, 0.0)),
            SequencerEvent::Advanced(1)
        );
    }

    #[test]
    fn test_advances_one_step_at_a_time() {
        // Every waypoint sits on top of the previous one
        let mut sequencer = Sequencer::new(line_table(4, 0.0), 1.0, DistanceMode::Full3d).unwrap();
        let origin = Vector3::zeros();

        assert_eq!(sequencer.evaluate(&origin), SequencerEvent::Advanced(1));
        assert_eq!(sequencer.evaluate(&origin), SequencerEvent::Advanced(2));
        assert_eq!(sequencer.evaluate(&origin), SequencerEvent::Advanced(3));
        assert_eq!(sequencer.evaluate(&origin), SequencerEvent::Completed);
        assert!(sequencer.is_done());
    }

    #[test]
    fn test_completion_fires_once() {
        let mut sequencer = Sequencer::new(line_table(1, 0.0), 0.1, DistanceMode::Full3d).unwrap();

        assert_eq!(sequencer.evaluate(&Vector3::zeros()), SequencerEvent::Completed);
        assert_eq!(sequencer.state(), SequencerState::Done { final_index: 0 });

        for position in [Vector3::zeros(), Vector3::new(50.0, 0.0, 0.0)] {
            assert_eq!(sequencer.evaluate(&position), SequencerEvent::NoChange);
        }
        assert_eq!(sequencer.active_index(), 0);
        assert!(sequencer.is_done());
    }

    #[test]
    fn test_planar_mode_ignores_dropped_axis() {
        let table = Arc::new(
            WaypointTable::new(vec![
                Waypoint::new(1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 1.0),
                Waypoint::new(9.0, 9.0, 9.0, 0.0, 0.0, 0.0, 1.0),
            ])
            .unwrap(),
        );

        let mut full = Sequencer::new(table.clone(), 0.1, DistanceMode::Full3d).unwrap();
        let mut planar = Sequencer::new(table, 0.1, DistanceMode::XyPlane).unwrap();
        let above = Vector3::new(1.0, 2.0, 30.0);

        assert_eq!(planar.distance_to_target(&above), 0.0);
        assert_eq!(full.evaluate(&above), SequencerEvent::NoChange);
        assert_eq!(planar.evaluate(&above), SequencerEvent::Advanced(1));
    }

    #[test]
    fn test_nan_position_never_advances() {
        let mut sequencer = Sequencer::new(line_table(2, 0.0), 1.0, DistanceMode::Full3d).unwrap();
        let position = Vector3::new(f64::NAN, 0.0, 0.0);
        assert_eq!(sequencer.evaluate(&position), SequencerEvent::NoChange);
        assert_eq!(sequencer.active_index(), 0);
    }

    #[test]
    fn test_active_waypoint_follows_index() {
        let mut sequencer = Sequencer::new(line_table(3, 5.0), 0.5, DistanceMode::Full3d).unwrap();
        assert_eq!(sequencer.active_waypoint().position.x, 0.0);

        sequencer.evaluate(&Vector3::zeros());
        assert_eq!(sequencer.active_waypoint().position.x, 5.0);
        assert!((sequencer.distance_to_target(&Vector3::new(2.0, 0.0, 0.0)) - 3.0).abs() < 1e-12);
    }
}
