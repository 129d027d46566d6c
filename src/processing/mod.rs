//! Waypoint input processing

pub mod waypoints;

pub use waypoints::{WaypointError, WaypointTable};
