//! Core data types for the setpoint sequencer

use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Agent position, expressed in the same frame as the waypoints
pub type Position = Vector3<f64>;

/// Target pose the agent should visit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Target position
    pub position: Vector3<f64>,
    /// Target orientation, exactly as loaded (never normalized)
    pub orientation: Quaternion<f64>,
}

impl Waypoint {
    /// Build a waypoint from position and quaternion components
    pub fn new(x: f64, y: f64, z: f64, qx: f64, qy: f64, qz: f64, qw: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            orientation: Quaternion::new(qw, qx, qy, qz),
        }
    }

    /// Build a waypoint from a `[x, y, z, qx, qy, qz, qw]` row
    pub fn from_row(row: [f64; 7]) -> Self {
        let [x, y, z, qx, qy, qz, qw] = row;
        Self::new(x, y, z, qx, qy, qz, qw)
    }
}

/// Point in time, in nanoseconds since the UNIX epoch
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Asks a transform lookup for the most recent data available
    pub const LATEST: Timestamp = Timestamp(0);

    pub const fn from_nanos(nanos: u64) -> Self {
        Timestamp(nanos)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Timestamp((secs.max(0.0) * 1e9) as u64)
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Timestamp(nanos)
    }

    pub fn as_nanos(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e9
    }

    pub fn is_latest(self) -> bool {
        self == Self::LATEST
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }

    pub fn saturating_sub(self, duration: Duration) -> Timestamp {
        Timestamp(self.0.saturating_sub(duration.as_nanos() as u64))
    }

    /// The next representable instant
    pub fn next(self) -> Timestamp {
        Timestamp(self.0.saturating_add(1))
    }
}

/// Translation part of a wire pose
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rotation part of a wire pose, as quaternion components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<Vector3<f64>> for Translation {
    fn from(v: Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Translation> for Vector3<f64> {
    fn from(t: Translation) -> Self {
        Vector3::new(t.x, t.y, t.z)
    }
}

impl From<Quaternion<f64>> for Rotation {
    fn from(q: Quaternion<f64>) -> Self {
        Self {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

impl From<Rotation> for Quaternion<f64> {
    fn from(r: Rotation) -> Self {
        Quaternion::new(r.w, r.x, r.y, r.z)
    }
}

/// Pose of a child frame relative to a parent frame at a point in time.
///
/// This is the single message type carried by the transport: setpoints,
/// observed poses, incoming agent poses and frame-graph updates all use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    pub stamp: Timestamp,
    pub frame_id: String,
    pub child_frame_id: String,
    pub translation: Translation,
    pub rotation: Rotation,
}

impl TransformStamped {
    pub fn new(
        stamp: Timestamp,
        frame_id: impl Into<String>,
        child_frame_id: impl Into<String>,
        translation: Translation,
        rotation: Rotation,
    ) -> Self {
        Self {
            stamp,
            frame_id: frame_id.into(),
            child_frame_id: child_frame_id.into(),
            translation,
            rotation,
        }
    }

    /// Build a message from a rigid transform
    pub fn from_isometry(
        stamp: Timestamp,
        frame_id: impl Into<String>,
        child_frame_id: impl Into<String>,
        isometry: &Isometry3<f64>,
    ) -> Self {
        Self::new(
            stamp,
            frame_id,
            child_frame_id,
            isometry.translation.vector.into(),
            isometry.rotation.into_inner().into(),
        )
    }

    /// Translation of the child frame origin, as a position
    pub fn position(&self) -> Position {
        self.translation.into()
    }

    /// Rigid transform carried by this message; the rotation is normalized
    pub fn isometry(&self) -> Isometry3<f64> {
        let rotation = UnitQuaternion::from_quaternion(self.rotation.into());
        Isometry3::from_parts(Translation3::from(self.position()), rotation)
    }
}
