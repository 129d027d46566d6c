//! Capture distance between the agent and a waypoint

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Which coordinate axes take part in the capture-radius test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMode {
    /// Euclidean distance over x, y and z
    #[default]
    #[serde(rename = "full_3d")]
    Full3d,
    /// Ignore z (ground vehicles, fixed-altitude flight)
    #[serde(rename = "xy_plane")]
    XyPlane,
    /// Ignore y
    #[serde(rename = "xz_plane")]
    XzPlane,
}

impl DistanceMode {
    /// Euclidean distance between `a` and `b` over the selected axes
    pub fn distance(self, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        let delta = a - b;
        match self {
            DistanceMode::Full3d => delta.norm(),
            DistanceMode::XyPlane => delta.xy().norm(),
            DistanceMode::XzPlane => delta.xz().norm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_3d() {
        let d = DistanceMode::Full3d.distance(&Vector3::new(1.0, 2.0, 2.0), &Vector3::zeros());
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_planar_modes_drop_one_axis() {
        let a = Vector3::new(3.0, 100.0, 4.0);
        let b = Vector3::new(0.0, 0.0, 0.0);
        assert!((DistanceMode::XzPlane.distance(&a, &b) - 5.0).abs() < 1e-12);

        let a = Vector3::new(3.0, 4.0, -250.0);
        assert!((DistanceMode::XyPlane.distance(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_serde_names() {
        let mode: DistanceMode = serde_json::from_str("\"xy_plane\"").unwrap();
        assert_eq!(mode, DistanceMode::XyPlane);
        assert_eq!(serde_json::to_string(&DistanceMode::Full3d).unwrap(), "\"full_3d\"");
        assert!(serde_json::from_str::<DistanceMode>("\"yz_plane\"").is_err());
    }
}
