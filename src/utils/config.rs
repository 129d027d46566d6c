use crate::algorithms::distance::DistanceMode;
use crate::core::{
    DEFAULT_COMPLETION_TOPIC, DEFAULT_OBSERVED_POSE_TOPIC, DEFAULT_POSE_TOPIC, DEFAULT_RATE_HZ,
    DEFAULT_SETPOINT_CHILD_FRAME, DEFAULT_SETPOINT_PARENT_FRAME, DEFAULT_SETPOINT_TOPIC,
    DEFAULT_TRANSFORMS_TOPIC, DEFAULT_TRANSFORM_CACHE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Loop rates above this are accepted but flagged
const MAX_SENSIBLE_RATE_HZ: f64 = 1000.0;

/// Startup delays above this are accepted but flagged
const MAX_SENSIBLE_STARTUP_DELAY_MS: u64 = 60_000;

/// Sequencer process configuration, usually loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Waypoint table file
    pub waypoints_path: PathBuf,
    /// Capture radius around each waypoint, in waypoint units
    pub capture_radius: f64,
    /// Axes taking part in the capture test
    #[serde(default)]
    pub distance_mode: DistanceMode,
    /// Publish loop cadence (Hz)
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
    /// Delay before the first tick (milliseconds)
    #[serde(default)]
    pub startup_delay_ms: u64,
    /// Where the agent position comes from
    #[serde(default)]
    pub source: SourceConfig,
    /// Topic names
    #[serde(default)]
    pub topics: TopicConfig,
    /// Parent frame stamped on setpoints
    #[serde(default = "default_setpoint_parent_frame")]
    pub setpoint_parent_frame: String,
    /// Child frame stamped on setpoints
    #[serde(default = "default_setpoint_child_frame")]
    pub setpoint_child_frame: String,
    /// History kept by the frame graph (milliseconds)
    #[serde(default = "default_transform_cache_ms")]
    pub transform_cache_ms: u64,
}

/// Position source selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Positions pushed on the pose topic
    #[default]
    Push,
    /// Positions looked up in the frame graph every tick
    PolledTransform,
}

/// Position source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Frame the agent position is expressed in (polled source only)
    #[serde(default)]
    pub parent_frame: Option<String>,
    /// Frame of the agent itself (polled source only)
    #[serde(default)]
    pub child_frame: Option<String>,
}

/// Topic names used on the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub setpoint: String,
    pub observed_pose: String,
    pub completion: String,
    pub pose: String,
    pub transforms: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            setpoint: DEFAULT_SETPOINT_TOPIC.to_string(),
            observed_pose: DEFAULT_OBSERVED_POSE_TOPIC.to_string(),
            completion: DEFAULT_COMPLETION_TOPIC.to_string(),
            pose: DEFAULT_POSE_TOPIC.to_string(),
            transforms: DEFAULT_TRANSFORMS_TOPIC.to_string(),
        }
    }
}

fn default_rate_hz() -> f64 {
    DEFAULT_RATE_HZ
}

fn default_setpoint_parent_frame() -> String {
    DEFAULT_SETPOINT_PARENT_FRAME.to_string()
}

fn default_setpoint_child_frame() -> String {
    DEFAULT_SETPOINT_CHILD_FRAME.to_string()
}

fn default_transform_cache_ms() -> u64 {
    DEFAULT_TRANSFORM_CACHE.as_millis() as u64
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Missing required parameter
    #[error("missing required parameter {parameter}")]
    MissingParameter { parameter: String },
    /// Configuration file I/O error
    #[error("{message}")]
    IoError { message: String },
    /// JSON serialization/deserialization error
    #[error("{message}")]
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Frame pair resolved for the polled-transform source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePair {
    pub parent: String,
    pub child: String,
}

impl SequencerConfig {
    /// Configuration with every optional field at its default
    pub fn new(waypoints_path: impl Into<PathBuf>, capture_radius: f64) -> Self {
        Self {
            waypoints_path: waypoints_path.into(),
            capture_radius,
            distance_mode: DistanceMode::default(),
            rate_hz: default_rate_hz(),
            startup_delay_ms: 0,
            source: SourceConfig::default(),
            topics: TopicConfig::default(),
            setpoint_parent_frame: default_setpoint_parent_frame(),
            setpoint_child_frame: default_setpoint_child_frame(),
            transform_cache_ms: default_transform_cache_ms(),
        }
    }

    /// Switch to the polled-transform source between the given frames
    pub fn with_polled_transform(
        mut self,
        parent_frame: impl Into<String>,
        child_frame: impl Into<String>,
    ) -> Self {
        self.source = SourceConfig {
            kind: SourceKind::PolledTransform,
            parent_frame: Some(parent_frame.into()),
            child_frame: Some(child_frame.into()),
        };
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config: {}", e),
        })
    }

    /// Serialize configuration as pretty JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })
    }

    /// Check every parameter, collecting all errors and warnings
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !self.capture_radius.is_finite() || self.capture_radius <= 0.0 {
            result.errors.push(ConfigError::InvalidParameter {
                parameter: "capture_radius".to_string(),
                value: self.capture_radius.to_string(),
                reason: "Capture radius must be a positive number".to_string(),
            });
        }

        if !self.rate_hz.is_finite() || self.rate_hz <= 0.0 {
            result.errors.push(ConfigError::InvalidParameter {
                parameter: "rate_hz".to_string(),
                value: self.rate_hz.to_string(),
                reason: "Loop rate must be a positive number".to_string(),
            });
        } else if self.rate_hz > MAX_SENSIBLE_RATE_HZ {
            result.warnings.push(format!(
                "Loop rate {} Hz is unusually high; ticks may overrun",
                self.rate_hz
            ));
        }

        if self.waypoints_path.as_os_str().is_empty() {
            result.errors.push(ConfigError::MissingParameter {
                parameter: "waypoints_path".to_string(),
            });
        }

        match self.source.kind {
            SourceKind::PolledTransform => {
                for (name, frame) in [
                    ("source.parent_frame", &self.source.parent_frame),
                    ("source.child_frame", &self.source.child_frame),
                ] {
                    if frame.as_deref().map_or(true, str::is_empty) {
                        result.errors.push(ConfigError::MissingParameter {
                            parameter: name.to_string(),
                        });
                    }
                }
            }
            SourceKind::Push => {
                if self.source.parent_frame.is_some() || self.source.child_frame.is_some() {
                    result
                        .warnings
                        .push("Source frames are ignored by the push source".to_string());
                }
            }
        }

        for (name, topic) in [
            ("topics.setpoint", &self.topics.setpoint),
            ("topics.completion", &self.topics.completion),
            ("topics.pose", &self.topics.pose),
            ("topics.observed_pose", &self.topics.observed_pose),
            ("topics.transforms", &self.topics.transforms),
        ] {
            if topic.is_empty() {
                result.errors.push(ConfigError::MissingParameter {
                    parameter: name.to_string(),
                });
            }
        }

        if self.startup_delay_ms > MAX_SENSIBLE_STARTUP_DELAY_MS {
            result.warnings.push(format!(
                "Startup delay of {} ms is longer than a minute",
                self.startup_delay_ms
            ));
        }

        result.is_valid = result.errors.is_empty();
        result
    }

    /// Validate and return the first error, if any
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.validate().errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Frames for the polled-transform source
    pub fn polled_frames(&self) -> Result<FramePair, ConfigError> {
        let require = |name: &str, frame: &Option<String>| {
            frame
                .clone()
                .filter(|f| !f.is_empty())
                .ok_or_else(|| ConfigError::MissingParameter {
                    parameter: name.to_string(),
                })
        };

        Ok(FramePair {
            parent: require("source.parent_frame", &self.source.parent_frame)?,
            child: require("source.child_frame", &self.source.child_frame)?,
        })
    }

    /// Time between two ticks of the publish loop
    pub fn loop_period(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.rate_hz)
            .unwrap_or_else(|_| Duration::from_secs_f64(1.0 / DEFAULT_RATE_HZ))
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn transform_cache(&self) -> Duration {
        Duration::from_millis(self.transform_cache_ms)
    }
}
