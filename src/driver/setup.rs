//! Assembling a driver from configuration

use crate::algorithms::sequencer::Sequencer;
use crate::driver::{Driver, Mission};
use crate::error::Result;
use crate::frames::TransformBuffer;
use crate::output::{CompletionNotifier, SetpointEmitter};
use crate::processing::waypoints::WaypointTable;
use crate::source::{PolledTransform, PositionSource, PushFeed};
use crate::transport::{LocalBus, Publisher};
use crate::utils::config::{SequencerConfig, SourceKind};
use log::info;
use std::sync::Arc;

impl Driver {
    /// Build a driver as described by `config`.
    ///
    /// Incoming messages are read from `inputs`: the push source subscribes to
    /// the pose topic, the polled source feeds a frame graph from the
    /// transforms topic. Setpoints, observed poses and the completion notice
    /// go to `output`.
    pub fn from_config(
        config: &SequencerConfig,
        table: WaypointTable,
        inputs: &LocalBus,
        output: Arc<dyn Publisher>,
    ) -> Result<Driver> {
        config.check()?;

        let table = Arc::new(table);
        let sequencer = Sequencer::new(table.clone(), config.capture_radius, config.distance_mode)?;
        let emitter = SetpointEmitter::new(
            table.first(),
            config.setpoint_parent_frame.as_str(),
            config.setpoint_child_frame.as_str(),
        );
        let mission = Mission::new(sequencer, emitter).shared();

        let source: Box<dyn PositionSource> = match config.source.kind {
            SourceKind::Push => {
                let feed = PushFeed::new();
                feed.attach(inputs, &config.topics.pose, mission.clone());
                info!("evaluating poses pushed on '{}'", config.topics.pose);
                Box::new(feed)
            }
            SourceKind::PolledTransform => {
                let frames = config.polled_frames()?;
                let buffer = Arc::new(TransformBuffer::with_cache_duration(
                    config.transform_cache(),
                ));
                buffer.attach(inputs, &config.topics.transforms);
                info!(
                    "polling transform {} -> {} from '{}'",
                    frames.parent, frames.child, config.topics.transforms
                );
                Box::new(
                    PolledTransform::new(buffer, frames.parent, frames.child)
                        .with_observer(output.clone(), config.topics.observed_pose.as_str()),
                )
            }
        };

        info!(
            "loaded {} waypoints, capture radius {} ({:?})",
            table.len(),
            config.capture_radius,
            config.distance_mode
        );

        let notifier = CompletionNotifier::new(output.clone(), config.topics.completion.as_str());
        Ok(Driver::new(
            mission,
            source,
            output,
            config.topics.setpoint.as_str(),
            notifier,
        )
        .with_period(config.loop_period())
        .with_startup_delay(config.startup_delay()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Timestamp, TransformStamped, COMPLETION_FRAME};
    use crate::driver::TickOutcome;
    use crate::error::Error;
    use crate::transport::Recorder;
    use crate::utils::config::ConfigError;
    use nalgebra::Isometry3;

    fn table() -> WaypointTable {
        WaypointTable::parse("0 0 0 0 0 0 1\n2 0 0 0 0 0 1").unwrap()
    }

    fn transform(parent: &str, child: &str, x: f64) -> TransformStamped {
        TransformStamped::from_isometry(
            Timestamp::from_secs_f64(1_000.0),
            parent,
            child,
            &Isometry3::translation(x, 0.0, 0.0),
        )
    }

    #[test]
    fn test_push_configuration() {
        let bus = LocalBus::new();
        let recorder = Arc::new(Recorder::new());

        let config = SequencerConfig::new("unused.txt", 0.1);
        let mut driver = Driver::from_config(&config, table(), &bus, recorder.clone()).unwrap();
        assert_eq!(bus.subscriber_count("pose"), 1);

        bus.publish("pose", &transform("world", "agent", 0.0));
        bus.publish("pose", &transform("world", "agent", 2.0));
        assert_eq!(driver.tick(), TickOutcome::Completed);

        assert!(recorder.on_topic("pose").is_empty());
        let setpoint = recorder.on_topic("setpoints");
        assert_eq!(setpoint.len(), 1);
        assert_eq!(setpoint[0].frame_id, "world");
        assert_eq!(setpoint[0].child_frame_id, "setpoint");
        assert_eq!(recorder.on_topic("setpoint_complete")[0].frame_id, COMPLETION_FRAME);
    }

    #[test]
    fn test_polled_configuration() {
        let bus = LocalBus::new();
        let recorder = Arc::new(Recorder::new());

        let config = SequencerConfig::new("unused.txt", 0.1).with_polled_transform("map", "camera");
        let mut driver = Driver::from_config(&config, table(), &bus, recorder.clone()).unwrap();
        assert_eq!(bus.subscriber_count("tf"), 1);

        assert_eq!(driver.tick(), TickOutcome::Continue);
        assert!(recorder.on_topic("observed_pose").is_empty());

        bus.publish("tf", &transform("map", "odom", 1.0));
        bus.publish("tf", &transform("odom", "camera", -1.0));
        assert_eq!(driver.tick(), TickOutcome::Continue);
        assert_eq!(driver.mission().lock().active_index(), 1);

        let observed = recorder.on_topic("observed_pose");
        assert_eq!(observed.len(), 1);
        assert_eq!(observed[0].frame_id, "map");
        assert_eq!(observed[0].child_frame_id, "camera");
    }

    #[test]
    fn test_polled_without_frames_is_rejected() {
        let mut config = SequencerConfig::new("unused.txt", 0.1);
        config.source.kind = SourceKind::PolledTransform;

        let result = Driver::from_config(&config, table(), &LocalBus::new(), Arc::new(Recorder::new()));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingParameter { .. }))
        ));
    }

    #[test]
    fn test_bad_radius_is_rejected() {
        let config = SequencerConfig::new("unused.txt", 0.0);
        assert!(matches!(
            Driver::from_config(&config, table(), &LocalBus::new(), Arc::new(Recorder::new())),
            Err(Error::Config(ConfigError::InvalidParameter { .. }))
        ));
    }
}
