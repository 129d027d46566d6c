//! Walks a three-waypoint path with a polled transform source.
//!
//! The frame graph is replaced by a scripted lookup that fails a few times
//! before the camera pose becomes available, then moves the camera through
//! each capture radius in turn.

use nalgebra::Isometry3;
use setpoint_sequencer::frames::ScriptedLookup;
use setpoint_sequencer::transport::Recorder;
use setpoint_sequencer::{
    CompletionNotifier, DistanceMode, Driver, LookupError, Mission, PolledTransform, Sequencer,
    SetpointEmitter, Timestamp, TransformStamped, WaypointTable,
};
use std::sync::Arc;
use std::time::Duration;

const PATH: &str = "\
0 0 1 0 0 0 1
2 0 1 0 0 0.7071 0.7071
2 2 1 0 0 1 0
";

fn camera_at(x: f64, y: f64, z: f64) -> TransformStamped {
    TransformStamped::from_isometry(
        Timestamp::now(),
        "map",
        "camera",
        &Isometry3::translation(x, y, z),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("=== Setpoint Sequencer - Polled Transform Demo ===\n");

    let table = Arc::new(WaypointTable::parse(PATH)?);
    println!("Loaded {} waypoints", table.len());

    let lookup = Arc::new(ScriptedLookup::new());
    lookup
        .fail_times(
            3,
            LookupError::NotConnected {
                parent: "map".to_string(),
                child: "camera".to_string(),
            },
        )
        .push_ok(camera_at(0.05, 0.0, 1.0))
        .push_ok(camera_at(1.0, 0.0, 1.0))
        .push_ok(camera_at(1.9, 0.05, 1.0))
        .push_err(LookupError::UnknownFrame {
            frame: "camera".to_string(),
        })
        .push_ok(camera_at(2.0, 1.0, 1.0))
        .push_ok(camera_at(2.0, 1.95, 1.1));

    let recorder = Arc::new(Recorder::new());
    let sequencer = Sequencer::new(table.clone(), 0.2, DistanceMode::Full3d)?;
    let emitter = SetpointEmitter::new(table.first(), "map", "setpoint");
    let mission = Mission::new(sequencer, emitter).shared();

    let source = PolledTransform::new(lookup.clone(), "map", "camera")
        .with_observer(recorder.clone(), "observed_pose");
    let mut driver = Driver::new(
        mission.clone(),
        Box::new(source),
        recorder.clone(),
        "setpoints",
        CompletionNotifier::new(recorder.clone(), "setpoint_complete"),
    )
    .with_period(Duration::from_millis(10));

    let report = driver.run();

    println!("\nOutcome: {:?} after {} ticks", report.outcome, report.ticks);
    println!("Lookups served: {}", lookup.calls());
    println!("Observed poses: {}", recorder.on_topic("observed_pose").len());

    println!("\nSetpoints published:");
    for setpoint in recorder.on_topic("setpoints") {
        let p = setpoint.position();
        println!(
            "  t={:.3}s  ({:.2}, {:.2}, {:.2})",
            setpoint.stamp.as_secs_f64(),
            p.x,
            p.y,
            p.z
        );
    }

    for notice in recorder.on_topic("setpoint_complete") {
        let p = notice.position();
        println!(
            "\nCompletion notice on '{}': final waypoint ({:.2}, {:.2}, {:.2})",
            notice.frame_id, p.x, p.y, p.z
        );
    }

    Ok(())
}
