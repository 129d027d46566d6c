use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use setpoint_sequencer::transport::{jsonl, JsonLinesWriter};
use setpoint_sequencer::{Driver, LocalBus, RunOutcome, SequencerConfig, WaypointTable};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

/// Publish waypoints as live setpoints until the agent has visited them all.
///
/// Incoming poses and transforms are read from stdin as JSON lines of the
/// form {"topic": ..., "transform": ...}; everything the sequencer publishes
/// is written to stdout in the same form.
#[derive(Debug, Parser)]
#[command(name = "setpoint-sequencer", version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Waypoint file, overriding the configuration
    #[arg(short, long)]
    waypoints: Option<PathBuf>,

    /// Capture radius, overriding the configuration
    #[arg(short, long)]
    radius: Option<f64>,

    /// Stop when stdin reaches end of input
    #[arg(long)]
    exit_on_eof: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = SequencerConfig::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(waypoints) = args.waypoints {
        config.waypoints_path = waypoints;
    }
    if let Some(radius) = args.radius {
        config.capture_radius = radius;
    }

    let validation = config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    let table = WaypointTable::from_file(&config.waypoints_path)
        .with_context(|| format!("loading waypoints from {}", config.waypoints_path.display()))?;

    let inputs = LocalBus::new();
    let outputs = LocalBus::new();
    outputs.add_tap(Arc::new(JsonLinesWriter::new(io::stdout())));

    let mut driver = Driver::from_config(&config, table, &inputs, Arc::new(outputs))
        .context("configuring the sequencer")?;
    let shutdown = driver.shutdown_signal();
    shutdown
        .request_on_interrupt()
        .context("installing the interrupt handler")?;

    let exit_on_eof = args.exit_on_eof;
    thread::Builder::new()
        .name("stdin-pump".to_string())
        .spawn(move || {
            match jsonl::pump(io::stdin().lock(), &inputs) {
                Ok(stats) => info!(
                    "input closed after {} messages ({} rejected)",
                    stats.forwarded, stats.rejected
                ),
                Err(e) => warn!("reading stdin failed: {}", e),
            }
            if exit_on_eof {
                shutdown.request();
            }
        })
        .context("starting the input thread")?;

    let report = driver.run();
    match report.outcome {
        RunOutcome::Completed => info!("path complete after {} ticks", report.ticks),
        RunOutcome::Shutdown => info!("stopped after {} ticks", report.ticks),
    }

    Ok(())
}
