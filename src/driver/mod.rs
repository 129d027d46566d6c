//! Fixed-rate publish loop
//!
//! Each tick the driver optionally polls its position source and feeds the
//! result to the sequencer, then republishes the active setpoint. Once the
//! sequencer reports completion the notifier fires and the loop ends.

pub mod mission;
pub mod rate;
pub mod setup;

pub use mission::{Mission, SharedMission};
pub use rate::{Rate, ShutdownSignal};

use crate::core::{Timestamp, DEFAULT_RATE_HZ};
use crate::output::CompletionNotifier;
use crate::source::{EvaluationTrigger, PositionSource};
use crate::transport::Publisher;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The final waypoint was reached and the completion notice sent
    Completed,
    /// Shutdown was requested before completion
    Shutdown,
}

/// Summary returned by [`Driver::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub ticks: u64,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Completed,
}

/// Ties a position source, a mission and the outgoing signals together
pub struct Driver {
    mission: SharedMission,
    source: Box<dyn PositionSource>,
    publisher: Arc<dyn Publisher>,
    setpoint_topic: String,
    notifier: Option<CompletionNotifier>,
    period: Duration,
    startup_delay: Duration,
    shutdown: ShutdownSignal,
    ticks: u64,
}

impl Driver {
    pub fn new(
        mission: SharedMission,
        source: Box<dyn PositionSource>,
        publisher: Arc<dyn Publisher>,
        setpoint_topic: impl Into<String>,
        notifier: CompletionNotifier,
    ) -> Self {
        Self {
            mission,
            source,
            publisher,
            setpoint_topic: setpoint_topic.into(),
            notifier: Some(notifier),
            period: Duration::from_secs_f64(1.0 / DEFAULT_RATE_HZ),
            startup_delay: Duration::ZERO,
            shutdown: ShutdownSignal::new(),
            ticks: 0,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Use an externally owned shutdown signal
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn mission(&self) -> &SharedMission {
        &self.mission
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one cycle: evaluate, publish the setpoint, notify on completion
    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;
        let now = Timestamp::now();

        if self.source.trigger() == EvaluationTrigger::EveryTick {
            match self.source.poll() {
                Ok(position) => {
                    self.mission.lock().apply(&position, now);
                }
                Err(reason) => debug!("position unavailable: {}", reason),
            }
        }

        let (setpoint, completion) = {
            let mut mission = self.mission.lock();
            (mission.setpoint(now), mission.completion())
        };
        self.publisher.publish(&self.setpoint_topic, &setpoint);

        match completion {
            Some((final_waypoint, at)) => {
                if let Some(notifier) = self.notifier.take() {
                    notifier.fire(&final_waypoint, at);
                }
                TickOutcome::Completed
            }
            None => TickOutcome::Continue,
        }
    }

    /// Tick at the configured rate until completion or shutdown
    pub fn run(&mut self) -> RunReport {
        if !self.startup_delay.is_zero() {
            info!("waiting {:?} before starting", self.startup_delay);
            if !self.shutdown.sleep(self.startup_delay) {
                return self.report(RunOutcome::Shutdown);
            }
        }

        info!(
            "publishing setpoints on '{}' every {:?}",
            self.setpoint_topic, self.period
        );

        let mut rate = Rate::new(self.period);
        loop {
            if self.shutdown.is_requested() {
                return self.report(RunOutcome::Shutdown);
            }
            if self.tick() == TickOutcome::Completed {
                return self.report(RunOutcome::Completed);
            }
            if !rate.sleep() {
                debug!("tick {} overran the {:?} period", self.ticks, self.period);
            }
        }
    }

    fn report(&self, outcome: RunOutcome) -> RunReport {
        RunReport {
            outcome,
            ticks: self.ticks,
        }
    }
}
