//! Loop pacing and cooperative shutdown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Granularity of interruptible sleeps
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Keeps a loop running at a fixed period
#[derive(Debug, Clone)]
pub struct Rate {
    period: Duration,
    deadline: Instant,
}

impl Rate {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: Instant::now() + period,
        }
    }

    /// None unless `hz` is positive and yields a representable period
    pub fn from_hz(hz: f64) -> Option<Self> {
        if !(hz.is_finite() && hz > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / hz).ok().map(Self::new)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep until the end of the current period.
    ///
    /// Returns false if the period had already elapsed. In that case the
    /// schedule restarts from now rather than trying to catch up.
    pub fn sleep(&mut self) -> bool {
        let now = Instant::now();
        if now >= self.deadline {
            self.deadline = now + self.period;
            return false;
        }

        thread::sleep(self.deadline - now);
        self.deadline += self.period;
        true
    }
}

/// Stop request shared between the loop and whoever may end it
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Request shutdown when the process receives SIGINT or SIGTERM.
    ///
    /// Only one such handler can exist per process.
    pub fn request_on_interrupt(&self) -> Result<(), ctrlc::Error> {
        let signal = self.clone();
        ctrlc::set_handler(move || signal.request())
    }

    /// Sleep for `duration` unless shutdown is requested first.
    /// Returns true if the full duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let until = Instant::now() + duration;
        loop {
            if self.is_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= until {
                return true;
            }
            thread::sleep((until - now).min(SHUTDOWN_POLL_INTERVAL));
        }
    }
}
