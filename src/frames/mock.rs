//! Scripted transform lookup for testing and simulation

use crate::core::{Timestamp, TransformStamped};
use crate::frames::{LookupError, LookupResult, TransformLookup};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup that replays a queue of canned answers, one per call.
///
/// Once the queue is drained every call fails with
/// [`LookupError::UnknownFrame`] for the requested child frame.
pub struct ScriptedLookup {
    script: Mutex<VecDeque<LookupResult<TransformStamped>>>,
    calls: AtomicUsize,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful answer
    pub fn push_ok(&self, transform: TransformStamped) -> &Self {
        self.script.lock().push_back(Ok(transform));
        self
    }

    /// Queue a failed answer
    pub fn push_err(&self, error: LookupError) -> &Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Queue `count` copies of the same failure
    pub fn fail_times(&self, count: usize, error: LookupError) -> &Self {
        let mut script = self.script.lock();
        for _ in 0..count {
            script.push_back(Err(error.clone()));
        }
        drop(script);
        self
    }

    /// Number of lookups served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl Default for ScriptedLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformLookup for ScriptedLookup {
    fn lookup_transform(
        &self,
        _parent: &str,
        child: &str,
        _time: Timestamp,
    ) -> LookupResult<TransformStamped> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LookupError::UnknownFrame {
                    frame: child.to_string(),
                })
            })
    }
}
