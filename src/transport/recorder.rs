//! Recording publisher for testing

use crate::core::TransformStamped;
use crate::transport::Publisher;
use parking_lot::Mutex;

/// Publisher that keeps every message it is given
#[derive(Default)]
pub struct Recorder {
    messages: Mutex<Vec<(String, TransformStamped)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded `(topic, message)` pairs in publish order
    pub fn messages(&self) -> Vec<(String, TransformStamped)> {
        self.messages.lock().clone()
    }

    /// Messages recorded on `topic`, in publish order
    pub fn on_topic(&self, topic: &str) -> Vec<TransformStamped> {
        self.messages
            .lock()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl Publisher for Recorder {
    fn publish(&self, topic: &str, message: &TransformStamped) {
        self.messages
            .lock()
            .push((topic.to_string(), message.clone()));
    }
}
