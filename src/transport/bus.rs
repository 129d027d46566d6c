//! In-process publish/subscribe bus

use crate::core::TransformStamped;
use crate::transport::Publisher;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked for every message on a subscribed topic
pub type MessageCallback = Box<dyn Fn(&TransformStamped) + Send + Sync>;

/// Subscription registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

type Subscribers = Vec<(SubscriptionHandle, Arc<MessageCallback>)>;

#[derive(Default)]
struct BusInner {
    topics: RwLock<HashMap<String, Subscribers>>,
    taps: RwLock<Vec<Arc<dyn Publisher>>>,
    next_handle: AtomicU64,
}

/// Topic bus delivering messages synchronously on the publishing thread.
///
/// Cloning yields another handle to the same bus. Besides per-topic
/// subscribers, a bus can carry taps that see every message on every topic
/// (used to mirror traffic to stdout).
#[derive(Clone, Default)]
pub struct LocalBus {
    inner: Arc<BusInner>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for messages on `topic`
    pub fn subscribe(&self, topic: &str, callback: MessageCallback) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.inner.next_handle.fetch_add(1, Ordering::Relaxed));
        self.inner
            .topics
            .write()
            .entry(topic.to_string())
            .or_default()
            .push((handle, Arc::new(callback)));
        handle
    }

    /// Remove a subscription. Returns false if the handle was unknown.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut topics = self.inner.topics.write();
        for subscribers in topics.values_mut() {
            if let Some(index) = subscribers.iter().position(|(h, _)| *h == handle) {
                subscribers.remove(index);
                return true;
            }
        }
        false
    }

    /// Mirror every published message to `tap`
    pub fn add_tap(&self, tap: Arc<dyn Publisher>) {
        self.inner.taps.write().push(tap);
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .topics
            .read()
            .get(topic)
            .map_or(0, |subscribers| subscribers.len())
    }
}

impl Publisher for LocalBus {
    fn publish(&self, topic: &str, message: &TransformStamped) {
        // Callbacks run without the lock held so they may publish themselves
        let callbacks: Vec<Arc<MessageCallback>> = self
            .inner
            .topics
            .read()
            .get(topic)
            .map(|subscribers| subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default();
        let taps: Vec<Arc<dyn Publisher>> = self.inner.taps.read().clone();

        for callback in callbacks {
            (**callback)(message);
        }
        for tap in taps {
            tap.publish(topic, message);
        }
    }
}
