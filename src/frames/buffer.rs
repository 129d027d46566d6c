//! In-memory frame graph with bounded history
//!
//! Every received transform describes one edge `frame_id -> child_frame_id`.
//! Each child frame has exactly one parent and keeps a short, time-ordered
//! history of samples so lookups between two samples can be interpolated.
//! Chains are resolved through the closest common ancestor of both frames.

use crate::core::{Timestamp, TransformStamped, DEFAULT_TRANSFORM_CACHE};
use crate::frames::{LookupError, LookupResult, TransformLookup};
use crate::transport::{LocalBus, SubscriptionHandle};
use log::{debug, warn};
use nalgebra::{Isometry3, Translation3};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Guard against malformed graphs
const MAX_CHAIN_DEPTH: usize = 64;

/// Rotations closer than this to 180 degrees apart are not interpolated
const SLERP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Sample {
    stamp: Timestamp,
    transform: Isometry3<f64>,
}

/// History of a single edge, ordered oldest to newest
#[derive(Debug)]
struct FrameHistory {
    parent: String,
    samples: VecDeque<Sample>,
}

impl FrameHistory {
    fn new(parent: &str) -> Self {
        Self {
            parent: parent.to_string(),
            samples: VecDeque::new(),
        }
    }

    fn insert(&mut self, sample: Sample, cache_duration: Duration) {
        match self.samples.iter().rposition(|s| s.stamp <= sample.stamp) {
            Some(i) if self.samples[i].stamp == sample.stamp => self.samples[i] = sample,
            Some(i) => self.samples.insert(i + 1, sample),
            None => self.samples.push_front(sample),
        }

        if let Some(newest) = self.samples.back().map(|s| s.stamp) {
            let horizon = newest.saturating_sub(cache_duration);
            while self.samples.front().is_some_and(|s| s.stamp < horizon) {
                self.samples.pop_front();
            }
        }
    }

    fn bounds(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.samples.front()?.stamp, self.samples.back()?.stamp))
    }

    fn sample_at(&self, frame: &str, time: Timestamp) -> LookupResult<Isometry3<f64>> {
        let (oldest, newest) = self.bounds().ok_or_else(|| LookupError::UnknownFrame {
            frame: frame.to_string(),
        })?;
        if time < oldest || time > newest {
            return Err(LookupError::extrapolation(frame, time, oldest, newest));
        }

        let upper = self
            .samples
            .iter()
            .position(|s| s.stamp >= time)
            .unwrap_or(self.samples.len() - 1);
        let after = &self.samples[upper];
        if after.stamp == time || upper == 0 {
            return Ok(after.transform);
        }

        let before = &self.samples[upper - 1];
        let span = after.stamp.saturating_duration_since(before.stamp).as_secs_f64();
        let t = time.saturating_duration_since(before.stamp).as_secs_f64() / span;
        Ok(interpolate(&before.transform, &after.transform, t))
    }
}

fn interpolate(a: &Isometry3<f64>, b: &Isometry3<f64>, t: f64) -> Isometry3<f64> {
    let translation = a.translation.vector.lerp(&b.translation.vector, t);
    let rotation = a
        .rotation
        .try_slerp(&b.rotation, t, SLERP_EPSILON)
        .unwrap_or(if t < 0.5 { a.rotation } else { b.rotation });
    Isometry3::from_parts(Translation3::from(translation), rotation)
}

/// Frame graph answering [`TransformLookup`] queries from received transforms
pub struct TransformBuffer {
    frames: RwLock<HashMap<String, FrameHistory>>,
    cache_duration: Duration,
}

impl TransformBuffer {
    pub fn new() -> Self {
        Self::with_cache_duration(DEFAULT_TRANSFORM_CACHE)
    }

    /// Create a buffer keeping `cache_duration` of history per frame
    pub fn with_cache_duration(cache_duration: Duration) -> Self {
        Self {
            frames: RwLock::new(HashMap::new()),
            cache_duration,
        }
    }

    /// Record one edge of the graph.
    ///
    /// Returns false when the transform was rejected (self-referencing edge).
    /// A child that shows up under a new parent drops its old history.
    pub fn insert(&self, transform: &TransformStamped) -> bool {
        if transform.frame_id == transform.child_frame_id {
            warn!(
                "Ignoring transform from frame '{}' to itself",
                transform.frame_id
            );
            return false;
        }

        let mut frames = self.frames.write();
        let history = frames
            .entry(transform.child_frame_id.clone())
            .or_insert_with(|| FrameHistory::new(&transform.frame_id));

        if history.parent != transform.frame_id {
            debug!(
                "Frame '{}' re-parented from '{}' to '{}'",
                transform.child_frame_id, history.parent, transform.frame_id
            );
            *history = FrameHistory::new(&transform.frame_id);
        }

        history.insert(
            Sample {
                stamp: transform.stamp,
                transform: transform.isometry(),
            },
            self.cache_duration,
        );
        true
    }

    /// Subscribe this buffer to transforms published on `topic`
    pub fn attach(self: &Arc<Self>, bus: &LocalBus, topic: &str) -> SubscriptionHandle {
        let buffer = Arc::clone(self);
        bus.subscribe(
            topic,
            Box::new(move |transform| {
                buffer.insert(transform);
            }),
        )
    }

    /// Whether `frame` appears anywhere in the graph
    pub fn knows_frame(&self, frame: &str) -> bool {
        Self::is_known(&self.frames.read(), frame)
    }

    /// Number of child frames with history
    pub fn frame_count(&self) -> usize {
        self.frames.read().len()
    }

    fn is_known(frames: &HashMap<String, FrameHistory>, frame: &str) -> bool {
        frames.contains_key(frame) || frames.values().any(|h| h.parent == frame)
    }

    /// `start` followed by its ancestors, root last
    fn chain_to_root(frames: &HashMap<String, FrameHistory>, start: &str) -> Vec<String> {
        let mut chain = vec![start.to_string()];
        let mut current = start;

        while let Some(history) = frames.get(current) {
            if chain.len() >= MAX_CHAIN_DEPTH || chain.contains(&history.parent) {
                warn!("Frame graph loop detected above frame '{}'", start);
                break;
            }
            chain.push(history.parent.clone());
            current = &history.parent;
        }

        chain
    }

    /// Pose of `chain[0]` in the parent of the last frame of `chain`, at `time`
    fn compose(
        frames: &HashMap<String, FrameHistory>,
        chain: &[String],
        time: Timestamp,
    ) -> LookupResult<Isometry3<f64>> {
        let mut transform = Isometry3::identity();
        for frame in chain {
            let history = frames.get(frame).ok_or_else(|| LookupError::UnknownFrame {
                frame: frame.clone(),
            })?;
            transform = history.sample_at(frame, time)? * transform;
        }
        Ok(transform)
    }
}

impl Default for TransformBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformLookup for TransformBuffer {
    fn lookup_transform(
        &self,
        parent: &str,
        child: &str,
        time: Timestamp,
    ) -> LookupResult<TransformStamped> {
        let frames = self.frames.read();

        for frame in [parent, child] {
            if !Self::is_known(&frames, frame) {
                return Err(LookupError::UnknownFrame {
                    frame: frame.to_string(),
                });
            }
        }

        if parent == child {
            return Ok(TransformStamped::from_isometry(
                time,
                parent,
                child,
                &Isometry3::identity(),
            ));
        }

        let child_chain = Self::chain_to_root(&frames, child);
        let parent_chain = Self::chain_to_root(&frames, parent);

        let (child_edges, parent_edges) = child_chain
            .iter()
            .enumerate()
            .find_map(|(i, frame)| {
                parent_chain
                    .iter()
                    .position(|candidate| candidate == frame)
                    .map(|j| (i, j))
            })
            .ok_or_else(|| LookupError::NotConnected {
                parent: parent.to_string(),
                child: child.to_string(),
            })?;

        let child_path = &child_chain[..child_edges];
        let parent_path = &parent_chain[..parent_edges];

        let time = if time.is_latest() {
            // Newest instant at which every edge on the path has data
            child_path
                .iter()
                .chain(parent_path)
                .filter_map(|frame| frames.get(frame).and_then(FrameHistory::bounds))
                .map(|(_, newest)| newest)
                .min()
                .unwrap_or(Timestamp::LATEST)
        } else {
            time
        };

        let ancestor_from_child = Self::compose(&frames, child_path, time)?;
        let ancestor_from_parent = Self::compose(&frames, parent_path, time)?;
        let transform = ancestor_from_parent.inverse() * ancestor_from_child;

        Ok(TransformStamped::from_isometry(time, parent, child, &transform))
    }
}
