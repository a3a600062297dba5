//! Event values emitted by detectors and a recording listener.
//!
//! [`EventLog`] implements both listener traits and can be cloned into every
//! detector of a host; clones share one log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::detectors::{DebugListener, Gesture, GestureListener};

/// One repetition-stream event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// A repetition was counted
    Detected { gesture: Gesture, count: usize },
    /// Progress snapshot
    Progress { gesture: Gesture, current: usize, required: usize },
    /// Required repetitions reached
    Completed { gesture: Gesture },
    /// Session expired before completion
    Timeout { gesture: Gesture },
}

impl GestureEvent {
    /// Gesture that produced this event
    #[must_use]
    pub const fn gesture(&self) -> Gesture {
        match *self {
            GestureEvent::Detected { gesture, .. }
            | GestureEvent::Progress { gesture, .. }
            | GestureEvent::Completed { gesture }
            | GestureEvent::Timeout { gesture } => gesture,
        }
    }
}

/// Human-readable diagnostics for one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DebugUpdate {
    /// Whether the needed body parts were seen
    pub pose_status: String,
    /// First gesture-specific metric (e.g. wrist distance, left knee lift)
    pub primary_metric: String,
    /// Second gesture-specific metric
    pub secondary_metric: String,
    /// Detector state and progress
    pub status: String,
}

impl DebugUpdate {
    #[must_use]
    pub fn new(pose_status: &str, primary_metric: &str, secondary_metric: &str, status: &str) -> Self {
        Self {
            pose_status: pose_status.to_string(),
            primary_metric: primary_metric.to_string(),
            secondary_metric: secondary_metric.to_string(),
            status: status.to_string(),
        }
    }
}

/// Shared, cloneable recorder of events and debug updates
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<GestureEvent>>>,
    debug_updates: Arc<Mutex<Vec<(Gesture, DebugUpdate)>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<GestureEvent> {
        lock(&self.events).clone()
    }

    /// Snapshot of all recorded debug updates, oldest first
    #[must_use]
    pub fn debug_updates(&self) -> Vec<(Gesture, DebugUpdate)> {
        lock(&self.debug_updates).clone()
    }

    /// Most recent debug update
    #[must_use]
    pub fn last_debug(&self) -> Option<(Gesture, DebugUpdate)> {
        lock(&self.debug_updates).last().cloned()
    }

    /// Remove and return every recorded event
    pub fn take_events(&self) -> Vec<GestureEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
        lock(&self.debug_updates).clear();
    }

    /// Number of `Detected` events for a gesture
    #[must_use]
    pub fn detections(&self, gesture: Gesture) -> usize {
        self.count_matching(|e| matches!(e, GestureEvent::Detected { gesture: g, .. } if *g == gesture))
    }

    /// Number of `Completed` events for a gesture
    #[must_use]
    pub fn completions(&self, gesture: Gesture) -> usize {
        self.count_matching(|e| *e == GestureEvent::Completed { gesture })
    }

    /// Number of `Timeout` events for a gesture
    #[must_use]
    pub fn timeouts(&self, gesture: Gesture) -> usize {
        self.count_matching(|e| *e == GestureEvent::Timeout { gesture })
    }

    fn count_matching(&self, predicate: impl Fn(&GestureEvent) -> bool) -> usize {
        lock(&self.events).iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: GestureEvent) {
        lock(&self.events).push(event);
    }
}

impl GestureListener for EventLog {
    fn on_detected(&mut self, gesture: Gesture, count: usize) {
        self.push(GestureEvent::Detected { gesture, count });
    }

    fn on_completed(&mut self, gesture: Gesture) {
        self.push(GestureEvent::Completed { gesture });
    }

    fn on_progress(&mut self, gesture: Gesture, current: usize, required: usize) {
        self.push(GestureEvent::Progress {
            gesture,
            current,
            required,
        });
    }

    fn on_detection_timeout(&mut self, gesture: Gesture) {
        self.push(GestureEvent::Timeout { gesture });
    }
}

impl DebugListener for EventLog {
    fn on_debug_update(&mut self, gesture: Gesture, update: &DebugUpdate) {
        lock(&self.debug_updates).push((gesture, update.clone()));
    }
}
