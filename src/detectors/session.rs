//! Lifecycle bookkeeping shared by every detector: active flag, start time,
//! timeout, cooldown, counted repetitions and listener dispatch.

use std::sync::Arc;

use log::{debug, info};

use super::{DebugListener, Gesture, GestureListener};
use crate::clock::Clock;
use crate::events::DebugUpdate;
use crate::landmark::{Landmark, PoseResult};

/// Placeholder for metrics that could not be computed this frame
pub const NOT_AVAILABLE: &str = "N/A";

/// Session state for one detector instance
pub struct DetectionSession {
    gesture: Gesture,
    clock: Arc<dyn Clock>,
    listener: Option<Box<dyn GestureListener>>,
    debug_listener: Option<Box<dyn DebugListener>>,
    required: usize,
    cooldown_ms: u64,
    timeout_ms: u64,
    active: bool,
    start_time_ms: u64,
    repetition_times: Vec<u64>,
}

impl DetectionSession {
    #[must_use]
    pub fn new(gesture: Gesture, required: usize, cooldown_ms: u64, timeout_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            gesture,
            clock,
            listener: None,
            debug_listener: None,
            required,
            cooldown_ms,
            timeout_ms,
            active: false,
            start_time_ms: 0,
            repetition_times: Vec::with_capacity(required),
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn set_listener(&mut self, listener: Box<dyn GestureListener>) {
        self.listener = Some(listener);
    }

    pub fn set_debug_listener(&mut self, listener: Box<dyn DebugListener>) {
        self.debug_listener = Some(listener);
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Mark active, record the start time and announce zero progress
    pub fn activate(&mut self) {
        info!("Starting {} detection", self.gesture);
        self.active = true;
        self.start_time_ms = self.now_ms();

        let (gesture, required) = (self.gesture, self.required);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress(gesture, 0, required);
        }
        self.debug(NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE, "Active");
    }

    /// Mark inactive; counted repetitions are kept
    pub fn deactivate(&mut self) {
        info!("Stopping {} detection", self.gesture);
        self.active = false;
        self.debug(NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE, "Inactive");
    }

    /// Forget counted repetitions and deactivate
    pub fn clear(&mut self) {
        self.repetition_times.clear();
        self.start_time_ms = 0;
        self.active = false;
    }

    /// Gate a frame before gesture-specific analysis.
    ///
    /// Returns the first person's landmarks when the detector is active, the
    /// session has not timed out and the frame is long enough. Otherwise the
    /// frame is reported on the debug channel (or the timeout fires) and
    /// `None` is returned.
    pub fn admit<'a>(&mut self, result: Option<&'a PoseResult>, min_len: usize, now_ms: u64) -> Option<&'a [Landmark]> {
        let landmarks = match result.and_then(PoseResult::first_person) {
            Some(landmarks) if self.active => landmarks,
            _ => {
                let status = if self.active { "Active - Waiting for pose" } else { "Inactive" };
                self.debug("No pose detected", NOT_AVAILABLE, NOT_AVAILABLE, status);
                return None;
            }
        };

        if now_ms.saturating_sub(self.start_time_ms) > self.timeout_ms {
            info!("{} detection timed out", self.gesture);
            let gesture = self.gesture;
            if let Some(listener) = self.listener.as_mut() {
                listener.on_detection_timeout(gesture);
            }
            self.deactivate();
            return None;
        }

        if landmarks.len() < min_len {
            self.debug("Insufficient landmarks", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Waiting for pose");
            return None;
        }

        Some(landmarks)
    }

    /// Whether enough time has passed since the last counted repetition
    pub fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        self.repetition_times
            .last()
            .map_or(true, |&last| now_ms.saturating_sub(last) > self.cooldown_ms)
    }

    /// Count one repetition, emitting detected/progress and, on the final
    /// one, completed. Returns `false` if the session is no longer active.
    pub fn register(&mut self, now_ms: u64) -> bool {
        if !self.active {
            return false;
        }

        self.repetition_times.push(now_ms);
        let count = self.repetition_times.len();
        let (gesture, required) = (self.gesture, self.required);
        debug!("{gesture} repetition counted: {count}/{required}");

        if let Some(listener) = self.listener.as_mut() {
            listener.on_detected(gesture, count);
            listener.on_progress(gesture, count, required);
        }

        if count >= required {
            info!("{gesture} sequence completed");
            if let Some(listener) = self.listener.as_mut() {
                listener.on_completed(gesture);
            }
            self.deactivate();
        }

        true
    }

    /// Send a diagnostics update, if anyone is listening
    pub fn debug(&mut self, pose_status: &str, primary: &str, secondary: &str, status: &str) {
        let gesture = self.gesture;
        if let Some(listener) = self.debug_listener.as_mut() {
            let update = DebugUpdate::new(pose_status, primary, secondary, status);
            listener.on_debug_update(gesture, &update);
        }
    }

    /// Standard "Active - <state> (n/m claps)" status line
    pub fn status_line(&self, state: &str) -> String {
        format!(
            "Active - {state} ({}/{} {})",
            self.count(),
            self.required,
            self.gesture.repetition_noun()
        )
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn count(&self) -> usize {
        self.repetition_times.len()
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn remaining_time_ms(&self) -> u64 {
        if !self.active {
            return 0;
        }
        let elapsed = self.now_ms().saturating_sub(self.start_time_ms);
        self.timeout_ms.saturating_sub(elapsed)
    }

    pub fn repetition_times(&self) -> &[u64] {
        &self.repetition_times
    }
}
