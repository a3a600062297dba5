//! Offline replay of a [`SessionRecording`] through a [`DetectorHost`].
//!
//! Time is driven by a [`ManualClock`] set to each frame's timestamp, so a
//! replay reproduces exactly the cooldowns, hold durations and timeouts of
//! the recorded session.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::clock::ManualClock;
use crate::config::Config;
use crate::detectors::{DebugListener, Gesture};
use crate::error::Result;
use crate::events::{DebugUpdate, EventLog, GestureEvent};
use crate::host::DetectorHost;
use crate::recording::SessionRecording;

/// How a replayed session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    TimedOut,
    /// Frames ran out before completion or timeout
    Incomplete,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Completed => "completed",
            Outcome::TimedOut => "timed out",
            Outcome::Incomplete => "incomplete",
        };
        f.write_str(text)
    }
}

/// Result of replaying one recording
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub gesture: Gesture,
    pub outcome: Outcome,
    pub count: usize,
    pub required: usize,
    /// Frames handed to the host before detection stopped
    pub frames_processed: usize,
    pub events: Vec<GestureEvent>,
}

/// Forwards debug updates to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDebugListener;

impl DebugListener for LogDebugListener {
    fn on_debug_update(&mut self, gesture: Gesture, update: &DebugUpdate) {
        debug!(
            "[{gesture}] {} | {} | {} | {}",
            update.pose_status, update.primary_metric, update.secondary_metric, update.status
        );
    }
}

/// Replay `recording`, using `motion` instead of the recorded motion type if given
pub fn replay(recording: &SessionRecording, config: &Config, motion: Option<&str>) -> Result<ReplayReport> {
    let start_ms = recording.frames.first().map_or(0, |frame| frame.timestamp_ms);
    let clock = ManualClock::new(start_ms);
    let log = EventLog::new();

    let mut host = DetectorHost::new(config, Arc::new(clock.clone()))?;
    host.set_listener(log.clone());
    host.set_debug_listener(LogDebugListener);

    let gesture = host.start_motion(motion.unwrap_or(&recording.motion))?;
    info!("Replaying {} frames as {gesture}", recording.frames.len());

    let mut frames_processed = 0;
    for frame in &recording.frames {
        if !host.is_detecting() {
            break;
        }
        clock.set(frame.timestamp_ms);
        host.on_pose_result(Some(&frame.pose_result()));
        frames_processed += 1;
    }

    let outcome = if log.completions(gesture) > 0 {
        Outcome::Completed
    } else if log.timeouts(gesture) > 0 {
        Outcome::TimedOut
    } else {
        Outcome::Incomplete
    };

    let detector = host.detector(gesture);
    Ok(ReplayReport {
        gesture,
        outcome,
        count: detector.current_count(),
        required: detector.required_count(),
        frames_processed,
        events: log.events(),
    })
}
