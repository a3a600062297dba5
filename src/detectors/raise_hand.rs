//! Hand-raise detection.
//!
//! Wrist height above the shoulder is smoothed per hand and compared with a
//! threshold proportional to shoulder width, so the same pose reads the same
//! near and far from the camera. Folded arms and hands tucked against the
//! shoulder are rejected with arm-length and horizontal-separation checks.
//!
//! A raise must be held for a minimum duration before it counts, counts at
//! most once per hold, and re-arms only after every hand is lowered.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::session::{DetectionSession, NOT_AVAILABLE};
use super::{Gesture, PoseClassifier};
use crate::clock::{Clock, SystemClock};
use crate::config::RaiseHandConfig;
use crate::constants::DETECTION_TIMEOUT_MS;
use crate::landmark::{required_len, BodyPart, Landmark};
use crate::utils::{all_visible, distance, ema};

const ARM_PARTS: [BodyPart; 7] = [
    BodyPart::Nose,
    BodyPart::LeftShoulder,
    BodyPart::RightShoulder,
    BodyPart::LeftElbow,
    BodyPart::RightElbow,
    BodyPart::LeftWrist,
    BodyPart::RightWrist,
];

/// Which hands are above the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaisedHand {
    None,
    Left,
    Right,
    Both,
}

impl RaisedHand {
    fn from_sides(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, true) => RaisedHand::Both,
            (true, false) => RaisedHand::Left,
            (false, true) => RaisedHand::Right,
            (false, false) => RaisedHand::None,
        }
    }

    pub fn is_raised(self) -> bool {
        self != RaisedHand::None
    }
}

impl fmt::Display for RaisedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RaisedHand::None => "none",
            RaisedHand::Left => "left",
            RaisedHand::Right => "right",
            RaisedHand::Both => "both",
        };
        f.write_str(name)
    }
}

/// Per-hold state: when the current raise started and whether it counted
#[derive(Debug, Clone, Copy, Default)]
struct Hold {
    since_ms: Option<u64>,
    counted: bool,
}

/// Counts hand raises
pub struct RaiseHandDetector {
    config: RaiseHandConfig,
    session: DetectionSession,
    hold: Hold,
    smoothed_left: f64,
    smoothed_right: f64,
    raised: RaisedHand,
}

impl RaiseHandDetector {
    /// Detector with default thresholds on the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Detector with default thresholds on the given clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(RaiseHandConfig::default(), DETECTION_TIMEOUT_MS, clock)
    }

    #[must_use]
    pub fn with_config(config: RaiseHandConfig, timeout_ms: u64, clock: Arc<dyn Clock>) -> Self {
        let session = DetectionSession::new(
            Gesture::RaiseHand,
            config.required_count,
            config.cooldown_ms,
            timeout_ms,
            clock,
        );
        Self {
            config,
            session,
            hold: Hold::default(),
            smoothed_left: 0.0,
            smoothed_right: 0.0,
            raised: RaisedHand::None,
        }
    }

    pub fn current_raise_count(&self) -> usize {
        self.session.count()
    }

    pub fn required_raise_count(&self) -> usize {
        self.session.required()
    }

    /// Hands judged raised on the last analyzed frame
    pub fn raised_hand(&self) -> RaisedHand {
        self.raised
    }

    /// Smoothed wrist heights above the shoulders `(left, right)`
    pub fn smoothed_heights(&self) -> (f64, f64) {
        (self.smoothed_left, self.smoothed_right)
    }

    /// Raise threshold for the given shoulder span
    fn adaptive_threshold(&self, shoulder_width: f64) -> f64 {
        let cfg = &self.config;
        let width = if shoulder_width.is_finite() {
            shoulder_width.max(cfg.min_shoulder_width)
        } else {
            cfg.min_shoulder_width
        };
        (width * cfg.adaptive_threshold_ratio).max(cfg.base_threshold * cfg.base_threshold_floor)
    }

    fn arm_valid(&self, shoulder: &Landmark, elbow: &Landmark, wrist: &Landmark) -> bool {
        distance(elbow, wrist) >= self.config.min_arm_length
            && (shoulder.x - wrist.x).abs() >= self.config.min_horizontal_separation
    }

    /// Advance the hold state machine for this frame's raised state
    fn track_hold(&mut self, raised: RaisedHand, now_ms: u64) {
        if !raised.is_raised() {
            if self.hold.since_ms.take().is_some() {
                debug!("Hand lowered, ready for next raise");
            }
            self.hold.counted = false;
            return;
        }

        let Some(since) = self.hold.since_ms else {
            debug!("Hand raised: {raised}");
            self.hold = Hold {
                since_ms: Some(now_ms),
                counted: false,
            };
            return;
        };

        if !self.hold.counted
            && now_ms.saturating_sub(since) >= self.config.min_raise_duration_ms
            && self.session.cooldown_elapsed(now_ms)
        {
            self.session.register(now_ms);
            self.hold.counted = true;
        }
    }

    fn status(&self, now_ms: u64) -> String {
        match self.hold.since_ms {
            Some(since) => {
                let counted = if self.hold.counted { " [COUNTED]" } else { "" };
                let state = format!(
                    "Holding {} hand ({}ms){counted}",
                    self.raised,
                    now_ms.saturating_sub(since)
                );
                self.session.status_line(&state)
            }
            None => self.session.status_line("Raise hand"),
        }
    }
}

impl Default for RaiseHandDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseClassifier for RaiseHandDetector {
    fn session(&self) -> &DetectionSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DetectionSession {
        &mut self.session
    }

    fn min_landmarks(&self) -> usize {
        required_len(&ARM_PARTS)
    }

    fn clear_state(&mut self) {
        self.hold = Hold::default();
        self.smoothed_left = 0.0;
        self.smoothed_right = 0.0;
        self.raised = RaisedHand::None;
    }

    fn classify(&mut self, landmarks: &[Landmark], now_ms: u64) {
        let (
            Some(left_shoulder),
            Some(right_shoulder),
            Some(left_elbow),
            Some(right_elbow),
            Some(left_wrist),
            Some(right_wrist),
        ) = (
            BodyPart::LeftShoulder.of(landmarks),
            BodyPart::RightShoulder.of(landmarks),
            BodyPart::LeftElbow.of(landmarks),
            BodyPart::RightElbow.of(landmarks),
            BodyPart::LeftWrist.of(landmarks),
            BodyPart::RightWrist.of(landmarks),
        )
        else {
            self.session
                .debug("Insufficient landmarks", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Waiting for pose");
            return;
        };

        // Elbows are not gated: they are often low-confidence on raised arms
        if !all_visible(
            &[left_wrist, right_wrist, left_shoulder, right_shoulder],
            self.config.visibility_threshold,
        ) {
            self.session
                .debug("Hands not visible", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Show hands");
            return;
        }

        let threshold = self.adaptive_threshold((left_shoulder.x - right_shoulder.x).abs());

        // Positive = wrist above shoulder
        let alpha = self.config.smoothing_alpha;
        self.smoothed_left = ema(self.smoothed_left, left_shoulder.y - left_wrist.y, alpha);
        self.smoothed_right = ema(self.smoothed_right, right_shoulder.y - right_wrist.y, alpha);

        let left_valid = self.arm_valid(left_shoulder, left_elbow, left_wrist);
        let right_valid = self.arm_valid(right_shoulder, right_elbow, right_wrist);
        let left_raised = left_valid && self.smoothed_left > threshold;
        let right_raised = right_valid && self.smoothed_right > threshold;

        self.raised = RaisedHand::from_sides(left_raised, right_raised);
        self.track_hold(self.raised, now_ms);

        let describe = |height: f64, raised: bool, valid: bool| {
            format!(
                "{height:.3} (thresh: {threshold:.3}) {}{}",
                if raised { "up" } else { "down" },
                if valid { "" } else { " (arm invalid)" }
            )
        };
        let left_text = describe(self.smoothed_left, left_raised, left_valid);
        let right_text = describe(self.smoothed_right, right_raised, right_valid);
        let status = self.status(now_ms);
        self.session.debug("Hands visible", &left_text, &right_text, &status);
    }
}
