//! Wave detection.
//!
//! Both wrists must be raised relative to the shoulders. While they are, the
//! per-frame horizontal wrist motion is compared with the previous frame:
//! hands moving apart or together beyond the pair threshold is one wave
//! half-cycle, and a single hand moving beyond the (larger) single-hand
//! threshold is accepted as a fallback.

use std::sync::Arc;

use log::debug;

use super::session::{DetectionSession, NOT_AVAILABLE};
use super::{Gesture, PoseClassifier};
use crate::clock::{Clock, SystemClock};
use crate::config::WaveConfig;
use crate::constants::DETECTION_TIMEOUT_MS;
use crate::landmark::{required_len, BodyPart, Landmark};
use crate::utils::all_visible;

const ARM_PARTS: [BodyPart; 4] = [
    BodyPart::LeftShoulder,
    BodyPart::RightShoulder,
    BodyPart::LeftWrist,
    BodyPart::RightWrist,
];

/// Horizontal motion classification for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveMotion {
    /// No qualifying motion (or first frame with hands up)
    None,
    /// Both hands moved in opposite directions
    Paired,
    /// Only one hand moved far enough
    SingleHand,
}

impl WaveMotion {
    fn is_wave(self) -> bool {
        self != WaveMotion::None
    }
}

/// Counts waves
pub struct WaveDetector {
    config: WaveConfig,
    session: DetectionSession,
    /// Wrist x positions from the previous hands-up frame
    last_wrist_x: Option<(f64, f64)>,
    last_heights: (f64, f64),
    last_motion: WaveMotion,
}

impl WaveDetector {
    /// Standing preset on the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Standing preset on the given clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(WaveConfig::standing(), DETECTION_TIMEOUT_MS, clock)
    }

    /// Seated preset on the given clock
    #[must_use]
    pub fn seated(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(WaveConfig::seated(), DETECTION_TIMEOUT_MS, clock)
    }

    #[must_use]
    pub fn with_config(config: WaveConfig, timeout_ms: u64, clock: Arc<dyn Clock>) -> Self {
        let session = DetectionSession::new(
            Gesture::Wave,
            config.required_count,
            config.cooldown_ms,
            timeout_ms,
            clock,
        );
        Self {
            config,
            session,
            last_wrist_x: None,
            last_heights: (0.0, 0.0),
            last_motion: WaveMotion::None,
        }
    }

    pub fn current_wave_count(&self) -> usize {
        self.session.count()
    }

    pub fn required_wave_count(&self) -> usize {
        self.session.required()
    }

    /// Motion classification of the last hands-up frame
    pub fn last_motion(&self) -> WaveMotion {
        self.last_motion
    }

    fn detect_wave_motion(&mut self, left_x: f64, right_x: f64) -> WaveMotion {
        let Some((prev_left, prev_right)) = self.last_wrist_x.replace((left_x, right_x)) else {
            return WaveMotion::None;
        };

        let left_movement = left_x - prev_left;
        let right_movement = right_x - prev_right;

        let left_significant = left_movement.abs() > self.config.horizontal_threshold;
        let right_significant = right_movement.abs() > self.config.horizontal_threshold;
        let outward = left_movement < 0.0 && right_movement > 0.0;
        let inward = left_movement > 0.0 && right_movement < 0.0;

        if left_significant && right_significant && (outward || inward) {
            WaveMotion::Paired
        } else if left_movement.abs() > self.config.single_hand_threshold
            || right_movement.abs() > self.config.single_hand_threshold
        {
            WaveMotion::SingleHand
        } else {
            WaveMotion::None
        }
    }
}

impl Default for WaveDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseClassifier for WaveDetector {
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
        self.last_wrist_x = None;
        self.last_heights = (0.0, 0.0);
        self.last_motion = WaveMotion::None;
    }

    fn classify(&mut self, landmarks: &[Landmark], now_ms: u64) {
        let (Some(left_shoulder), Some(right_shoulder), Some(left_wrist), Some(right_wrist)) = (
            BodyPart::LeftShoulder.of(landmarks),
            BodyPart::RightShoulder.of(landmarks),
            BodyPart::LeftWrist.of(landmarks),
            BodyPart::RightWrist.of(landmarks),
        ) else {
            self.session
                .debug("Insufficient landmarks", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Waiting for pose");
            return;
        };

        if !all_visible(
            &[left_shoulder, right_shoulder, left_wrist, right_wrist],
            self.config.visibility_threshold,
        ) {
            self.last_wrist_x = None;
            self.session
                .debug("Hands not visible", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Show both hands up");
            return;
        }

        // Positive = wrist above shoulder
        let left_height = left_shoulder.y - left_wrist.y;
        let right_height = right_shoulder.y - right_wrist.y;
        self.last_heights = (left_height, right_height);

        let threshold = self.config.hands_up_threshold;
        let hands_up = left_height > threshold && right_height > threshold;
        if !hands_up {
            // Stale positions would fake a half-cycle on the next raise
            self.last_wrist_x = None;
            self.last_motion = WaveMotion::None;
            self.session.debug(
                "Hands visible",
                &format!("L:{left_height:.3} R:{right_height:.3} (need >{threshold:.3})"),
                "Hands not raised",
                "Active - Raise both hands",
            );
            return;
        }

        let motion = self.detect_wave_motion(left_wrist.x, right_wrist.x);
        self.last_motion = motion;
        if motion.is_wave() && self.session.cooldown_elapsed(now_ms) {
            debug!("Wave motion: {motion:?}");
            self.session.register(now_ms);
        }

        let heights = format!("L:{left_height:.3} R:{right_height:.3} (thresh:{threshold:.3})");
        let movement = format!("L-X:{:.3} R-X:{:.3}", left_wrist.x, right_wrist.x);
        let status = self
            .session
            .status_line(if motion.is_wave() { "WAVING" } else { "Wave both hands" });
        self.session.debug("Both hands visible", &heights, &movement, &status);
    }
}
