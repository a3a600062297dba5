//! March (marching in place) detection.
//!
//! The first visible frames calibrate a standing knee height per leg. After
//! that, each knee's rise above its baseline is compared with a threshold
//! scaled by that leg's hip-to-knee length, and a leg that stays lifted for a
//! few consecutive frames counts one step on its rising edge.

use std::sync::Arc;

use super::session::{DetectionSession, NOT_AVAILABLE};
use super::{Gesture, PoseClassifier};
use crate::clock::{Clock, SystemClock};
use crate::config::MarchConfig;
use crate::constants::DETECTION_TIMEOUT_MS;
use crate::landmark::{required_len, BodyPart, Landmark};
use crate::utils::all_visible;

const LEG_PARTS: [BodyPart; 6] = [
    BodyPart::LeftHip,
    BodyPart::RightHip,
    BodyPart::LeftKnee,
    BodyPart::RightKnee,
    BodyPart::LeftAnkle,
    BodyPart::RightAnkle,
];

/// Which leg a step was taken with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Left,
    Right,
}

/// Rising-edge tracker for one leg
#[derive(Debug, Clone, Copy, Default)]
struct LegTracker {
    frames_lifted: u32,
    was_lifted: bool,
}

impl LegTracker {
    /// Feed one frame; true on the frame the lift becomes a step
    fn update(&mut self, lifted: bool, min_frames: u32) -> bool {
        if lifted {
            self.frames_lifted += 1;
        } else {
            self.frames_lifted = 0;
        }

        if lifted && self.frames_lifted >= min_frames && !self.was_lifted {
            self.was_lifted = true;
            return true;
        }
        if !lifted {
            self.was_lifted = false;
        }
        false
    }
}

/// Standing knee heights, accumulated over the first visible frames
#[derive(Debug, Clone, Copy, Default)]
struct Calibration {
    frames: u32,
    sum_left: f64,
    sum_right: f64,
    baseline: Option<(f64, f64)>,
}

/// Counts marching steps
pub struct MarchDetector {
    config: MarchConfig,
    session: DetectionSession,
    calibration: Calibration,
    left: LegTracker,
    right: LegTracker,
    last_knee_lift: (f64, f64),
}

impl MarchDetector {
    /// Detector with default thresholds on the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Detector with default thresholds on the given clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(MarchConfig::default(), DETECTION_TIMEOUT_MS, clock)
    }

    #[must_use]
    pub fn with_config(config: MarchConfig, timeout_ms: u64, clock: Arc<dyn Clock>) -> Self {
        let session = DetectionSession::new(
            Gesture::March,
            config.required_count,
            config.cooldown_ms,
            timeout_ms,
            clock,
        );
        Self {
            config,
            session,
            calibration: Calibration::default(),
            left: LegTracker::default(),
            right: LegTracker::default(),
            last_knee_lift: (0.0, 0.0),
        }
    }

    pub fn current_step_count(&self) -> usize {
        self.session.count()
    }

    pub fn required_step_count(&self) -> usize {
        self.session.required()
    }

    /// Calibrated standing knee heights `(left, right)`, once set
    pub fn baseline(&self) -> Option<(f64, f64)> {
        self.calibration.baseline
    }

    /// Leg currently held up long enough to count, if any
    pub fn lifted_leg(&self) -> Option<Leg> {
        let min = self.config.min_frames_lifted;
        if self.left.frames_lifted >= min {
            Some(Leg::Left)
        } else if self.right.frames_lifted >= min {
            Some(Leg::Right)
        } else {
            None
        }
    }

    fn calibrate(&mut self, left_knee_y: f64, right_knee_y: f64) {
        let target = self.config.baseline_frames;
        let cal = &mut self.calibration;
        cal.sum_left += left_knee_y;
        cal.sum_right += right_knee_y;
        cal.frames += 1;

        if cal.frames >= target {
            let n = f64::from(target);
            cal.baseline = Some((cal.sum_left / n, cal.sum_right / n));
            self.session.debug("Baseline Set!", "OK", "OK", "Start marching!");
        } else {
            let progress = format!("Calibrating ({}/{target})", cal.frames);
            self.session.debug(&progress, "Wait", "Wait", "Stand still");
        }
    }

    fn leg_threshold(&self, hip: &Landmark, knee: &Landmark) -> f64 {
        let leg_length = (hip.y - knee.y).abs();
        self.config.base_threshold + leg_length * self.config.leg_length_multiplier
    }

    fn step_taken(&mut self, leg: Leg, now_ms: u64) {
        // The edge is consumed even when the cooldown suppresses the count
        if self.session.cooldown_elapsed(now_ms) {
            log::debug!("March step ({leg:?})");
            self.session.register(now_ms);
        }
    }
}

impl Default for MarchDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseClassifier for MarchDetector {
    fn session(&self) -> &DetectionSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DetectionSession {
        &mut self.session
    }

    fn min_landmarks(&self) -> usize {
        required_len(&LEG_PARTS)
    }

    fn clear_state(&mut self) {
        self.calibration = Calibration::default();
        self.left = LegTracker::default();
        self.right = LegTracker::default();
        self.last_knee_lift = (0.0, 0.0);
    }

    fn classify(&mut self, landmarks: &[Landmark], now_ms: u64) {
        let parts: Vec<&Landmark> = LEG_PARTS.iter().filter_map(|p| p.of(landmarks)).collect();
        if parts.len() != LEG_PARTS.len() {
            self.session
                .debug("Insufficient landmarks", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Waiting for pose");
            return;
        }
        if !all_visible(&parts, self.config.visibility_threshold) {
            self.session
                .debug("Body not fully visible", NOT_AVAILABLE, NOT_AVAILABLE, "Adjust camera");
            return;
        }
        // Order follows LEG_PARTS
        let (left_hip, right_hip, left_knee, right_knee) = (parts[0], parts[1], parts[2], parts[3]);

        let Some((base_left, base_right)) = self.calibration.baseline else {
            self.calibrate(left_knee.y, right_knee.y);
            return;
        };

        // Positive = knee above its standing height
        let left_change = base_left - left_knee.y;
        let right_change = base_right - right_knee.y;
        self.last_knee_lift = (left_change, right_change);

        let left_threshold = self.leg_threshold(left_hip, left_knee);
        let right_threshold = self.leg_threshold(right_hip, right_knee);

        let min_frames = self.config.min_frames_lifted;
        if self.left.update(left_change > left_threshold, min_frames) {
            self.step_taken(Leg::Left, now_ms);
        }
        if self.right.update(right_change > right_threshold, min_frames) {
            self.step_taken(Leg::Right, now_ms);
        }

        let lifted = match self.lifted_leg() {
            Some(Leg::Left) => "left",
            Some(Leg::Right) => "right",
            None => "none",
        };
        let left_text = format!(
            "{left_change:.3} (thr {left_threshold:.3}) [{}]",
            self.left.frames_lifted
        );
        let right_text = format!(
            "{right_change:.3} (thr {right_threshold:.3}) [{}]",
            self.right.frames_lifted
        );
        let status = format!(
            "Lift: {lifted}   Steps: {}/{}",
            self.session.count(),
            self.session.required()
        );
        self.session.debug("Body OK", &left_text, &right_text, &status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_tracker_rising_edge() {
        let mut leg = LegTracker::default();
        assert!(!leg.update(true, 2));
        assert!(leg.update(true, 2));
        // Held: no repeat
        assert!(!leg.update(true, 2));
        assert!(!leg.update(false, 2));
        assert!(!leg.update(true, 2));
        assert!(leg.update(true, 2));
    }

    #[test]
    fn test_single_frame_lift_is_ignored() {
        let mut leg = LegTracker::default();
        assert!(!leg.update(true, 2));
        assert!(!leg.update(false, 2));
        assert!(!leg.update(true, 2));
        assert_eq!(leg.frames_lifted, 1);
    }

    #[test]
    fn test_threshold_scales_with_leg_length() {
        let detector = MarchDetector::new();
        let hip = Landmark::new(0.4, 0.5);
        let short = detector.leg_threshold(&hip, &Landmark::new(0.4, 0.6));
        let long = detector.leg_threshold(&hip, &Landmark::new(0.4, 0.7));
        assert!((short - 0.085).abs() < 1e-12);
        assert!(long > short);
    }

    #[test]
    fn test_short_frame_reports_insufficient_landmarks() {
        use crate::detectors::{GestureDetector, PoseClassifier};
        use crate::events::EventLog;

        let log = EventLog::new();
        let mut detector = MarchDetector::new();
        detector.set_debug_listener(Box::new(log.clone()));

        // Hips are present, knees and ankles are cut off
        let short = vec![Landmark::with_visibility(0.5, 0.5, 0.9); 25];
        detector.classify(&short, 0);

        let (gesture, update) = log.last_debug().unwrap();
        assert_eq!(gesture, detector.gesture());
        assert_eq!(update.pose_status, "Insufficient landmarks");
        assert_eq!(log.events().len(), 0);
    }
}
