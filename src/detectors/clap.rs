//! Clap detection.
//!
//! A clap pose is both wrists *and* both index fingertips closer than a
//! fixed distance. The first clap-pose frame after the cooldown counts; there
//! is no edge tracking, so this is a debounced level trigger.

use std::sync::Arc;

use super::session::{DetectionSession, NOT_AVAILABLE};
use super::{Gesture, PoseClassifier};
use crate::clock::{Clock, SystemClock};
use crate::config::ClapConfig;
use crate::constants::DETECTION_TIMEOUT_MS;
use crate::landmark::{required_len, BodyPart, Landmark};
use crate::utils::{all_visible, distance};

const HAND_PARTS: [BodyPart; 4] = [
    BodyPart::LeftWrist,
    BodyPart::RightWrist,
    BodyPart::LeftIndex,
    BodyPart::RightIndex,
];

struct Hands<'a> {
    left_wrist: &'a Landmark,
    right_wrist: &'a Landmark,
    left_index: &'a Landmark,
    right_index: &'a Landmark,
}

impl<'a> Hands<'a> {
    fn extract(landmarks: &'a [Landmark]) -> Option<Self> {
        Some(Self {
            left_wrist: BodyPart::LeftWrist.of(landmarks)?,
            right_wrist: BodyPart::RightWrist.of(landmarks)?,
            left_index: BodyPart::LeftIndex.of(landmarks)?,
            right_index: BodyPart::RightIndex.of(landmarks)?,
        })
    }

    fn visible(&self, threshold: f64) -> bool {
        all_visible(
            &[self.left_wrist, self.right_wrist, self.left_index, self.right_index],
            threshold,
        )
    }
}

/// Counts claps
pub struct ClapDetector {
    config: ClapConfig,
    session: DetectionSession,
    last_wrist_distance: f64,
    last_finger_distance: f64,
    clapping: bool,
}

impl ClapDetector {
    /// Detector with default thresholds on the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Detector with default thresholds on the given clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(ClapConfig::default(), DETECTION_TIMEOUT_MS, clock)
    }

    #[must_use]
    pub fn with_config(config: ClapConfig, timeout_ms: u64, clock: Arc<dyn Clock>) -> Self {
        let session = DetectionSession::new(
            Gesture::Clap,
            config.required_count,
            config.cooldown_ms,
            timeout_ms,
            clock,
        );
        Self {
            config,
            session,
            last_wrist_distance: 0.0,
            last_finger_distance: 0.0,
            clapping: false,
        }
    }

    pub fn current_clap_count(&self) -> usize {
        self.session.count()
    }

    pub fn required_clap_count(&self) -> usize {
        self.session.required()
    }

    /// Whether the last analyzed frame was a clap pose
    pub fn is_clapping(&self) -> bool {
        self.clapping
    }

    /// Wrist and fingertip distances from the last visible frame
    pub fn last_distances(&self) -> (f64, f64) {
        (self.last_wrist_distance, self.last_finger_distance)
    }

    fn is_clap(&self, wrist_distance: f64, finger_distance: f64) -> bool {
        wrist_distance < self.config.distance_threshold && finger_distance < self.config.distance_threshold
    }
}

impl Default for ClapDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseClassifier for ClapDetector {
    fn session(&self) -> &DetectionSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DetectionSession {
        &mut self.session
    }

    fn min_landmarks(&self) -> usize {
        required_len(&HAND_PARTS)
    }

    fn clear_state(&mut self) {
        self.last_wrist_distance = 0.0;
        self.last_finger_distance = 0.0;
        self.clapping = false;
    }

    fn classify(&mut self, landmarks: &[Landmark], now_ms: u64) {
        let Some(hands) = Hands::extract(landmarks) else {
            self.session
                .debug("Insufficient landmarks", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Waiting for pose");
            return;
        };

        if !hands.visible(self.config.visibility_threshold) {
            self.clapping = false;
            self.session
                .debug("Hands not visible", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Show both hands");
            return;
        }

        let wrist_distance = distance(hands.left_wrist, hands.right_wrist);
        let finger_distance = distance(hands.left_index, hands.right_index);
        self.last_wrist_distance = wrist_distance;
        self.last_finger_distance = finger_distance;

        self.clapping = self.is_clap(wrist_distance, finger_distance);
        if self.clapping && self.session.cooldown_elapsed(now_ms) {
            self.session.register(now_ms);
        }

        let threshold = self.config.distance_threshold;
        let wrist_text = format!("{wrist_distance:.3} (thresh: {threshold:.3})");
        let finger_text = format!("{finger_distance:.3} (thresh: {threshold:.3})");
        let status = self
            .session
            .status_line(if self.clapping { "CLAPPING" } else { "Waiting for clap" });
        self.session.debug("Both hands visible", &wrist_text, &finger_text, &status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::detectors::GestureDetector;
    use crate::landmark::PoseResult;

    fn hands_frame(gap: f64) -> PoseResult {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); 21];
        landmarks[BodyPart::LeftWrist.index()] = Landmark::new(0.5 - gap / 2.0, 0.5);
        landmarks[BodyPart::RightWrist.index()] = Landmark::new(0.5 + gap / 2.0, 0.5);
        landmarks[BodyPart::LeftIndex.index()] = Landmark::new(0.5 - gap / 2.0, 0.45);
        landmarks[BodyPart::RightIndex.index()] = Landmark::new(0.5 + gap / 2.0, 0.45);
        PoseResult::single(landmarks)
    }

    #[test]
    fn test_requires_both_pairs_close() {
        let detector = ClapDetector::new();
        assert!(detector.is_clap(0.05, 0.05));
        assert!(!detector.is_clap(0.05, 0.2));
        assert!(!detector.is_clap(0.2, 0.05));
        assert!(!detector.is_clap(0.125, 0.05));
    }

    #[test]
    fn test_held_clap_counts_once_per_cooldown() {
        let clock = ManualClock::new(0);
        let mut detector = ClapDetector::with_clock(Arc::new(clock.clone()));
        detector.start_detection();

        // Hands held together: one count, then suppressed for 500ms
        for _ in 0..10 {
            clock.advance(40);
            detector.analyze_pose_result(Some(&hands_frame(0.05)));
        }
        assert_eq!(detector.current_clap_count(), 1);

        clock.advance(200);
        detector.analyze_pose_result(Some(&hands_frame(0.05)));
        assert_eq!(detector.current_clap_count(), 2);
    }

    #[test]
    fn test_hidden_hands_are_ignored() {
        let clock = ManualClock::new(0);
        let mut detector = ClapDetector::with_clock(Arc::new(clock.clone()));
        detector.start_detection();

        let mut frame = hands_frame(0.05);
        frame.people[0][BodyPart::LeftIndex.index()].visibility = Some(0.2);
        clock.advance(100);
        detector.analyze_pose_result(Some(&frame));
        assert_eq!(detector.current_clap_count(), 0);
        assert!(!detector.is_clapping());
    }
}
