//! Jump detection.
//!
//! The ground level is re-estimated every frame as the mean of the lowest
//! 60% of the last 15 hip positions, so a window that already contains part
//! of a jump still yields a ground-level baseline. Hip height above that
//! baseline is expressed as a ratio of torso length, and the smoothed
//! vertical hip velocity drives a four-phase state machine:
//!
//! ```text
//! Waiting --rise--> DetectedRise --plateau--> Airborne --descent--> DetectedFall --settle--> Waiting
//! ```
//!
//! A phase that overruns its frame budget drops back to `Waiting` as a false
//! alarm. A completed cycle counts only if its peak height and its number of
//! frames spent clearly off the ground both exceed their minimums, which
//! rejects single-frame tracking spikes.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::session::{DetectionSession, NOT_AVAILABLE};
use super::{Gesture, PoseClassifier};
use crate::clock::{Clock, SystemClock};
use crate::config::JumpConfig;
use crate::constants::DETECTION_TIMEOUT_MS;
use crate::filters::{baseline::RollingBaseline, exponential::ExponentialFilter, SignalFilter};
use crate::landmark::{required_len, BodyPart, Landmark};
use crate::utils::{all_visible, midpoint_y};

/// Torso lengths shorter than this are treated as this
const MIN_TORSO_LENGTH: f64 = 0.05;

const BODY_PARTS: [BodyPart; 8] = [
    BodyPart::LeftShoulder,
    BodyPart::RightShoulder,
    BodyPart::LeftHip,
    BodyPart::RightHip,
    BodyPart::LeftKnee,
    BodyPart::RightKnee,
    BodyPart::LeftAnkle,
    BodyPart::RightAnkle,
];

/// Phase of the single jump currently being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Waiting,
    DetectedRise,
    Airborne,
    DetectedFall,
}

impl fmt::Display for JumpPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JumpPhase::Waiting => "WAITING",
            JumpPhase::DetectedRise => "RISING",
            JumpPhase::Airborne => "AIRBORNE",
            JumpPhase::DetectedFall => "FALLING",
        };
        f.write_str(name)
    }
}

/// Counts jumps
pub struct JumpDetector {
    config: JumpConfig,
    session: DetectionSession,
    baseline: RollingBaseline,
    velocity: ExponentialFilter,
    last_hip_y: Option<f64>,
    phase: JumpPhase,
    phase_frames: u32,
    peak_ratio: f64,
    airborne_frames: u32,
    last_height_ratio: f64,
}

impl JumpDetector {
    /// Detector with default thresholds on the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Detector with default thresholds on the given clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(JumpConfig::default(), DETECTION_TIMEOUT_MS, clock)
    }

    #[must_use]
    pub fn with_config(config: JumpConfig, timeout_ms: u64, clock: Arc<dyn Clock>) -> Self {
        let session = DetectionSession::new(
            Gesture::Jump,
            config.required_count,
            config.cooldown_ms,
            timeout_ms,
            clock,
        );
        Self {
            baseline: RollingBaseline::new(config.baseline_window, config.baseline_fraction),
            velocity: ExponentialFilter::new(config.velocity_alpha),
            config,
            session,
            last_hip_y: None,
            phase: JumpPhase::Waiting,
            phase_frames: 0,
            peak_ratio: 0.0,
            airborne_frames: 0,
            last_height_ratio: 0.0,
        }
    }

    pub fn current_jump_count(&self) -> usize {
        self.session.count()
    }

    pub fn required_jump_count(&self) -> usize {
        self.session.required()
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    fn enter(&mut self, phase: JumpPhase) {
        debug!("Jump phase {} -> {}", self.phase, phase);
        self.phase = phase;
        self.phase_frames = 0;
    }

    fn abandon(&mut self, reason: &str) {
        debug!("Jump abandoned in {}: {reason}", self.phase);
        self.enter(JumpPhase::Waiting);
    }

    /// Advance the state machine by one frame. Returns true when a
    /// qualifying jump has just landed.
    fn step(&mut self, velocity: f64, height_ratio: f64) -> bool {
        let cfg = &self.config;
        self.phase_frames += 1;
        if self.phase != JumpPhase::Waiting && height_ratio > cfg.airborne_height_ratio {
            self.airborne_frames += 1;
        }

        match self.phase {
            JumpPhase::Waiting => {
                if velocity < -cfg.rise_velocity && height_ratio > cfg.rise_height_ratio {
                    self.peak_ratio = height_ratio;
                    self.airborne_frames = u32::from(height_ratio > cfg.airborne_height_ratio);
                    self.enter(JumpPhase::DetectedRise);
                }
            }
            JumpPhase::DetectedRise => {
                self.peak_ratio = self.peak_ratio.max(height_ratio);
                if velocity > -cfg.peak_velocity {
                    self.enter(JumpPhase::Airborne);
                } else if self.phase_frames > cfg.max_rise_frames {
                    self.abandon("rise too long");
                }
            }
            JumpPhase::Airborne => {
                self.peak_ratio = self.peak_ratio.max(height_ratio);
                if velocity > cfg.fall_velocity {
                    self.enter(JumpPhase::DetectedFall);
                } else if self.phase_frames > cfg.max_airborne_frames {
                    self.abandon("no descent");
                }
            }
            JumpPhase::DetectedFall => {
                if velocity.abs() < cfg.landing_velocity && height_ratio < cfg.landing_height_ratio {
                    let qualifies = self.peak_ratio > cfg.min_peak_ratio && self.airborne_frames > cfg.min_airborne_frames;
                    debug!(
                        "Landing: peak {:.3}, airborne frames {}, qualifies {qualifies}",
                        self.peak_ratio, self.airborne_frames
                    );
                    self.enter(JumpPhase::Waiting);
                    return qualifies;
                } else if self.phase_frames > cfg.max_fall_frames {
                    self.abandon("no landing");
                }
            }
        }
        false
    }
}

impl Default for JumpDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseClassifier for JumpDetector {
    fn session(&self) -> &DetectionSession {
        &self.session
    }

    fn session_mut(&mut self) -> &mut DetectionSession {
        &mut self.session
    }

    fn min_landmarks(&self) -> usize {
        required_len(&BODY_PARTS)
    }

    fn clear_state(&mut self) {
        self.baseline.reset();
        self.velocity.reset();
        self.last_hip_y = None;
        self.phase = JumpPhase::Waiting;
        self.phase_frames = 0;
        self.peak_ratio = 0.0;
        self.airborne_frames = 0;
        self.last_height_ratio = 0.0;
    }

    fn classify(&mut self, landmarks: &[Landmark], now_ms: u64) {
        let parts: Vec<&Landmark> = BODY_PARTS.iter().filter_map(|p| p.of(landmarks)).collect();
        if parts.len() != BODY_PARTS.len() {
            self.session
                .debug("Insufficient landmarks", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Waiting for pose");
            return;
        }
        if !all_visible(&parts, self.config.visibility_threshold) {
            self.session
                .debug("Body not fully visible", NOT_AVAILABLE, NOT_AVAILABLE, "Active - Show full body");
            return;
        }

        // Order follows BODY_PARTS
        let shoulder_y = midpoint_y(parts[0], parts[1]);
        let hip_y = midpoint_y(parts[2], parts[3]);
        let torso = (hip_y - shoulder_y).abs().max(MIN_TORSO_LENGTH);

        let baseline = self.baseline.apply(hip_y);
        if self.baseline.len() < self.config.min_baseline_samples {
            self.last_hip_y = Some(hip_y);
            let progress = format!("Calibrating ({}/{})", self.baseline.len(), self.config.min_baseline_samples);
            self.session.debug("Full body visible", &progress, "On ground", "Active - Stand still");
            return;
        }

        let raw_velocity = self.last_hip_y.replace(hip_y).map_or(0.0, |prev| hip_y - prev);
        let velocity = self.velocity.apply(raw_velocity);
        let height_ratio = (baseline - hip_y) / torso;
        self.last_height_ratio = height_ratio;

        if self.step(velocity, height_ratio) && self.session.cooldown_elapsed(now_ms) {
            self.session.register(now_ms);
        }

        let body = format!("Hip:{hip_y:.3} Base:{baseline:.3} (rise:{height_ratio:.3})");
        let motion = format!("Vel:{velocity:.4} {} [{}]", self.phase, self.airborne_frames);
        let status = self.session.status_line(if self.phase == JumpPhase::Waiting {
            "Jump now"
        } else {
            "JUMPING"
        });
        self.session.debug("Full body visible", &body, &motion, &status);
    }
}
