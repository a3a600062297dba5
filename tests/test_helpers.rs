//! Helper functions and utilities for tests
#![allow(dead_code)]

use std::sync::Arc;

use motion_gesture_detection::clock::{Clock, ManualClock};
use motion_gesture_detection::constants::NUM_POSE_LANDMARKS;
use motion_gesture_detection::landmark::{BodyPart, Landmark, PoseResult};

/// Visibility given to every generated landmark
pub const VISIBLE: f64 = 0.9;

/// Manual clock plus the trait object detectors take
pub fn manual_clock(start_ms: u64) -> (ManualClock, Arc<dyn Clock>) {
    let clock = ManualClock::new(start_ms);
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    (clock, shared)
}

fn set(landmarks: &mut [Landmark], part: BodyPart, x: f64, y: f64) {
    landmarks[part.index()] = Landmark::with_visibility(x, y, VISIBLE);
}

/// Person standing upright, arms hanging, facing the camera.
///
/// Shoulders at y 0.4, hips at 0.65 (torso 0.25), knees at 0.8, ankles at 0.95.
pub fn standing_pose() -> Vec<Landmark> {
    let mut lm = vec![Landmark::with_visibility(0.5, 0.3, VISIBLE); NUM_POSE_LANDMARKS];
    set(&mut lm, BodyPart::Nose, 0.5, 0.25);
    set(&mut lm, BodyPart::LeftShoulder, 0.4, 0.4);
    set(&mut lm, BodyPart::RightShoulder, 0.6, 0.4);
    set(&mut lm, BodyPart::LeftElbow, 0.37, 0.52);
    set(&mut lm, BodyPart::RightElbow, 0.63, 0.52);
    set(&mut lm, BodyPart::LeftWrist, 0.35, 0.62);
    set(&mut lm, BodyPart::RightWrist, 0.65, 0.62);
    for (part, x) in [
        (BodyPart::LeftPinky, 0.34),
        (BodyPart::LeftIndex, 0.35),
        (BodyPart::LeftThumb, 0.36),
        (BodyPart::RightPinky, 0.66),
        (BodyPart::RightIndex, 0.65),
        (BodyPart::RightThumb, 0.64),
    ] {
        set(&mut lm, part, x, 0.66);
    }
    set(&mut lm, BodyPart::LeftHip, 0.45, 0.65);
    set(&mut lm, BodyPart::RightHip, 0.55, 0.65);
    set(&mut lm, BodyPart::LeftKnee, 0.45, 0.8);
    set(&mut lm, BodyPart::RightKnee, 0.55, 0.8);
    set(&mut lm, BodyPart::LeftAnkle, 0.45, 0.95);
    set(&mut lm, BodyPart::RightAnkle, 0.55, 0.95);
    set(&mut lm, BodyPart::LeftHeel, 0.44, 0.97);
    set(&mut lm, BodyPart::RightHeel, 0.56, 0.97);
    set(&mut lm, BodyPart::LeftFootIndex, 0.45, 0.98);
    set(&mut lm, BodyPart::RightFootIndex, 0.55, 0.98);
    lm
}

pub fn frame(landmarks: Vec<Landmark>) -> PoseResult {
    PoseResult::single(landmarks)
}

/// Hands together in front of the chest, `gap` apart
pub fn clap_pose(gap: f64) -> PoseResult {
    let mut lm = standing_pose();
    let (left_x, right_x) = (0.5 - gap / 2.0, 0.5 + gap / 2.0);
    set(&mut lm, BodyPart::LeftWrist, left_x, 0.5);
    set(&mut lm, BodyPart::RightWrist, right_x, 0.5);
    set(&mut lm, BodyPart::LeftIndex, left_x, 0.45);
    set(&mut lm, BodyPart::RightIndex, right_x, 0.45);
    frame(lm)
}

/// Both wrists well above the shoulders at the given x positions
pub fn hands_up_pose(left_x: f64, right_x: f64) -> PoseResult {
    let mut lm = standing_pose();
    set(&mut lm, BodyPart::LeftWrist, left_x, 0.05);
    set(&mut lm, BodyPart::RightWrist, right_x, 0.05);
    frame(lm)
}

/// Selected hands raised overhead, arms extended outward
pub fn raise_pose(left_up: bool, right_up: bool) -> PoseResult {
    let mut lm = standing_pose();
    if left_up {
        set(&mut lm, BodyPart::LeftElbow, 0.35, 0.3);
        set(&mut lm, BodyPart::LeftWrist, 0.3, 0.15);
    }
    if right_up {
        set(&mut lm, BodyPart::RightElbow, 0.65, 0.3);
        set(&mut lm, BodyPart::RightWrist, 0.7, 0.15);
    }
    frame(lm)
}

/// Knees raised by the given amounts above standing height
pub fn march_pose(left_lift: f64, right_lift: f64) -> PoseResult {
    let mut lm = standing_pose();
    set(&mut lm, BodyPart::LeftKnee, 0.45, 0.8 - left_lift);
    set(&mut lm, BodyPart::RightKnee, 0.55, 0.8 - right_lift);
    frame(lm)
}

/// Whole body shifted up by `rise`
pub fn lifted_pose(rise: f64) -> PoseResult {
    let lm = standing_pose()
        .into_iter()
        .map(|l| Landmark {
            y: l.y - rise,
            ..l
        })
        .collect();
    frame(lm)
}

/// Body rise per frame over one jump, peaking at 0.08 (0.32 torso lengths)
pub fn jump_profile() -> Vec<f64> {
    (1..12)
        .map(|k| 0.08 * (std::f64::consts::PI * f64::from(k) / 12.0).sin())
        .collect()
}

/// Lower one landmark's visibility
pub fn hide(mut pose: PoseResult, part: BodyPart, visibility: f64) -> PoseResult {
    pose.people[0][part.index()].visibility = Some(visibility);
    pose
}
