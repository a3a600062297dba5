//! Pose landmark data model.
//!
//! A [`PoseResult`] is what the upstream pose model hands over for one camera
//! frame: zero or more detected people, each an ordered list of normalized
//! [`Landmark`]s indexed by [`BodyPart`].

use serde::{Deserialize, Serialize};

/// A single tracked body point in normalized image coordinates.
///
/// `x` and `y` are roughly in `[0, 1]` with the origin at the top-left, so `y`
/// grows downward. A missing `visibility` means the point is always trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position
    pub x: f64,
    /// Vertical position (increases downward)
    pub y: f64,
    /// Detection confidence in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    /// Landmark without a visibility score
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, visibility: None }
    }

    /// Landmark carrying a visibility score
    #[must_use]
    pub const fn with_visibility(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Landmarks detected in one frame, one list per person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseResult {
    /// Per-person landmark lists
    pub people: Vec<Vec<Landmark>>,
}

impl PoseResult {
    /// Frame with no detected person
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Frame with exactly one detected person
    #[must_use]
    pub fn single(landmarks: Vec<Landmark>) -> Self {
        Self {
            people: vec![landmarks],
        }
    }

    /// Landmarks of the first detected person, if any
    #[must_use]
    pub fn first_person(&self) -> Option<&[Landmark]> {
        self.people.first().map(Vec::as_slice)
    }

    /// True when nobody was detected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

/// MediaPipe pose landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum BodyPart {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyPart {
    /// Position of this part in a landmark list
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look this part up in a landmark list; `None` if the list is too short
    #[must_use]
    pub fn of(self, landmarks: &[Landmark]) -> Option<&Landmark> {
        landmarks.get(self.index())
    }
}

/// Minimum landmark-list length that contains every part in `parts`
#[must_use]
pub fn required_len(parts: &[BodyPart]) -> usize {
    parts.iter().map(|p| p.index() + 1).max().unwrap_or(0)
}
