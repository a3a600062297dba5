//! Constants used throughout the crate

/// Time allowed to complete a gesture sequence once detection starts
pub const DETECTION_TIMEOUT_MS: u64 = 30_000;

/// Visibility score a landmark must exceed to be trusted
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.5;

/// Marching tolerates partially occluded legs
pub const MARCH_VISIBILITY_THRESHOLD: f64 = 0.3;

/// Number of landmarks in a full MediaPipe pose
pub const NUM_POSE_LANDMARKS: usize = 33;
