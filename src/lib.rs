//! Body-gesture recognition over pose landmark streams.
//!
//! This library counts repetitions of five exercise gestures from the
//! per-frame output of a pose model (33 normalized MediaPipe landmarks per
//! person):
//! - Clapping: wrists and index fingertips brought together
//! - Waving: both hands raised, moving apart and together
//! - Jumping: hip height over a rolling ground baseline, tracked through
//!   rise, airborne, fall and landing phases
//! - Marching: knee lifts against a calibrated standing baseline
//! - Raising a hand: wrist above shoulder by a shoulder-width scaled margin,
//!   held briefly
//!
//! Every detector shares one contract ([`detectors::GestureDetector`]): start,
//! feed frames, receive events, stop. A session times out if the required
//! count is not reached in time. Bad frames (nobody detected, too few
//! landmarks, low visibility) are never errors; they are reported on the
//! debug channel and otherwise ignored.
//!
//! # Examples
//!
//! ## Counting claps
//!
//! ```no_run
//! use motion_gesture_detection::detectors::{ClapDetector, GestureDetector};
//! use motion_gesture_detection::events::EventLog;
//! use motion_gesture_detection::landmark::{Landmark, PoseResult};
//!
//! # fn main() {
//! let log = EventLog::new();
//! let mut detector = ClapDetector::new();
//! detector.set_listener(Box::new(log.clone()));
//! detector.start_detection();
//!
//! // One frame per camera image, straight from the pose model
//! let frame = PoseResult::single(vec![Landmark::new(0.5, 0.5); 33]);
//! detector.analyze_pose_result(Some(&frame));
//!
//! println!("{}/{} claps", detector.current_clap_count(), detector.required_clap_count());
//! for event in log.take_events() {
//!     println!("{event:?}");
//! }
//! # }
//! ```
//!
//! ## Routing a session through a host
//!
//! ```no_run
//! use std::sync::Arc;
//! use motion_gesture_detection::{clock::SystemClock, config::Config, host::DetectorHost};
//! use motion_gesture_detection::landmark::PoseResult;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("gestures.yaml")?;
//! let mut host = DetectorHost::new(&config, Arc::new(SystemClock))?;
//! let gesture = host.start_motion("raising_hand")?;
//!
//! while host.is_detecting() {
//!     let frame: Option<PoseResult> = None; // next pose model result
//!     host.on_pose_result(frame.as_ref());
//! }
//! println!("{gesture} finished");
//! # Ok(())
//! # }
//! ```

/// Pose landmark data model and body-part indices
pub mod landmark;

/// Geometry helpers (distance, visibility, smoothing)
pub mod utils;

/// Millisecond time sources
pub mod clock;

/// Signal filters for smoothing per-frame measurements
pub mod filters;

/// The five gesture detectors and their shared contract
pub mod detectors;

/// Event values and a recording listener
pub mod events;

/// Frame routing to the active detector
pub mod host;

/// Recorded pose sessions
pub mod recording;

/// Offline replay of recorded sessions
pub mod replay;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
