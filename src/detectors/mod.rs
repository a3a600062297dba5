//! Gesture detectors.
//!
//! Every detector consumes one [`PoseResult`] per camera frame and emits
//! repetition events through a [`GestureListener`]. All five share the same
//! external contract ([`GestureDetector`]) but keep their calibration and
//! phase state to themselves; only the session bookkeeping (active flag,
//! timeout, counted repetitions, listeners) lives in a shared
//! [`DetectionSession`].

/// Clap detection (both wrists and fingertips together)
pub mod clap;

/// Wave detection (alternating horizontal hand motion with hands raised)
pub mod wave;

/// Jump detection (hip-height phase state machine over a rolling baseline)
pub mod jump;

/// March detection (per-leg knee lifts against a calibrated baseline)
pub mod march;

/// Hand-raise detection (adaptive, shoulder-width scaled threshold)
pub mod raise_hand;

/// Session bookkeeping shared by all detectors
pub mod session;

use std::fmt;
use std::str::FromStr;

use crate::events::DebugUpdate;
use crate::landmark::{Landmark, PoseResult};
use crate::Error;

pub use self::clap::ClapDetector;
pub use jump::JumpDetector;
pub use march::MarchDetector;
pub use raise_hand::RaiseHandDetector;
pub use session::DetectionSession;
pub use wave::WaveDetector;

/// The gesture a detector recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Clap,
    Wave,
    Jump,
    March,
    RaiseHand,
}

impl Gesture {
    /// Every gesture, in host slot order
    pub const ALL: [Gesture; 5] = [
        Gesture::Clap,
        Gesture::Wave,
        Gesture::Jump,
        Gesture::March,
        Gesture::RaiseHand,
    ];

    /// Session motion-type name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Gesture::Clap => "clapping",
            Gesture::Wave => "wave",
            Gesture::Jump => "jumping",
            Gesture::March => "marching",
            Gesture::RaiseHand => "raising_hand",
        }
    }

    /// Plural noun for one counted repetition, used in progress text
    #[must_use]
    pub const fn repetition_noun(self) -> &'static str {
        match self {
            Gesture::Clap => "claps",
            Gesture::Wave => "waves",
            Gesture::Jump => "jumps",
            Gesture::March => "steps",
            Gesture::RaiseHand => "raises",
        }
    }

    /// Position in [`Gesture::ALL`]
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Gesture::Clap => 0,
            Gesture::Wave => 1,
            Gesture::Jump => 2,
            Gesture::March => 3,
            Gesture::RaiseHand => 4,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gesture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "clapping" | "clap" => Ok(Gesture::Clap),
            "wave" | "waving" => Ok(Gesture::Wave),
            "jumping" | "jump" => Ok(Gesture::Jump),
            "marching" | "march" => Ok(Gesture::March),
            "raising_hand" | "raise_hand" | "hand_raise" | "raisehand" => Ok(Gesture::RaiseHand),
            _ => Err(Error::UnknownMotion(s.to_string())),
        }
    }
}

/// Observer for repetition events. Every method defaults to a no-op.
pub trait GestureListener: Send {
    /// A repetition was counted; `count` is the new total
    fn on_detected(&mut self, _gesture: Gesture, _count: usize) {}

    /// The required number of repetitions was reached
    fn on_completed(&mut self, _gesture: Gesture) {}

    /// Progress snapshot, sent on start and after every repetition
    fn on_progress(&mut self, _gesture: Gesture, _current: usize, _required: usize) {}

    /// The session ran out of time before completing
    fn on_detection_timeout(&mut self, _gesture: Gesture) {}
}

/// Observer for human-readable diagnostics. Never used for control flow.
pub trait DebugListener: Send {
    fn on_debug_update(&mut self, _gesture: Gesture, _update: &DebugUpdate) {}
}

/// Common contract of every gesture detector.
pub trait GestureDetector: Send {
    /// Which gesture this detector counts
    fn gesture(&self) -> Gesture;

    /// Install the repetition event observer
    fn set_listener(&mut self, listener: Box<dyn GestureListener>);

    /// Install the diagnostics observer
    fn set_debug_listener(&mut self, listener: Box<dyn DebugListener>);

    /// Reset all state, activate, and emit a zero-progress event
    fn start_detection(&mut self);

    /// Deactivate without clearing counted repetitions
    fn stop_detection(&mut self);

    /// Clear counters, timestamps, phase and calibration state
    fn reset(&mut self);

    /// Analyze one frame. `None` means the pose model produced nothing.
    fn analyze_pose_result(&mut self, result: Option<&PoseResult>);

    fn is_active(&self) -> bool;

    fn current_count(&self) -> usize;

    fn required_count(&self) -> usize;

    /// Milliseconds left before timeout; zero while inactive
    fn remaining_time_ms(&self) -> u64;

    /// Timestamps of counted repetitions, oldest first
    fn repetition_times(&self) -> &[u64];
}

/// Gesture-specific half of a detector.
///
/// Implementors hold a [`DetectionSession`] and their own recognition state;
/// the [`GestureDetector`] contract is derived from this trait.
pub trait PoseClassifier: Send {
    fn session(&self) -> &DetectionSession;

    fn session_mut(&mut self) -> &mut DetectionSession;

    /// Minimum landmark-list length this classifier indexes into
    fn min_landmarks(&self) -> usize;

    /// Reset gesture-specific state (baselines, phases, smoothing)
    fn clear_state(&mut self);

    /// Run one recognition step on an admitted frame
    fn classify(&mut self, landmarks: &[Landmark], now_ms: u64);
}

impl<T: PoseClassifier> GestureDetector for T {
    fn gesture(&self) -> Gesture {
        self.session().gesture()
    }

    fn set_listener(&mut self, listener: Box<dyn GestureListener>) {
        self.session_mut().set_listener(listener);
    }

    fn set_debug_listener(&mut self, listener: Box<dyn DebugListener>) {
        self.session_mut().set_debug_listener(listener);
    }

    fn start_detection(&mut self) {
        self.reset();
        self.session_mut().activate();
    }

    fn stop_detection(&mut self) {
        self.session_mut().deactivate();
    }

    fn reset(&mut self) {
        self.clear_state();
        self.session_mut().clear();
    }

    fn analyze_pose_result(&mut self, result: Option<&PoseResult>) {
        let min_len = self.min_landmarks();
        let now_ms = self.session().now_ms();
        if let Some(landmarks) = self.session_mut().admit(result, min_len, now_ms) {
            self.classify(landmarks, now_ms);
        }
    }

    fn is_active(&self) -> bool {
        self.session().is_active()
    }

    fn current_count(&self) -> usize {
        self.session().count()
    }

    fn required_count(&self) -> usize {
        self.session().required()
    }

    fn remaining_time_ms(&self) -> u64 {
        self.session().remaining_time_ms()
    }

    fn repetition_times(&self) -> &[u64] {
        self.session().repetition_times()
    }
}
