//! Frame routing between a pose source and the gesture detectors.
//!
//! A [`DetectorHost`] owns one detector per [`Gesture`], keeps at most one of
//! them running, and forwards each pose frame to that one only.

use std::sync::Arc;

use log::{debug, info};

use crate::clock::Clock;
use crate::config::Config;
use crate::detectors::{
    ClapDetector, DebugListener, Gesture, GestureDetector, GestureListener, JumpDetector, MarchDetector,
    RaiseHandDetector, WaveDetector,
};
use crate::error::Result;
use crate::landmark::PoseResult;

/// Owns every detector and routes frames to the current motion's detector
pub struct DetectorHost {
    /// Indexed by [`Gesture::slot`]
    detectors: [Box<dyn GestureDetector>; 5],
    current: Option<Gesture>,
}

impl DetectorHost {
    /// Build all five detectors from `config`, sharing one clock.
    ///
    /// `config` is validated first, so out-of-range values surface as
    /// [`Error::ConfigError`](crate::Error::ConfigError) instead of reaching
    /// the filter constructors.
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let timeout = config.detection_timeout_ms;
        let detectors: [Box<dyn GestureDetector>; 5] = [
            Box::new(ClapDetector::with_config(config.clap.clone(), timeout, Arc::clone(&clock))),
            Box::new(WaveDetector::with_config(config.wave.clone(), timeout, Arc::clone(&clock))),
            Box::new(JumpDetector::with_config(config.jump.clone(), timeout, Arc::clone(&clock))),
            Box::new(MarchDetector::with_config(config.march.clone(), timeout, Arc::clone(&clock))),
            Box::new(RaiseHandDetector::with_config(config.raise_hand.clone(), timeout, clock)),
        ];
        Ok(Self {
            detectors,
            current: None,
        })
    }

    /// Install a clone of `listener` into every detector
    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: GestureListener + Clone + 'static,
    {
        for detector in &mut self.detectors {
            detector.set_listener(Box::new(listener.clone()));
        }
    }

    /// Install a clone of `listener` into every detector
    pub fn set_debug_listener<L>(&mut self, listener: L)
    where
        L: DebugListener + Clone + 'static,
    {
        for detector in &mut self.detectors {
            detector.set_debug_listener(Box::new(listener.clone()));
        }
    }

    /// Parse a session motion type and start its detector
    pub fn start_motion(&mut self, motion: &str) -> Result<Gesture> {
        let gesture: Gesture = motion.parse()?;
        self.start(gesture);
        Ok(gesture)
    }

    /// Stop every other detector, then start the one for `gesture`
    pub fn start(&mut self, gesture: Gesture) {
        for other in Gesture::ALL.into_iter().filter(|&g| g != gesture) {
            let detector = &mut self.detectors[other.slot()];
            if detector.is_active() {
                debug!("Stopping {other} before starting {gesture}");
                detector.stop_detection();
            }
        }
        info!("Motion {gesture} started");
        self.current = Some(gesture);
        self.detectors[gesture.slot()].start_detection();
    }

    /// Forward a frame to the current motion's detector while it runs
    pub fn on_pose_result(&mut self, result: Option<&PoseResult>) {
        let Some(gesture) = self.current else {
            return;
        };
        let detector = &mut self.detectors[gesture.slot()];
        if detector.is_active() {
            detector.analyze_pose_result(result);
        }
    }

    /// Deactivate every detector and forget the current motion
    pub fn stop_all(&mut self) {
        for detector in self.detectors.iter_mut().filter(|d| d.is_active()) {
            detector.stop_detection();
        }
        self.current = None;
    }

    /// Motion most recently started, until [`stop_all`](Self::stop_all)
    pub fn current_motion(&self) -> Option<Gesture> {
        self.current
    }

    /// Whether the current motion's detector is still running
    pub fn is_detecting(&self) -> bool {
        self.current
            .is_some_and(|gesture| self.detectors[gesture.slot()].is_active())
    }

    pub fn detector(&self, gesture: Gesture) -> &dyn GestureDetector {
        self.detectors[gesture.slot()].as_ref()
    }

    pub fn detector_mut(&mut self, gesture: Gesture) -> &mut dyn GestureDetector {
        self.detectors[gesture.slot()].as_mut()
    }
}
