//! Randomized robustness tests: jittery and random pose streams

mod test_helpers;

use std::sync::Arc;

use motion_gesture_detection::clock::Clock;
use motion_gesture_detection::detectors::{
    ClapDetector, GestureDetector, JumpDetector, MarchDetector, RaiseHandDetector, WaveDetector,
};
use motion_gesture_detection::events::{EventLog, GestureEvent};
use motion_gesture_detection::landmark::{Landmark, PoseResult};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_helpers::{manual_clock, standing_pose};

fn all_detectors(clock: &Arc<dyn Clock>) -> Vec<Box<dyn GestureDetector>> {
    vec![
        Box::new(ClapDetector::with_clock(Arc::clone(clock))),
        Box::new(WaveDetector::with_clock(Arc::clone(clock))),
        Box::new(JumpDetector::with_clock(Arc::clone(clock))),
        Box::new(MarchDetector::with_clock(Arc::clone(clock))),
        Box::new(RaiseHandDetector::with_clock(Arc::clone(clock))),
    ]
}

fn jittered_standing(rng: &mut StdRng, amplitude: f64) -> PoseResult {
    let landmarks = standing_pose()
        .into_iter()
        .map(|l| Landmark {
            x: l.x + rng.gen_range(-amplitude..=amplitude),
            y: l.y + rng.gen_range(-amplitude..=amplitude),
            ..l
        })
        .collect();
    PoseResult::single(landmarks)
}

#[test]
fn test_tracking_jitter_counts_nothing() {
    let mut rng = StdRng::seed_from_u64(7);
    let (clock, shared) = manual_clock(0);

    for mut detector in all_detectors(&shared) {
        clock.set(0);
        detector.start_detection();
        for _ in 0..300 {
            clock.advance(33);
            detector.analyze_pose_result(Some(&jittered_standing(&mut rng, 0.003)));
        }
        assert_eq!(
            detector.current_count(),
            0,
            "{} counted pose-model jitter",
            detector.gesture()
        );
    }
}

#[test]
fn test_random_frames_respect_event_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let (clock, shared) = manual_clock(0);

    for mut detector in all_detectors(&shared) {
        let log = EventLog::new();
        detector.set_listener(Box::new(log.clone()));
        clock.set(0);
        detector.start_detection();

        for _ in 0..2_000 {
            clock.advance(rng.gen_range(0..80));
            let frame = match rng.gen_range(0..10) {
                0 => None,
                1 => Some(PoseResult::empty()),
                _ => {
                    let landmarks = (0..33)
                        .map(|_| Landmark::with_visibility(rng.gen(), rng.gen(), rng.gen()))
                        .collect();
                    Some(PoseResult::single(landmarks))
                }
            };
            detector.analyze_pose_result(frame.as_ref());
        }

        let gesture = detector.gesture();
        let events = log.events();
        let completions = log.completions(gesture);
        let timeouts = log.timeouts(gesture);
        assert!(completions + timeouts <= 1, "{gesture}: session ended twice");
        assert!(detector.current_count() <= detector.required_count());
        assert_eq!(log.detections(gesture), detector.current_count());

        // Detected counts climb by one
        let counts: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                GestureEvent::Detected { count, .. } => Some(*count),
                _ => None,
            })
            .collect();
        assert!(counts.iter().enumerate().all(|(i, &c)| c == i + 1));

        // Cooldowns hold between counted repetitions
        let times = detector.repetition_times();
        assert!(times.windows(2).all(|w| w[1] > w[0]));
    }
}

proptest! {
    #[test]
    fn prop_inactive_detectors_never_count(
        coords in prop::collection::vec((0.0..1.0f64, 0.0..1.0f64), 33),
        steps in 1usize..50,
    ) {
        let (clock, shared) = manual_clock(0);
        let landmarks: Vec<Landmark> = coords.iter().map(|&(x, y)| Landmark::new(x, y)).collect();
        let frame = PoseResult::single(landmarks);

        for mut detector in all_detectors(&shared) {
            let log = EventLog::new();
            detector.set_listener(Box::new(log.clone()));
            for _ in 0..steps {
                clock.advance(700);
                detector.analyze_pose_result(Some(&frame));
            }
            prop_assert_eq!(detector.current_count(), 0);
            prop_assert!(log.events().is_empty());
        }
    }

    #[test]
    fn prop_clap_count_matches_spacing(gaps in prop::collection::vec(1u64..1_500, 1..12)) {
        let (clock, shared) = manual_clock(0);
        let mut detector = ClapDetector::with_clock(shared);
        detector.start_detection();

        let pose = test_helpers::clap_pose(0.05);
        let mut t = 0;
        let mut last_counted: Option<u64> = None;
        let mut expected = 0;
        for gap in gaps {
            t += gap;
            clock.set(t);
            detector.analyze_pose_result(Some(&pose));
            if expected < 3 && last_counted.map_or(true, |last| t - last > 500) {
                expected += 1;
                last_counted = Some(t);
            }
        }
        prop_assert_eq!(detector.current_count(), expected);
    }
}
