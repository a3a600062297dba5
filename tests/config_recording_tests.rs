//! Configuration files, session recordings and replay

mod test_helpers;

use std::path::PathBuf;
use std::sync::Arc;

use motion_gesture_detection::clock::ManualClock;
use motion_gesture_detection::config::{Config, EXAMPLE_CONFIG};
use motion_gesture_detection::detectors::Gesture;
use motion_gesture_detection::events::GestureEvent;
use motion_gesture_detection::host::DetectorHost;
use motion_gesture_detection::recording::{RecordedFrame, SessionRecording};
use motion_gesture_detection::replay::{replay, Outcome};
use motion_gesture_detection::Error;
use test_helpers::{clap_pose, raise_pose, standing_pose};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("motion-gesture-{}-{name}", std::process::id()))
}

fn recorded(timestamp_ms: u64, pose: motion_gesture_detection::landmark::PoseResult) -> RecordedFrame {
    RecordedFrame {
        timestamp_ms,
        people: pose.people,
    }
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config.yaml");
    let mut config = Config::default();
    config.clap.required_count = 5;
    config.march.cooldown_ms = 250;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
    loaded.validate().unwrap();
}

#[test]
fn test_missing_config_file() {
    let err = Config::from_file(temp_path("does-not-exist.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_example_config_is_valid() {
    Config::from_yaml_str(EXAMPLE_CONFIG).unwrap().validate().unwrap();
}

#[test]
fn test_config_overrides_detector_thresholds() {
    let config = Config::from_yaml_str("clap:\n  required_count: 1\n").unwrap();
    let recording = SessionRecording {
        motion: "clapping".to_string(),
        frames: vec![recorded(100, clap_pose(0.05))],
    };
    let report = replay(&recording, &config, None).unwrap();
    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.required, 1);
}

#[test]
fn test_recording_file_round_trip() {
    let path = temp_path("session.yaml");
    let recording = SessionRecording {
        motion: "raising_hand".to_string(),
        frames: vec![
            recorded(0, raise_pose(true, false)),
            RecordedFrame {
                timestamp_ms: 33,
                people: Vec::new(),
            },
        ],
    };
    recording.to_file(&path).unwrap();
    let loaded = SessionRecording::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, recording);
}

#[test]
fn test_replay_completes_clap_session() {
    let mut frames = Vec::new();
    for i in 0..40 {
        let t = i * 50;
        // A clap every 600ms, hands apart in between
        let pose = if t % 600 == 0 { clap_pose(0.05) } else { clap_pose(0.4) };
        frames.push(recorded(t, pose));
    }
    let recording = SessionRecording {
        motion: "clapping".to_string(),
        frames,
    };

    let report = replay(&recording, &Config::default(), None).unwrap();
    assert_eq!(report.gesture, Gesture::Clap);
    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.count, 3);
    // Claps at 0, 600 and 1200; replay stops after the third
    assert_eq!(report.frames_processed, 25);
    assert_eq!(report.events.last(), Some(&GestureEvent::Completed { gesture: Gesture::Clap }));
}

#[test]
fn test_replay_times_out() {
    let frames = (0..=11)
        .map(|i| recorded(i * 3_000, motion_gesture_detection::landmark::PoseResult::single(standing_pose())))
        .collect();
    let recording = SessionRecording {
        motion: "marching".to_string(),
        frames,
    };

    let report = replay(&recording, &Config::default(), None).unwrap();
    assert_eq!(report.outcome, Outcome::TimedOut);
    assert_eq!(report.count, 0);
    assert_eq!(report.events.last(), Some(&GestureEvent::Timeout { gesture: Gesture::March }));
}

#[test]
fn test_unknown_recorded_motion() {
    let recording = SessionRecording {
        motion: "skipping".to_string(),
        frames: Vec::new(),
    };
    assert!(matches!(
        replay(&recording, &Config::default(), None),
        Err(Error::UnknownMotion(_))
    ));
}

#[test]
fn test_out_of_range_jump_config_is_rejected() {
    let recording = SessionRecording {
        motion: "jumping".to_string(),
        frames: vec![recorded(0, test_helpers::frame(standing_pose()))],
    };

    for yaml in [
        "jump:\n  baseline_window: 0\n",
        "jump:\n  baseline_fraction: 0.0\n",
        "jump:\n  velocity_alpha: 0.0\n",
    ] {
        // Parses fine, fails only on validation
        let config = Config::from_yaml_str(yaml).unwrap();

        match DetectorHost::new(&config, Arc::new(ManualClock::new(0))) {
            Err(Error::ConfigError(msg)) => assert!(msg.starts_with("jump."), "{msg}"),
            Err(other) => panic!("Expected ConfigError, got {other:?}"),
            Ok(_) => panic!("Expected ConfigError for {yaml:?}"),
        }

        match replay(&recording, &config, None) {
            Err(Error::ConfigError(msg)) => assert!(msg.starts_with("jump."), "{msg}"),
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }
}
