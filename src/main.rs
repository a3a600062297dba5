//! Replays recorded pose sessions through the gesture detectors.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use motion_gesture_detection::config::{Config, WaveConfig, EXAMPLE_CONFIG};
use motion_gesture_detection::events::GestureEvent;
use motion_gesture_detection::recording::SessionRecording;
use motion_gesture_detection::replay::{replay, Outcome};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded session to replay (YAML)
    #[arg(short, long, required_unless_present = "print_config")]
    recording: Option<String>,

    /// Motion type to detect instead of the recorded one
    #[arg(short, long)]
    motion: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Use the seated wave thresholds
    #[arg(long)]
    seated: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print the example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn describe(event: &GestureEvent) -> String {
    match *event {
        GestureEvent::Detected { gesture, count } => format!("{gesture}: repetition {count}"),
        GestureEvent::Progress {
            gesture,
            current,
            required,
        } => format!("{gesture}: progress {current}/{required}"),
        GestureEvent::Completed { gesture } => format!("{gesture}: completed"),
        GestureEvent::Timeout { gesture } => format!("{gesture}: detection timed out"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {path}");
            match Config::from_file(path).and_then(|cfg| cfg.validate().map(|()| cfg)) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {e}. Using defaults.");
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };
    if args.seated {
        config.wave = WaveConfig::seated();
    }

    let path = args.recording.context("--recording is required")?;
    let recording =
        SessionRecording::from_file(&path).with_context(|| format!("Failed to load recording {path}"))?;

    let report = replay(&recording, &config, args.motion.as_deref())?;

    for event in &report.events {
        println!("{}", describe(event));
    }
    println!(
        "{}: {} ({}/{} {}, {} of {} frames analyzed)",
        report.gesture,
        report.outcome,
        report.count,
        report.required,
        report.gesture.repetition_noun(),
        report.frames_processed,
        recording.frames.len()
    );

    if report.outcome != Outcome::Completed {
        std::process::exit(1);
    }
    Ok(())
}
