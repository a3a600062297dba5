//! Configuration management for the gesture detectors.
//!
//! Every tuned constant lives here with its empirically chosen default. The
//! defaults reproduce the shipped detector behaviour; a YAML file can
//! override any subset of them.

use crate::constants::{DEFAULT_VISIBILITY_THRESHOLD, DETECTION_TIMEOUT_MS, MARCH_VISIBILITY_THRESHOLD};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Time allowed to finish a sequence after detection starts
    pub detection_timeout_ms: u64,

    /// Clap detection parameters
    pub clap: ClapConfig,

    /// Wave detection parameters
    pub wave: WaveConfig,

    /// Jump detection parameters
    pub jump: JumpConfig,

    /// March detection parameters
    pub march: MarchConfig,

    /// Hand-raise detection parameters
    pub raise_hand: RaiseHandConfig,
}

/// Clap detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClapConfig {
    /// Wrist-pair and fingertip-pair distance below which hands are together
    pub distance_threshold: f64,

    /// Minimum time between counted claps
    pub cooldown_ms: u64,

    /// Claps needed to complete
    pub required_count: usize,

    /// Hand landmark visibility threshold
    pub visibility_threshold: f64,
}

/// Wave detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Minimum wrist height above the shoulder (negative allows slightly below)
    pub hands_up_threshold: f64,

    /// Per-frame horizontal displacement each hand needs for a paired wave
    pub horizontal_threshold: f64,

    /// Per-frame displacement a single hand needs on its own
    pub single_hand_threshold: f64,

    /// Minimum time between counted waves
    pub cooldown_ms: u64,

    /// Waves needed to complete
    pub required_count: usize,

    /// Arm landmark visibility threshold
    pub visibility_threshold: f64,
}

/// Jump detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Hip-height samples kept for the ground baseline
    pub baseline_window: usize,

    /// Fraction of the lowest samples averaged into the baseline
    pub baseline_fraction: f64,

    /// Samples needed before jumps are tracked
    pub min_baseline_samples: usize,

    /// EMA factor for the vertical hip velocity
    pub velocity_alpha: f64,

    /// Upward velocity that starts a rise
    pub rise_velocity: f64,

    /// Height above baseline (torso ratio) that starts a rise
    pub rise_height_ratio: f64,

    /// Upward velocity below which the rise has plateaued
    pub peak_velocity: f64,

    /// Downward velocity that starts the fall
    pub fall_velocity: f64,

    /// Velocity magnitude below which the body has settled
    pub landing_velocity: f64,

    /// Height (torso ratio) below which the body is back on the ground
    pub landing_height_ratio: f64,

    /// Height (torso ratio) above which a frame counts as airborne
    pub airborne_height_ratio: f64,

    /// Peak height (torso ratio) a jump must exceed
    pub min_peak_ratio: f64,

    /// Airborne frames a jump must exceed
    pub min_airborne_frames: u32,

    /// Frame budget for the rise phase
    pub max_rise_frames: u32,

    /// Frame budget for the airborne phase
    pub max_airborne_frames: u32,

    /// Frame budget for the fall phase
    pub max_fall_frames: u32,

    /// Minimum time between counted jumps
    pub cooldown_ms: u64,

    /// Jumps needed to complete
    pub required_count: usize,

    /// Body landmark visibility threshold
    pub visibility_threshold: f64,
}

/// March detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchConfig {
    /// Visible frames averaged into the standing knee baseline
    pub baseline_frames: u32,

    /// Fixed part of the knee-lift threshold
    pub base_threshold: f64,

    /// Leg-length scaled part of the knee-lift threshold
    pub leg_length_multiplier: f64,

    /// Consecutive lifted frames needed for a step
    pub min_frames_lifted: u32,

    /// Minimum time between counted steps (shared by both legs)
    pub cooldown_ms: u64,

    /// Steps needed to complete
    pub required_count: usize,

    /// Leg landmark visibility threshold
    pub visibility_threshold: f64,
}

/// Hand-raise detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaiseHandConfig {
    /// Threshold as a fraction of shoulder width
    pub adaptive_threshold_ratio: f64,

    /// Floor for the measured shoulder width
    pub min_shoulder_width: f64,

    /// Fallback threshold scale
    pub base_threshold: f64,

    /// Fraction of `base_threshold` the adaptive threshold never drops below
    pub base_threshold_floor: f64,

    /// EMA factor for wrist heights
    pub smoothing_alpha: f64,

    /// Minimum elbow-to-wrist distance for a valid raise
    pub min_arm_length: f64,

    /// Minimum shoulder-to-wrist horizontal separation for a valid raise
    pub min_horizontal_separation: f64,

    /// Hold time before a raise counts
    pub min_raise_duration_ms: u64,

    /// Minimum time between counted raises
    pub cooldown_ms: u64,

    /// Raises needed to complete
    pub required_count: usize,

    /// Arm landmark visibility threshold
    pub visibility_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detection_timeout_ms: DETECTION_TIMEOUT_MS,
            clap: ClapConfig::default(),
            wave: WaveConfig::default(),
            jump: JumpConfig::default(),
            march: MarchConfig::default(),
            raise_hand: RaiseHandConfig::default(),
        }
    }
}

impl Default for ClapConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.125,
            cooldown_ms: 500,
            required_count: 3,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

impl WaveConfig {
    /// Both hands clearly overhead, two waves
    #[must_use]
    pub fn standing() -> Self {
        Self {
            hands_up_threshold: 0.3,
            horizontal_threshold: 0.1,
            single_hand_threshold: 0.15,
            cooldown_ms: 300,
            required_count: 2,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }

    /// Hands roughly at shoulder height or above, for seated users
    #[must_use]
    pub fn seated() -> Self {
        Self {
            hands_up_threshold: -0.05,
            horizontal_threshold: 0.04,
            single_hand_threshold: 0.06,
            cooldown_ms: 100,
            required_count: 3,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self::standing()
    }
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            baseline_window: 15,
            baseline_fraction: 0.6,
            min_baseline_samples: 5,
            velocity_alpha: 0.5,
            rise_velocity: 0.004,
            rise_height_ratio: 0.04,
            peak_velocity: 0.006,
            fall_velocity: 0.003,
            landing_velocity: 0.006,
            landing_height_ratio: 0.08,
            airborne_height_ratio: 0.08,
            min_peak_ratio: 0.12,
            min_airborne_frames: 1,
            max_rise_frames: 10,
            max_airborne_frames: 15,
            max_fall_frames: 12,
            cooldown_ms: 400,
            required_count: 3,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            baseline_frames: 10,
            base_threshold: 0.06,
            leg_length_multiplier: 0.25,
            min_frames_lifted: 2,
            cooldown_ms: 400,
            required_count: 6,
            visibility_threshold: MARCH_VISIBILITY_THRESHOLD,
        }
    }
}

impl Default for RaiseHandConfig {
    fn default() -> Self {
        Self {
            adaptive_threshold_ratio: 0.25,
            min_shoulder_width: 0.05,
            base_threshold: 0.08,
            base_threshold_floor: 0.12,
            smoothing_alpha: 0.4,
            min_arm_length: 0.06,
            min_horizontal_separation: 0.03,
            min_raise_duration_ms: 300,
            cooldown_ms: 1500,
            required_count: 3,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be between 0.0 and 1.0")))
    }
}

fn check_alpha(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be in (0.0, 1.0]")))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be greater than 0")))
    }
}

fn check_count(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(Error::ConfigError(format!("{name} must be greater than 0")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.detection_timeout_ms == 0 {
            return Err(Error::ConfigError("Detection timeout must be greater than 0".to_string()));
        }

        // Clap
        check_positive("clap.distance_threshold", self.clap.distance_threshold)?;
        check_count("clap.required_count", self.clap.required_count)?;
        check_unit("clap.visibility_threshold", self.clap.visibility_threshold)?;

        // Wave
        if !self.wave.hands_up_threshold.is_finite() {
            return Err(Error::ConfigError("wave.hands_up_threshold must be finite".to_string()));
        }
        check_positive("wave.horizontal_threshold", self.wave.horizontal_threshold)?;
        check_positive("wave.single_hand_threshold", self.wave.single_hand_threshold)?;
        check_count("wave.required_count", self.wave.required_count)?;
        check_unit("wave.visibility_threshold", self.wave.visibility_threshold)?;

        // Jump
        check_count("jump.baseline_window", self.jump.baseline_window)?;
        check_alpha("jump.baseline_fraction", self.jump.baseline_fraction)?;
        check_count("jump.min_baseline_samples", self.jump.min_baseline_samples)?;
        if self.jump.min_baseline_samples > self.jump.baseline_window {
            return Err(Error::ConfigError(
                "jump.min_baseline_samples must not exceed jump.baseline_window".to_string(),
            ));
        }
        check_alpha("jump.velocity_alpha", self.jump.velocity_alpha)?;
        check_positive("jump.rise_velocity", self.jump.rise_velocity)?;
        check_positive("jump.peak_velocity", self.jump.peak_velocity)?;
        check_positive("jump.fall_velocity", self.jump.fall_velocity)?;
        check_positive("jump.landing_velocity", self.jump.landing_velocity)?;
        check_positive("jump.min_peak_ratio", self.jump.min_peak_ratio)?;
        check_count("jump.required_count", self.jump.required_count)?;
        check_unit("jump.visibility_threshold", self.jump.visibility_threshold)?;

        // March
        if self.march.baseline_frames == 0 {
            return Err(Error::ConfigError("march.baseline_frames must be greater than 0".to_string()));
        }
        if self.march.min_frames_lifted == 0 {
            return Err(Error::ConfigError("march.min_frames_lifted must be greater than 0".to_string()));
        }
        check_positive("march.base_threshold", self.march.base_threshold)?;
        check_count("march.required_count", self.march.required_count)?;
        check_unit("march.visibility_threshold", self.march.visibility_threshold)?;

        // Raise hand
        check_positive("raise_hand.adaptive_threshold_ratio", self.raise_hand.adaptive_threshold_ratio)?;
        check_positive("raise_hand.min_shoulder_width", self.raise_hand.min_shoulder_width)?;
        check_alpha("raise_hand.smoothing_alpha", self.raise_hand.smoothing_alpha)?;
        check_count("raise_hand.required_count", self.raise_hand.required_count)?;
        check_unit("raise_hand.visibility_threshold", self.raise_hand.visibility_threshold)?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gesture Detection Configuration

# Time allowed to complete a gesture sequence
detection_timeout_ms: 30000

# Clapping: wrists and index fingertips together
clap:
  distance_threshold: 0.125
  cooldown_ms: 500
  required_count: 3
  visibility_threshold: 0.5

# Waving: both hands up, alternating horizontal motion
# (seated preset: hands_up_threshold -0.05, horizontal 0.04, single 0.06,
#  cooldown 100, required 3)
wave:
  hands_up_threshold: 0.3
  horizontal_threshold: 0.1
  single_hand_threshold: 0.15
  cooldown_ms: 300
  required_count: 2
  visibility_threshold: 0.5

# Jumping: hip-height phase machine; ratios are relative to torso length
jump:
  baseline_window: 15
  baseline_fraction: 0.6
  min_baseline_samples: 5
  velocity_alpha: 0.5
  rise_velocity: 0.004
  rise_height_ratio: 0.04
  peak_velocity: 0.006
  fall_velocity: 0.003
  landing_velocity: 0.006
  landing_height_ratio: 0.08
  airborne_height_ratio: 0.08
  min_peak_ratio: 0.12
  min_airborne_frames: 1
  max_rise_frames: 10
  max_airborne_frames: 15
  max_fall_frames: 12
  cooldown_ms: 400
  required_count: 3
  visibility_threshold: 0.5

# Marching: knee lifts against a calibrated standing baseline
march:
  baseline_frames: 10
  base_threshold: 0.06
  leg_length_multiplier: 0.25
  min_frames_lifted: 2
  cooldown_ms: 400
  required_count: 6
  visibility_threshold: 0.3

# Raising a hand: shoulder-width scaled threshold, held briefly
raise_hand:
  adaptive_threshold_ratio: 0.25
  min_shoulder_width: 0.05
  base_threshold: 0.08
  base_threshold_floor: 0.12
  smoothing_alpha: 0.4
  min_arm_length: 0.06
  min_horizontal_separation: 0.03
  min_raise_duration_ms: 300
  cooldown_ms: 1500
  required_count: 3
  visibility_threshold: 0.5
"#;
