//! Recorded pose sessions.
//!
//! A recording is a YAML document holding the session's motion type and the
//! timestamped pose frames a live host would have delivered:
//!
//! ```yaml
//! motion: clapping
//! frames:
//!   - timestamp_ms: 0
//!     people:
//!       - - { x: 0.5, y: 0.5, visibility: 0.9 }
//!         - { x: 0.5, y: 0.4 }
//!   - timestamp_ms: 33
//!     people: []
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::landmark::{Landmark, PoseResult};

/// One frame of pose model output with its capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub people: Vec<Vec<Landmark>>,
}

impl RecordedFrame {
    /// Frame as the detectors see it
    #[must_use]
    pub fn pose_result(&self) -> PoseResult {
        PoseResult {
            people: self.people.clone(),
        }
    }
}

/// A motion session captured for offline replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecording {
    /// Session motion type, e.g. `"clapping"` or `"raising_hand"`
    pub motion: String,
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

impl SessionRecording {
    /// Load and validate a recording from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a recording from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let recording: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::RecordingError(format!("Failed to parse recording: {e}")))?;
        recording.validate()?;
        Ok(recording)
    }

    /// Save this recording as YAML
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::RecordingError(format!("Failed to serialize recording: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that frame timestamps never go backwards
    pub fn validate(&self) -> Result<()> {
        if let Some(i) = self
            .frames
            .windows(2)
            .position(|pair| pair[1].timestamp_ms < pair[0].timestamp_ms)
        {
            return Err(Error::RecordingError(format!(
                "Frame {} timestamp {} precedes previous frame timestamp {}",
                i + 1,
                self.frames[i + 1].timestamp_ms,
                self.frames[i].timestamp_ms
            )));
        }
        Ok(())
    }

    /// Time between the first and last frame
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp_ms.saturating_sub(first.timestamp_ms),
            _ => 0,
        }
    }
}
