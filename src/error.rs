//! Error types for the gesture detection library.
//!
//! Detectors themselves never fail: bad frames are folded into a "not ready"
//! outcome. Errors only come from the outer surfaces (configuration files,
//! motion-type names and session recordings).

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Session motion type does not name a known gesture
    #[error("Unknown motion type: {0}")]
    UnknownMotion(String),

    /// Recorded landmark session could not be read or is malformed
    #[error("Recording error: {0}")]
    RecordingError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
