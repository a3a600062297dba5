//! Signal filters for smoothing landmark-derived measurements.
//!
//! Detectors feed per-frame scalar signals (hip height, vertical velocity)
//! through these filters to suppress pose-model jitter.

/// Exponential filter for responsive smoothing
pub mod exponential;

/// Rolling low-percentile baseline for ground-level estimation
pub mod baseline;

/// Trait for scalar signal filters
pub trait SignalFilter: Send + Sync {
    /// Feed one sample and return the filtered value
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}
