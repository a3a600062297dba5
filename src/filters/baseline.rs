use std::collections::VecDeque;
use super::SignalFilter;

/// Rolling baseline over the lowest part of the body's recent positions.
///
/// Samples are image-space `y` values, so "lowest" means largest. The
/// baseline is the mean of the largest `fraction` of the window, which stays
/// near ground level even while part of the window was recorded mid-jump.
pub struct RollingBaseline {
    window_size: usize,
    fraction: f64,
    buffer: VecDeque<f64>,
}

impl RollingBaseline {
    /// Create a baseline over the last `window_size` samples
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is 0 or `fraction` is not in the range (0, 1]
    #[must_use]
    pub fn new(window_size: usize, fraction: f64) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(fraction > 0.0 && fraction <= 1.0, "Fraction must be in (0, 1]");
        Self {
            window_size,
            fraction,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current baseline without adding a sample
    pub fn baseline(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            return None;
        }

        let mut sorted: Vec<f64> = self.buffer.iter().copied().collect();
        sorted.sort_by(|a, b| b.total_cmp(a));

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let take = ((sorted.len() as f64 * self.fraction).ceil() as usize).clamp(1, sorted.len());

        #[allow(clippy::cast_precision_loss)]
        let mean = sorted[..take].iter().sum::<f64>() / take as f64;
        Some(mean)
    }
}

impl SignalFilter for RollingBaseline {
    fn apply(&mut self, value: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);

        self.baseline().unwrap_or(value)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "RollingBaseline"
    }
}
