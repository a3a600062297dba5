use super::SignalFilter;

/// Exponential smoothing filter.
///
/// Unlike [`crate::utils::ema`], history is tracked explicitly, so a smoothed
/// value of zero is a legitimate state.
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<f64>,
}

impl ExponentialFilter {
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }

    /// Last filtered value, if any sample has been seen
    pub fn value(&self) -> Option<f64> {
        self.last
    }
}

impl SignalFilter for ExponentialFilter {
    fn apply(&mut self, value: f64) -> f64 {
        let filtered = match self.last {
            Some(last) => self.alpha * value + (1.0 - self.alpha) * last,
            None => value,
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.5);

        // First value passes through
        assert_eq!(filter.apply(10.0), 10.0);

        // Second value is smoothed
        assert_eq!(filter.apply(20.0), 15.0); // 0.5 * 20 + 0.5 * 10
    }

    #[test]
    fn test_zero_is_a_real_state() {
        let mut filter = ExponentialFilter::new(0.5);
        filter.apply(0.0);
        assert_eq!(filter.apply(1.0), 0.5);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut filter = ExponentialFilter::new(0.1);
        filter.apply(10.0);
        filter.reset();
        assert!(filter.value().is_none());
        assert_eq!(filter.apply(20.0), 20.0);
    }

    #[test]
    #[should_panic(expected = "Alpha must be in (0, 1]")]
    fn test_zero_alpha_rejected() {
        let _ = ExponentialFilter::new(0.0);
    }
}
