//! Geometry helpers shared by every detector.

use crate::constants::DEFAULT_VISIBILITY_THRESHOLD;
use crate::landmark::Landmark;

/// Euclidean distance between two landmarks in the image plane
#[must_use]
pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Whether a landmark can be trusted at the given confidence threshold.
///
/// A landmark without a visibility score is always considered visible.
#[must_use]
pub fn is_visible_at(landmark: &Landmark, threshold: f64) -> bool {
    landmark.visibility.map_or(true, |score| score > threshold)
}

/// [`is_visible_at`] with the default threshold of 0.5
#[must_use]
pub fn is_visible(landmark: &Landmark) -> bool {
    is_visible_at(landmark, DEFAULT_VISIBILITY_THRESHOLD)
}

/// True when every landmark passes [`is_visible_at`]
#[must_use]
pub fn all_visible(landmarks: &[&Landmark], threshold: f64) -> bool {
    landmarks.iter().all(|lm| is_visible_at(lm, threshold))
}

/// Exponential moving average.
///
/// A `previous` of exactly `0.0` is read as "no history yet" and `current` is
/// returned unchanged, which skips the warm-up from a false zero baseline.
/// A genuine smoothed value of zero is therefore indistinguishable from an
/// uninitialized one.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn ema(previous: f64, current: f64, alpha: f64) -> f64 {
    if previous == 0.0 {
        return current;
    }
    previous * (1.0 - alpha) + current * alpha
}

/// Mean vertical position of two landmarks
#[must_use]
pub fn midpoint_y(a: &Landmark, b: &Landmark) -> f64 {
    (a.y + b.y) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((distance(&a, &b) - 0.5).abs() < 1e-12);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_visibility_gating() {
        assert!(is_visible(&Landmark::new(0.5, 0.5)));
        assert!(is_visible(&Landmark::with_visibility(0.5, 0.5, 0.51)));
        assert!(!is_visible(&Landmark::with_visibility(0.5, 0.5, 0.5)));
        assert!(is_visible_at(&Landmark::with_visibility(0.5, 0.5, 0.4), 0.3));
    }

    #[test]
    fn test_all_visible() {
        let seen = Landmark::with_visibility(0.1, 0.1, 0.9);
        let hidden = Landmark::with_visibility(0.1, 0.1, 0.1);
        assert!(all_visible(&[&seen, &seen], 0.5));
        assert!(!all_visible(&[&seen, &hidden], 0.5));
    }

    #[test]
    fn test_ema_uninitialized_passes_through() {
        assert_eq!(ema(0.0, 0.3, 0.4), 0.3);
    }

    #[test]
    fn test_ema_smoothing() {
        let smoothed = ema(0.1, 0.2, 0.4);
        assert!((smoothed - 0.14).abs() < 1e-12); // 0.1 * 0.6 + 0.2 * 0.4
    }

    #[test]
    fn test_midpoint_y() {
        let a = Landmark::new(0.0, 0.4);
        let b = Landmark::new(1.0, 0.6);
        assert!((midpoint_y(&a, &b) - 0.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(ax in 0.0..1.0f64, ay in 0.0..1.0f64, bx in 0.0..1.0f64, by in 0.0..1.0f64) {
            let a = Landmark::new(ax, ay);
            let b = Landmark::new(bx, by);
            prop_assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-12);
            prop_assert!(distance(&a, &b) >= 0.0);
        }

        #[test]
        fn prop_ema_stays_between_inputs(prev in 0.01..1.0f64, cur in -1.0..1.0f64, alpha in 0.0..=1.0f64) {
            let out = ema(prev, cur, alpha);
            let lo = prev.min(cur) - 1e-12;
            let hi = prev.max(cur) + 1e-12;
            prop_assert!(out >= lo && out <= hi);
        }
    }
}
