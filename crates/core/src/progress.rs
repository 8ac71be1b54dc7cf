//! Progress tracker - the secondary metric that drives the win condition
//!
//! The authoritative value changes instantly when tiles are scored and is
//! clamped to `[0, PROGRESS_MAX]`. A separate display value eases toward it at a
//! fixed rate for presentation.

use crate::types::{DEFAULT_COMPLETION_THRESHOLD, PROGRESS_MAX, PROGRESS_SMOOTH_RATE};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    current: f32,
    display: f32,
    threshold: f32,
    /// Display catch-up speed in progress units per second
    rate: f32,
}

impl ProgressTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            current: 0.0,
            display: 0.0,
            threshold,
            rate: PROGRESS_SMOOTH_RATE,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn display(&self) -> f32 {
        self.display
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Add progress, returning the delta actually applied after clamping
    ///
    /// Negative or non-finite amounts are ignored so progress never decreases.
    pub fn add(&mut self, amount: f32) -> f32 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, PROGRESS_MAX);
        self.current - before
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.threshold
    }

    /// Move the display value toward the authoritative one
    pub fn tick(&mut self, elapsed_ms: u32) {
        let step = self.rate * (elapsed_ms as f32) / 1000.0;
        if self.display < self.current {
            self.display = (self.display + step).min(self.current);
        } else if self.display > self.current {
            self.display = (self.display - step).max(self.current);
        }
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.display = 0.0;
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLETION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_clamps_at_max() {
        let mut p = ProgressTracker::default();
        assert_eq!(p.add(60.0), 60.0);
        assert_eq!(p.add(60.0), 40.0);
        assert_eq!(p.current(), 100.0);
        assert!(p.is_complete());
        assert_eq!(p.add(5.0), 0.0);
    }

    #[test]
    fn add_ignores_negative_amounts() {
        let mut p = ProgressTracker::default();
        p.add(10.0);
        assert_eq!(p.add(-4.0), 0.0);
        assert_eq!(p.add(f32::NAN), 0.0);
        assert_eq!(p.current(), 10.0);
    }

    #[test]
    fn lower_threshold_completes_early() {
        let mut p = ProgressTracker::new(3.0);
        p.add(2.0);
        assert!(!p.is_complete());
        p.add(1.0);
        assert!(p.is_complete());
    }

    #[test]
    fn display_eases_without_overshoot() {
        let mut p = ProgressTracker::default();
        p.add(10.0);
        assert_eq!(p.display(), 0.0);

        // 50 units/s for 100ms = 5 units.
        p.tick(100);
        assert_eq!(p.display(), 5.0);

        p.tick(1000);
        assert_eq!(p.display(), 10.0);
    }

    #[test]
    fn custom_rate_controls_display_speed() {
        let mut p = ProgressTracker::default().with_rate(20.0);
        assert_eq!(p.rate(), 20.0);
        p.add(10.0);

        // 20 units/s for 250ms = 5 units.
        p.tick(250);
        assert_eq!(p.display(), 5.0);
        assert_eq!(p.current(), 10.0);

        p.tick(250);
        assert_eq!(p.display(), 10.0);
    }

    #[test]
    fn reset_zeroes_both_values() {
        let mut p = ProgressTracker::default();
        p.add(30.0);
        p.tick(200);
        p.reset();
        assert_eq!(p.current(), 0.0);
        assert_eq!(p.display(), 0.0);
    }
}
