//! Temporal stability of the label stream of one session.
//!
//! ## Stability score
//!
//! Over the last k = min(5, n) window entries:
//!
//! S = 0.6 · consistency + 0.4 · mean_confidence
//!
//! where consistency is the share of those entries carrying the current
//! label. Until three samples have been recorded the score is damped to
//! `confidence · 0.5`.

use std::collections::VecDeque;

use handsign_core::GestureLabel;
use serde::Serialize;

/// Default sliding-window capacity
pub const DEFAULT_WINDOW_CAPACITY: usize = 15;
/// Entries considered by the score
pub const RECENT_SAMPLES: usize = 5;
/// Samples needed before the full score is used
pub const COLD_START_SAMPLES: u64 = 3;

const CONSISTENCY_WEIGHT: f64 = 0.6;
const CONFIDENCE_WEIGHT: f64 = 0.4;
const COLD_START_DAMPING: f64 = 0.5;

/// Bounded FIFO of recent `(label, confidence)` observations
#[derive(Debug, Clone, Serialize)]
pub struct SlidingWindow {
    entries: VecDeque<(GestureLabel, f64)>,
    capacity: usize,
}

impl SlidingWindow {
    /// Capacity is raised to at least one entry
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the evicted oldest one if the window was full
    pub fn push(&mut self, label: GestureLabel, confidence: f64) -> Option<(GestureLabel, f64)> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back((label, confidence));
        evicted
    }

    /// The newest `n` entries, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &(GestureLabel, f64)> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(GestureLabel, f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Per-session stability scorer
#[derive(Debug, Clone, Serialize)]
pub struct StabilityTracker {
    window: SlidingWindow,
    /// Samples recorded since creation or the last reset
    total_samples: u64,
}

impl StabilityTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            window: SlidingWindow::new(capacity),
            total_samples: 0,
        }
    }

    /// Record the final label of a frame and return its stability in [0, 1]
    pub fn record(&mut self, label: GestureLabel, confidence: f64) -> f64 {
        let confidence = sanitize(confidence);
        self.window.push(label, confidence);
        self.total_samples += 1;

        if self.total_samples < COLD_START_SAMPLES {
            return (confidence * COLD_START_DAMPING).clamp(0.0, 1.0);
        }

        let k = RECENT_SAMPLES.min(self.window.len());
        if k == 0 {
            return 0.0;
        }

        let (matching, confidence_sum) = self
            .window
            .recent(k)
            .fold((0usize, 0.0), |(n, sum), (l, c)| {
                (n + usize::from(*l == label), sum + c)
            });

        let consistency = matching as f64 / k as f64;
        let mean_confidence = confidence_sum / k as f64;

        (CONSISTENCY_WEIGHT * consistency + CONFIDENCE_WEIGHT * mean_confidence).clamp(0.0, 1.0)
    }

    /// Forget all history; only called on an explicit session reset
    pub fn reset(&mut self) {
        self.window.clear();
        self.total_samples = 0;
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }
}

impl Default for StabilityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

fn sanitize(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = SlidingWindow::new(15);
        for i in 0..15 {
            assert!(window.push(GestureLabel::A, i as f64 / 100.0).is_none());
        }
        assert_eq!(window.len(), 15);

        let evicted = window.push(GestureLabel::B, 0.99);
        assert_eq!(evicted, Some((GestureLabel::A, 0.0)));
        assert_eq!(window.len(), 15);
        assert_eq!(window.iter().next(), Some(&(GestureLabel::A, 0.01)));
        assert_eq!(window.iter().last(), Some(&(GestureLabel::B, 0.99)));
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut tracker = StabilityTracker::new(4);
        for i in 0..50 {
            tracker.record(GestureLabel::C, (i % 10) as f64 / 10.0);
            assert!(tracker.window().len() <= 4);
        }
        assert_eq!(tracker.total_samples(), 50);
        assert_eq!(SlidingWindow::new(0).capacity(), 1);
    }

    #[test]
    fn test_cold_start_damping() {
        let mut tracker = StabilityTracker::default();
        assert!((tracker.record(GestureLabel::A, 0.92) - 0.46).abs() < 1e-12);
        assert!((tracker.record(GestureLabel::A, 0.8) - 0.4).abs() < 1e-12);
        // Third sample switches to the full score.
        let third = tracker.record(GestureLabel::A, 0.9);
        let expected = 0.6 + 0.4 * (0.92 + 0.8 + 0.9) / 3.0;
        assert!((third - expected).abs() < 1e-12);
    }

    #[test]
    fn test_five_identical_frames() {
        let mut tracker = StabilityTracker::default();
        let mut stability = 0.0;
        for _ in 0..5 {
            stability = tracker.record(GestureLabel::X, 0.9);
        }
        assert!((stability - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_label_change_lowers_consistency() {
        let mut tracker = StabilityTracker::default();
        for _ in 0..4 {
            tracker.record(GestureLabel::B, 1.0);
        }
        let s = tracker.record(GestureLabel::D, 1.0);
        // 1 of the last 5 matches, mean confidence 1.0.
        assert!((s - (0.6 * 0.2 + 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_only_last_five_count() {
        let mut tracker = StabilityTracker::default();
        for _ in 0..10 {
            tracker.record(GestureLabel::B, 0.1);
        }
        for _ in 0..5 {
            tracker.record(GestureLabel::A, 0.5);
        }
        let s = tracker.record(GestureLabel::A, 0.5);
        assert!((s - (0.6 + 0.4 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_stability_is_bounded() {
        let mut tracker = StabilityTracker::default();
        for c in [1.5, -0.3, f64::NAN, 2.0, 1.0, 0.0, 7.0] {
            let s = tracker.record(GestureLabel::Unknown, c);
            assert!((0.0..=1.0).contains(&s), "stability {} out of range", s);
        }
    }

    #[test]
    fn test_reset_restarts_cold_start() {
        let mut tracker = StabilityTracker::default();
        for _ in 0..6 {
            tracker.record(GestureLabel::A, 0.9);
        }
        tracker.reset();
        assert!(tracker.window().is_empty());
        assert_eq!(tracker.total_samples(), 0);
        assert!((tracker.record(GestureLabel::A, 0.9) - 0.45).abs() < 1e-12);
    }
}
