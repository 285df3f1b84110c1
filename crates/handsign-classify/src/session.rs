//! Per-session recognition state.

use handsign_core::{GestureLabel, SessionId, Timestamp};
use serde::Serialize;

use crate::stability::StabilityTracker;

/// State owned by one tracked hand, passed explicitly into each
/// classification call
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionSession {
    pub id: SessionId,
    pub started_at: Timestamp,
    tracker: StabilityTracker,
    frames_processed: u64,
    last_label: Option<GestureLabel>,
}

impl RecognitionSession {
    pub fn new(id: SessionId, window_capacity: usize) -> Self {
        Self {
            id,
            started_at: Timestamp::now(),
            tracker: StabilityTracker::new(window_capacity),
            frames_processed: 0,
            last_label: None,
        }
    }

    /// Count a frame that produced no label (missing hand or fault)
    pub fn skip_frame(&mut self) {
        self.frames_processed += 1;
    }

    /// Record a frame's final label and return its stability
    pub fn record(&mut self, label: GestureLabel, confidence: f64) -> f64 {
        self.frames_processed += 1;
        self.last_label = Some(label);
        self.tracker.record(label, confidence)
    }

    /// Explicit reset, e.g. when the hand re-enters view
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.last_label = None;
    }

    pub fn tracker(&self) -> &StabilityTracker {
        &self.tracker
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn last_label(&self) -> Option<GestureLabel> {
        self.last_label
    }
}
