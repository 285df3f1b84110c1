//! First-stage rule cascade.
//!
//! Rules are evaluated in table order and the first satisfied predicate
//! wins, so order encodes precedence between overlapping hand shapes.
//! Letters without a rule fall through to `Unknown`.

use handsign_core::{Finger, GestureLabel};
use serde::Serialize;

use crate::features::HandFeatures;

/// Confidence reported when no rule matches
pub const DEFAULT_UNKNOWN_CONFIDENCE: f64 = 0.3;

/// Openness below which a closed hand counts as a fist
const FIST_OPENNESS: f64 = 0.3;
/// Openness above which four raised fingers count as a flat hand
const FLAT_HAND_OPENNESS: f64 = 0.7;

pub type Predicate = fn(&HandFeatures) -> bool;

/// One row of a rule table
#[derive(Clone, Copy)]
pub struct PrimaryRule {
    pub name: &'static str,
    pub label: GestureLabel,
    pub confidence: f64,
    pub predicate: Predicate,
}

impl PrimaryRule {
    pub const fn new(
        name: &'static str,
        label: GestureLabel,
        confidence: f64,
        predicate: Predicate,
    ) -> Self {
        Self {
            name,
            label,
            confidence,
            predicate,
        }
    }

    pub fn matches(&self, features: &HandFeatures) -> bool {
        (self.predicate)(features)
    }
}

impl std::fmt::Debug for PrimaryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryRule")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("confidence", &self.confidence)
            .finish()
    }
}

/// Outcome of the first stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrimaryMatch {
    pub label: GestureLabel,
    pub confidence: f64,
    /// Name of the rule that fired, `None` on fallback
    pub rule: Option<&'static str>,
}

impl PrimaryMatch {
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

fn closed_fist_thumb_side(h: &HandFeatures) -> bool {
    let f = &h.fingers;
    f.all_fingers_down() && f.extended(Finger::Thumb) && f.hand_openness < FIST_OPENNESS
}

fn flat_hand_thumb_tucked(h: &HandFeatures) -> bool {
    let f = &h.fingers;
    f.fingers_up() == 4 && !f.extended(Finger::Thumb) && f.hand_openness > FLAT_HAND_OPENNESS
}

fn fist_thumb_out(h: &HandFeatures) -> bool {
    h.fingers.all_fingers_down() && h.fingers.extended(Finger::Thumb)
}

fn four_up_thumb_in(h: &HandFeatures) -> bool {
    h.fingers.fingers_up() == 4 && !h.fingers.extended(Finger::Thumb)
}

fn thumb_and_index(h: &HandFeatures) -> bool {
    let f = &h.fingers;
    f.fingers_up() == 1 && f.extended(Finger::Thumb) && f.extended(Finger::Index)
}

fn thumb_and_pinky(h: &HandFeatures) -> bool {
    let f = &h.fingers;
    f.fingers_up() == 1 && f.extended(Finger::Thumb) && f.extended(Finger::Pinky)
}

fn index_only(h: &HandFeatures) -> bool {
    h.fingers.fingers_up() == 1 && h.fingers.extended(Finger::Index)
}

fn pinky_only(h: &HandFeatures) -> bool {
    h.fingers.fingers_up() == 1 && h.fingers.extended(Finger::Pinky)
}

fn all_fingers_down(h: &HandFeatures) -> bool {
    h.fingers.all_fingers_down()
}

/// Rule table of the two-layer recognizer
pub const TWO_LAYER_RULES: &[PrimaryRule] = &[
    PrimaryRule::new("closed_fist_thumb_side", GestureLabel::A, 0.92, closed_fist_thumb_side),
    PrimaryRule::new("flat_hand_thumb_tucked", GestureLabel::B, 0.90, flat_hand_thumb_tucked),
    PrimaryRule::new("thumb_index_l", GestureLabel::L, 0.85, thumb_and_index),
    PrimaryRule::new("thumb_pinky_y", GestureLabel::Y, 0.85, thumb_and_pinky),
    PrimaryRule::new("index_pointing", GestureLabel::D, 0.80, index_only),
    PrimaryRule::new("pinky_raised", GestureLabel::I, 0.80, pinky_only),
    PrimaryRule::new("curled_fist", GestureLabel::E, 0.75, all_fingers_down),
];

/// Rule table of the single-layer recognizer (no openness gates)
pub const SIMPLE_RULES: &[PrimaryRule] = &[
    PrimaryRule::new("fist_thumb_out", GestureLabel::A, 0.85, fist_thumb_out),
    PrimaryRule::new("four_up_thumb_in", GestureLabel::B, 0.90, four_up_thumb_in),
    PrimaryRule::new("thumb_index_l", GestureLabel::L, 0.85, thumb_and_index),
    PrimaryRule::new("thumb_pinky_y", GestureLabel::Y, 0.85, thumb_and_pinky),
    PrimaryRule::new("index_pointing", GestureLabel::D, 0.80, index_only),
    PrimaryRule::new("pinky_raised", GestureLabel::I, 0.80, pinky_only),
    PrimaryRule::new("curled_fist", GestureLabel::E, 0.75, all_fingers_down),
];

#[derive(Debug, Clone)]
pub struct PrimaryClassifier {
    rules: Vec<PrimaryRule>,
    unknown_confidence: f64,
}

impl PrimaryClassifier {
    pub fn new(unknown_confidence: f64) -> Self {
        Self::with_rules(TWO_LAYER_RULES.to_vec(), unknown_confidence)
    }

    pub fn with_rules(rules: Vec<PrimaryRule>, unknown_confidence: f64) -> Self {
        Self {
            rules,
            unknown_confidence: unknown_confidence.clamp(0.0, 1.0),
        }
    }

    pub fn classify(&self, features: &HandFeatures) -> PrimaryMatch {
        self.rules
            .iter()
            .find(|rule| rule.matches(features))
            .map(|rule| PrimaryMatch {
                label: rule.label,
                confidence: rule.confidence.clamp(0.0, 1.0),
                rule: Some(rule.name),
            })
            .unwrap_or(PrimaryMatch {
                label: GestureLabel::Unknown,
                confidence: self.unknown_confidence,
                rule: None,
            })
    }

    pub fn rules(&self) -> &[PrimaryRule] {
        &self.rules
    }
}

impl Default for PrimaryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_UNKNOWN_CONFIDENCE)
    }
}
