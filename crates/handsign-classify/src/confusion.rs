//! Second-stage disambiguation of visually similar letters.
//!
//! Some letters are hard to separate with finger states alone. When the
//! first stage lands on a member of a confusion group, the group's own
//! rules look at specific feature-vector entries to pick the member. A
//! group with no matching rule leaves the first-stage result alone.
//!
//! The `R` and `U` rules need the middle finger extended. The built-in
//! first-stage tables only produce a pointing-group label for a lone index
//! finger, so those two rules fire only behind a custom table passed to
//! [`PrimaryClassifier::with_rules`](crate::primary::PrimaryClassifier::with_rules).

use handsign_core::{Finger, GestureLabel};
use serde::{Deserialize, Serialize};

use crate::features::HandFeatures;
use crate::primary::{PrimaryMatch, Predicate};

/// Half-width of the index-angle band treated as "level" pointing (radians)
const LEVEL_ANGLE: f64 = 0.5;
/// Minimum thumb tip distance from the wrist for a `D`
const THUMB_CLEARANCE: f64 = 0.05;

/// How a secondary rule decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisambiguationMethod {
    AngleAnalysis,
}

impl DisambiguationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisambiguationMethod::AngleAnalysis => "angle_analysis",
        }
    }
}

#[derive(Clone, Copy)]
pub struct SecondaryRule {
    pub label: GestureLabel,
    pub confidence: f64,
    pub method: DisambiguationMethod,
    pub predicate: Predicate,
}

impl std::fmt::Debug for SecondaryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecondaryRule")
            .field("label", &self.label)
            .field("confidence", &self.confidence)
            .field("method", &self.method)
            .finish()
    }
}

/// Named set of similar letters plus the rules that separate them
#[derive(Debug, Clone)]
pub struct ConfusionGroup {
    pub name: &'static str,
    pub members: &'static [GestureLabel],
    pub rules: &'static [SecondaryRule],
}

impl ConfusionGroup {
    pub fn contains(&self, label: GestureLabel) -> bool {
        self.members.contains(&label)
    }
}

/// Second-stage result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Refinement {
    pub label: GestureLabel,
    /// Confidence of the secondary rule alone
    pub secondary_confidence: f64,
    /// Mean of the primary and secondary confidences
    pub blended_confidence: f64,
    pub group: &'static str,
    pub method: DisambiguationMethod,
}

fn index_angle(h: &HandFeatures) -> f64 {
    h.vector.tip_angle(Finger::Index)
}

fn level_index_thumb_clear(h: &HandFeatures) -> bool {
    let angle = index_angle(h);
    (-LEVEL_ANGLE..=LEVEL_ANGLE).contains(&angle)
        && h.vector.tip_distance(Finger::Thumb) > THUMB_CLEARANCE
}

fn index_raised_with_middle(h: &HandFeatures) -> bool {
    index_angle(h) > LEVEL_ANGLE && h.fingers.extended(Finger::Middle)
}

fn index_lowered_with_middle(h: &HandFeatures) -> bool {
    index_angle(h) < -LEVEL_ANGLE && h.fingers.extended(Finger::Middle)
}

const POINTING_RULES: &[SecondaryRule] = &[
    SecondaryRule {
        label: GestureLabel::D,
        confidence: 0.91,
        method: DisambiguationMethod::AngleAnalysis,
        predicate: level_index_thumb_clear,
    },
    SecondaryRule {
        label: GestureLabel::R,
        confidence: 0.89,
        method: DisambiguationMethod::AngleAnalysis,
        predicate: index_raised_with_middle,
    },
    SecondaryRule {
        label: GestureLabel::U,
        confidence: 0.88,
        method: DisambiguationMethod::AngleAnalysis,
        predicate: index_lowered_with_middle,
    },
];

use GestureLabel::*;

/// Groups in lookup order
pub const CONFUSION_GROUPS: &[ConfusionGroup] = &[
    ConfusionGroup {
        name: "pointing_gestures",
        members: &[D, R, U, Z],
        rules: POINTING_RULES,
    },
    ConfusionGroup {
        name: "thumb_index_combos",
        members: &[T, K, D, I],
        rules: &[],
    },
    ConfusionGroup {
        name: "fist_variations",
        members: &[S, M, N, A, E],
        rules: &[],
    },
    ConfusionGroup {
        name: "curved_shapes",
        members: &[C, O],
        rules: &[],
    },
    ConfusionGroup {
        name: "four_finger_sets",
        members: &[B, F],
        rules: &[],
    },
    ConfusionGroup {
        name: "downward_gestures",
        members: &[P, Q],
        rules: &[],
    },
    ConfusionGroup {
        name: "two_three_fingers",
        members: &[V, W],
        rules: &[],
    },
    ConfusionGroup {
        name: "horizontal_gestures",
        members: &[G, H],
        rules: &[],
    },
];

#[derive(Debug, Clone)]
pub struct ConfusionGroupDisambiguator {
    groups: &'static [ConfusionGroup],
}

impl ConfusionGroupDisambiguator {
    pub fn new() -> Self {
        Self::with_groups(CONFUSION_GROUPS)
    }

    pub fn with_groups(groups: &'static [ConfusionGroup]) -> Self {
        Self { groups }
    }

    /// True when `label` belongs to at least one group
    pub fn is_confusable(&self, label: GestureLabel) -> bool {
        self.groups.iter().any(|g| g.contains(label))
    }

    /// Refine a first-stage match, or `None` to keep it as is
    pub fn disambiguate(
        &self,
        primary: &PrimaryMatch,
        features: &HandFeatures,
    ) -> Option<Refinement> {
        self.groups
            .iter()
            .filter(|group| group.contains(primary.label))
            .find_map(|group| {
                group
                    .rules
                    .iter()
                    .find(|rule| (rule.predicate)(features))
                    .map(|rule| {
                        let secondary = rule.confidence.clamp(0.0, 1.0);
                        Refinement {
                            label: rule.label,
                            secondary_confidence: secondary,
                            blended_confidence: blend(primary.confidence, secondary),
                            group: group.name,
                            method: rule.method,
                        }
                    })
            })
    }

    pub fn groups(&self) -> &[ConfusionGroup] {
        self.groups
    }
}

impl Default for ConfusionGroupDisambiguator {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic mean of the two stage confidences
fn blend(primary: f64, secondary: f64) -> f64 {
    ((primary + secondary) / 2.0).clamp(0.0, 1.0)
}
