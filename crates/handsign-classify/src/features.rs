//! Geometric feature extraction from a normalized hand frame.
//!
//! ## Feature layout
//!
//! | Index   | Feature                                              |
//! |---------|------------------------------------------------------|
//! | 0..5    | fingertip → wrist distance (3D), thumb..pinky        |
//! | 5..10   | fingertip angle from the finger's knuckle (planar)   |
//! | 10..14  | planar distance between neighbouring fingertips      |
//! | 14      | palm curvature over the knuckle row                  |

use handsign_core::{
    euclidean_distance, planar_angle, planar_distance, Finger, HandFrame, HandJoint,
};
use serde::{Deserialize, Serialize};

/// Length of every feature vector
pub const FEATURE_COUNT: usize = 15;

const TIP_DISTANCE_OFFSET: usize = 0;
const TIP_ANGLE_OFFSET: usize = 5;
const INTER_TIP_OFFSET: usize = 10;
const CURVATURE_INDEX: usize = 14;

/// Default margin for the extended/curled tests
pub const DEFAULT_FINGER_MARGIN: f64 = 0.015;
pub const DEFAULT_THUMB_UP_MARGIN: f64 = 0.01;
pub const DEFAULT_PALM_MARGIN: f64 = 0.01;

/// Fixed-length geometric summary of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn tip_distance(&self, finger: Finger) -> f64 {
        self.0[TIP_DISTANCE_OFFSET + finger.position()]
    }

    pub fn tip_angle(&self, finger: Finger) -> f64 {
        self.0[TIP_ANGLE_OFFSET + finger.position()]
    }

    /// Distance between fingertip `i` and fingertip `i + 1` (0 = thumb/index)
    pub fn inter_tip_distance(&self, i: usize) -> Option<f64> {
        (i < 4).then(|| self.0[INTER_TIP_OFFSET + i])
    }

    pub fn curvature(&self) -> f64 {
        self.0[CURVATURE_INDEX]
    }

    /// Position of the first NaN or infinite entry
    pub fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|v| !v.is_finite())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// Extension state of a single digit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitState {
    pub extended: bool,
    pub curled: bool,
}

/// Per-finger extension summary plus whole-hand scalars
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FingerState {
    /// Indexed by [`Finger::position`]
    pub digits: [DigitState; 5],
    pub thumb_up: bool,
    pub palm_facing: bool,
    /// Mean planar fingertip → wrist distance
    pub hand_openness: f64,
    /// Direction of the middle knuckle from the wrist (radians)
    pub wrist_angle: f64,
}

impl FingerState {
    pub fn extended(&self, finger: Finger) -> bool {
        self.digits[finger.position()].extended
    }

    pub fn curled(&self, finger: Finger) -> bool {
        self.digits[finger.position()].curled
    }

    /// Extended non-thumb fingers
    pub fn fingers_up(&self) -> usize {
        Finger::ALL[1..]
            .iter()
            .filter(|f| self.extended(**f))
            .count()
    }

    pub fn all_fingers_down(&self) -> bool {
        self.fingers_up() == 0
    }
}

/// Everything the classifiers look at for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandFeatures {
    pub vector: FeatureVector,
    pub fingers: FingerState,
}

/// Margins used by the finger-state tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureMargins {
    pub finger: f64,
    pub thumb_up: f64,
    pub palm: f64,
}

impl Default for FeatureMargins {
    fn default() -> Self {
        Self {
            finger: DEFAULT_FINGER_MARGIN,
            thumb_up: DEFAULT_THUMB_UP_MARGIN,
            palm: DEFAULT_PALM_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    margins: FeatureMargins,
}

impl FeatureExtractor {
    pub fn new(margins: FeatureMargins) -> Self {
        Self { margins }
    }

    pub fn extract(&self, frame: &HandFrame) -> HandFeatures {
        HandFeatures {
            vector: self.feature_vector(frame),
            fingers: self.finger_state(frame),
        }
    }

    pub fn feature_vector(&self, frame: &HandFrame) -> FeatureVector {
        let wrist = frame.wrist();
        let mut values = [0.0; FEATURE_COUNT];

        for finger in Finger::ALL {
            let tip = frame.joint(finger.tip());
            let knuckle = frame.joint(finger.knuckle());
            values[TIP_DISTANCE_OFFSET + finger.position()] = euclidean_distance(tip, wrist);
            values[TIP_ANGLE_OFFSET + finger.position()] = planar_angle(knuckle, tip);
        }

        for (i, pair) in Finger::ALL.windows(2).enumerate() {
            values[INTER_TIP_OFFSET + i] =
                planar_distance(frame.joint(pair[0].tip()), frame.joint(pair[1].tip()));
        }

        values[CURVATURE_INDEX] = palm_curvature(frame);

        FeatureVector(values)
    }

    pub fn finger_state(&self, frame: &HandFrame) -> FingerState {
        let eps = self.margins.finger;
        let mut digits = [DigitState::default(); 5];

        for finger in Finger::ALL {
            let tip = frame.joint(finger.tip());
            let base = frame.joint(finger.base_joint());
            // The thumb abducts sideways, so it is judged on x; image y grows downward.
            digits[finger.position()] = match finger {
                Finger::Thumb => DigitState {
                    extended: tip.x > base.x + eps,
                    curled: tip.x < base.x - eps,
                },
                _ => DigitState {
                    extended: tip.y < base.y - eps,
                    curled: tip.y > base.y + eps,
                },
            };
        }

        let thumb_tip = frame.joint(HandJoint::ThumbTip);
        let thumb_ip = frame.joint(HandJoint::ThumbIp);
        let wrist = frame.wrist();
        let middle_mcp = frame.joint(HandJoint::MiddleMcp);

        FingerState {
            digits,
            thumb_up: thumb_tip.y < thumb_ip.y - self.margins.thumb_up,
            palm_facing: middle_mcp.z > wrist.z + self.margins.palm,
            hand_openness: hand_openness(frame),
            wrist_angle: planar_angle(wrist, middle_mcp),
        }
    }

    pub fn margins(&self) -> &FeatureMargins {
        &self.margins
    }
}

/// Mean planar distance of the five fingertips from the wrist
pub fn hand_openness(frame: &HandFrame) -> f64 {
    let wrist = frame.wrist();
    let total: f64 = Finger::ALL
        .iter()
        .map(|f| planar_distance(frame.joint(f.tip()), wrist))
        .sum();
    total / Finger::ALL.len() as f64
}

/// Sum of absolute heading changes along the knuckle row
fn palm_curvature(frame: &HandFrame) -> f64 {
    HandJoint::KNUCKLE_ROW
        .windows(3)
        .map(|w| {
            let p1 = frame.joint(w[0]);
            let p2 = frame.joint(w[1]);
            let p3 = frame.joint(w[2]);
            (planar_angle(p2, p3) - planar_angle(p1, p2)).abs()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsign_core::{Landmark, HAND_LANDMARK_COUNT};

    /// Open hand, fingers pointing up (negative y), thumb out to +x.
    fn open_hand() -> HandFrame {
        let mut pts = [Landmark::origin(); HAND_LANDMARK_COUNT];
        pts[1] = Landmark::new(0.10, -0.10, 0.0);
        pts[2] = Landmark::new(0.20, -0.20, 0.0);
        pts[3] = Landmark::new(0.30, -0.30, 0.0);
        pts[4] = Landmark::new(0.40, -0.35, 0.0);
        for (f, x) in [(5usize, 0.15), (9, 0.05), (13, -0.05), (17, -0.15)] {
            pts[f] = Landmark::new(x, -0.40, 0.02);
            pts[f + 1] = Landmark::new(x, -0.60, 0.02);
            pts[f + 2] = Landmark::new(x, -0.80, 0.02);
            pts[f + 3] = Landmark::new(x, -1.00, 0.02);
        }
        HandFrame::new(pts)
    }

    #[test]
    fn test_feature_vector_has_fifteen_entries() {
        let extractor = FeatureExtractor::default();
        let vector = extractor.feature_vector(&open_hand());
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector.as_slice().len(), 15);
        assert_eq!(vector.to_vec().len(), 15);

        let zeros = HandFrame::new([Landmark::origin(); HAND_LANDMARK_COUNT]);
        let degenerate = extractor.feature_vector(&zeros);
        assert_eq!(degenerate.as_slice().len(), 15);
        assert!(degenerate.first_non_finite().is_none());
    }

    #[test]
    fn test_feature_values_for_open_hand() {
        let frame = open_hand();
        let v = FeatureExtractor::default().feature_vector(&frame);

        let expected_middle = (0.05f64.powi(2) + 1.0 + 0.02f64.powi(2)).sqrt();
        assert!((v.tip_distance(Finger::Middle) - expected_middle).abs() < 1e-12);

        // Straight-up fingers point along −y.
        let up = -std::f64::consts::FRAC_PI_2;
        assert!((v.tip_angle(Finger::Index) - up).abs() < 1e-12);
        assert!((v.tip_angle(Finger::Pinky) - up).abs() < 1e-12);

        assert!((v.inter_tip_distance(1).unwrap() - 0.10).abs() < 1e-12);
        assert!(v.inter_tip_distance(4).is_none());

        // Thumb MCP → index MCP → middle MCP bends, the rest is a straight line.
        assert!(v.curvature() > 0.0);
        assert_eq!(v.get(14), Some(v.curvature()));
    }

    #[test]
    fn test_finger_state_open_hand() {
        let state = FeatureExtractor::default().finger_state(&open_hand());

        for finger in Finger::ALL {
            assert!(state.extended(finger), "{:?} should be extended", finger);
            assert!(!state.curled(finger));
        }
        assert_eq!(state.fingers_up(), 4);
        assert!(state.palm_facing);
        assert!(state.thumb_up);
        assert!(state.hand_openness > 0.7);
    }

    #[test]
    fn test_finger_state_margin() {
        let mut pts = *open_hand().landmarks();
        // Index tip within the margin of its PIP: neither extended nor curled.
        pts[8] = Landmark::new(0.15, -0.61, 0.02);
        let state = FeatureExtractor::default().finger_state(&HandFrame::new(pts));
        assert!(!state.extended(Finger::Index));
        assert!(!state.curled(Finger::Index));

        // Tip folded below the PIP.
        pts[8] = Landmark::new(0.15, -0.45, 0.02);
        let state = FeatureExtractor::default().finger_state(&HandFrame::new(pts));
        assert!(state.curled(Finger::Index));
        assert_eq!(state.fingers_up(), 3);
    }

    #[test]
    fn test_thumb_uses_horizontal_axis() {
        let mut pts = *open_hand().landmarks();
        // Tucked across the palm: tip left of the IP joint.
        pts[4] = Landmark::new(0.20, -0.50, 0.0);
        let state = FeatureExtractor::default().finger_state(&HandFrame::new(pts));
        assert!(!state.extended(Finger::Thumb));
        assert!(state.curled(Finger::Thumb));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = FeatureExtractor::default();
        let frame = open_hand();
        assert_eq!(extractor.extract(&frame), extractor.extract(&frame));
    }
}
