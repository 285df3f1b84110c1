//! Fundamental types for the handsign system.

use chrono::Utc;
use nalgebra::Point3;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Number of landmarks in a hand skeleton frame
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Identifier for one continuously tracked hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }
}

fn default_confidence() -> f64 {
    1.0
}

/// Detector confidences outside [0, 1] are pinned to the nearest bound
fn clamped_confidence<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.clamp(0.0, 1.0))
}

/// One 3D hand landmark with detection confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default = "default_confidence", deserialize_with = "clamped_confidence")]
    pub confidence: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn to_point3(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::origin()
    }
}

/// 21-joint hand skeleton definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HandJoint {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandJoint {
    pub const COUNT: usize = HAND_LANDMARK_COUNT;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Knuckle row used for palm curvature, thumb side to pinky side
    pub const KNUCKLE_ROW: [HandJoint; 5] = [
        HandJoint::ThumbMcp,
        HandJoint::IndexMcp,
        HandJoint::MiddleMcp,
        HandJoint::RingMcp,
        HandJoint::PinkyMcp,
    ];
}

/// The five digits, thumb first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn position(self) -> usize {
        self as usize
    }

    pub fn tip(self) -> HandJoint {
        match self {
            Finger::Thumb => HandJoint::ThumbTip,
            Finger::Index => HandJoint::IndexTip,
            Finger::Middle => HandJoint::MiddleTip,
            Finger::Ring => HandJoint::RingTip,
            Finger::Pinky => HandJoint::PinkyTip,
        }
    }

    /// Joint the tip is compared against for extension
    pub fn base_joint(self) -> HandJoint {
        match self {
            Finger::Thumb => HandJoint::ThumbIp,
            Finger::Index => HandJoint::IndexPip,
            Finger::Middle => HandJoint::MiddlePip,
            Finger::Ring => HandJoint::RingPip,
            Finger::Pinky => HandJoint::PinkyPip,
        }
    }

    /// First joint of the finger, used as the origin for tip angles
    pub fn knuckle(self) -> HandJoint {
        match self {
            Finger::Thumb => HandJoint::ThumbCmc,
            Finger::Index => HandJoint::IndexMcp,
            Finger::Middle => HandJoint::MiddleMcp,
            Finger::Ring => HandJoint::RingMcp,
            Finger::Pinky => HandJoint::PinkyMcp,
        }
    }
}

/// A complete frame of exactly 21 landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    landmarks: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build a frame from an arbitrary landmark sequence.
    ///
    /// Fails with [`Error::InvalidLandmarkCount`] unless exactly 21 points
    /// are supplied.
    pub fn from_slice(points: &[Landmark]) -> Result<Self> {
        let landmarks: [Landmark; HAND_LANDMARK_COUNT] =
            points.try_into().map_err(|_| Error::InvalidLandmarkCount {
                expected: HAND_LANDMARK_COUNT,
                actual: points.len(),
            })?;
        Ok(Self { landmarks })
    }

    pub fn joint(&self, joint: HandJoint) -> &Landmark {
        &self.landmarks[joint.index()]
    }

    pub fn wrist(&self) -> &Landmark {
        self.joint(HandJoint::Wrist)
    }

    pub fn landmarks(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    /// Index of the first landmark holding a NaN or infinite coordinate
    pub fn first_non_finite(&self) -> Option<usize> {
        self.landmarks.iter().position(|lm| !lm.is_finite())
    }
}

/// Gesture label: ASL letters plus the terminal labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureLabel {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    /// No rule matched
    Unknown,
    /// Frame did not contain a usable hand
    NoHand,
    /// Internal numeric fault
    Error,
}

impl GestureLabel {
    const LETTERS: [GestureLabel; 26] = [
        GestureLabel::A,
        GestureLabel::B,
        GestureLabel::C,
        GestureLabel::D,
        GestureLabel::E,
        GestureLabel::F,
        GestureLabel::G,
        GestureLabel::H,
        GestureLabel::I,
        GestureLabel::J,
        GestureLabel::K,
        GestureLabel::L,
        GestureLabel::M,
        GestureLabel::N,
        GestureLabel::O,
        GestureLabel::P,
        GestureLabel::Q,
        GestureLabel::R,
        GestureLabel::S,
        GestureLabel::T,
        GestureLabel::U,
        GestureLabel::V,
        GestureLabel::W,
        GestureLabel::X,
        GestureLabel::Y,
        GestureLabel::Z,
    ];

    pub fn letters() -> &'static [GestureLabel] {
        &Self::LETTERS
    }

    pub fn from_letter(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            Some(Self::LETTERS[(c as u8 - b'A') as usize])
        } else {
            None
        }
    }

    pub fn is_letter(&self) -> bool {
        !matches!(
            self,
            GestureLabel::Unknown | GestureLabel::NoHand | GestureLabel::Error
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::A => "A",
            GestureLabel::B => "B",
            GestureLabel::C => "C",
            GestureLabel::D => "D",
            GestureLabel::E => "E",
            GestureLabel::F => "F",
            GestureLabel::G => "G",
            GestureLabel::H => "H",
            GestureLabel::I => "I",
            GestureLabel::J => "J",
            GestureLabel::K => "K",
            GestureLabel::L => "L",
            GestureLabel::M => "M",
            GestureLabel::N => "N",
            GestureLabel::O => "O",
            GestureLabel::P => "P",
            GestureLabel::Q => "Q",
            GestureLabel::R => "R",
            GestureLabel::S => "S",
            GestureLabel::T => "T",
            GestureLabel::U => "U",
            GestureLabel::V => "V",
            GestureLabel::W => "W",
            GestureLabel::X => "X",
            GestureLabel::Y => "Y",
            GestureLabel::Z => "Z",
            GestureLabel::Unknown => "Unknown",
            GestureLabel::NoHand => "NoHand",
            GestureLabel::Error => "Error",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Unknown" => Ok(GestureLabel::Unknown),
            "NoHand" => Ok(GestureLabel::NoHand),
            "Error" => Ok(GestureLabel::Error),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_uppercase() => Self::from_letter(c)
                        .ok_or_else(|| Error::UnknownLabel(s.to_string())),
                    _ => Err(Error::UnknownLabel(s.to_string())),
                }
            }
        }
    }
}
