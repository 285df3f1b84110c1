//! Translation- and scale-invariant landmark preprocessing.
//!
//! The wrist becomes the origin and the frame is scaled so the larger side
//! of its x/y bounding box has unit length:
//!
//! p' = (p − wrist) / max(bbox_w, bbox_h)
//!
//! A degenerate box (every point on top of each other) keeps a scale of 1.0
//! instead of dividing by zero. A box whose extent overflows is a numeric
//! fault, since scaling by `1 / inf` would collapse the hand onto the wrist.
//! Confidences are clamped to [0, 1] on the way through.

use handsign_core::{BoundingBox2D, Error, HandFrame, Landmark, Result, HAND_LANDMARK_COUNT};
use serde::{Deserialize, Serialize};

/// Extents below this are treated as a degenerate bounding box
pub const DEFAULT_SCALE_EPSILON: f64 = 1e-6;

/// Normalized frame plus the scale that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFrame {
    pub frame: HandFrame,
    /// Factor applied after translation (1.0 on a degenerate box)
    pub scale_factor: f64,
}

#[derive(Debug, Clone)]
pub struct LandmarkNormalizer {
    scale_epsilon: f64,
}

impl LandmarkNormalizer {
    pub fn new(scale_epsilon: f64) -> Self {
        Self { scale_epsilon }
    }

    pub fn normalize(&self, landmarks: &[Landmark]) -> Result<NormalizedFrame> {
        let raw = HandFrame::from_slice(landmarks)?;
        let wrist = *raw.wrist();

        let scale_factor = match BoundingBox2D::from_landmarks(raw.iter()) {
            Some(bbox) if !bbox.max_extent().is_finite() => {
                return Err(Error::NumericFault {
                    stage: "normalization",
                    detail: format!("bounding-box extent {} is not finite", bbox.max_extent()),
                });
            }
            Some(bbox) if bbox.max_extent() > 0.0 && bbox.max_extent() >= self.scale_epsilon => {
                1.0 / bbox.max_extent()
            }
            _ => 1.0,
        };
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(Error::NumericFault {
                stage: "normalization",
                detail: format!("scale factor {} is not finite and positive", scale_factor),
            });
        }

        let mut out = [Landmark::origin(); HAND_LANDMARK_COUNT];
        for (dst, src) in out.iter_mut().zip(raw.iter()) {
            *dst = Landmark {
                x: (src.x - wrist.x) * scale_factor,
                y: (src.y - wrist.y) * scale_factor,
                z: (src.z - wrist.z) * scale_factor,
                confidence: src.confidence.clamp(0.0, 1.0),
            };
        }

        Ok(NormalizedFrame {
            frame: HandFrame::new(out),
            scale_factor,
        })
    }

    pub fn scale_epsilon(&self) -> f64 {
        self.scale_epsilon
    }
}

impl Default for LandmarkNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_EPSILON)
    }
}
