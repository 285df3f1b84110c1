//! Classifier and session configuration.

use handsign_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::features::{
    FeatureMargins, DEFAULT_FINGER_MARGIN, DEFAULT_PALM_MARGIN, DEFAULT_THUMB_UP_MARGIN,
};
use crate::normalizer::DEFAULT_SCALE_EPSILON;
use crate::primary::DEFAULT_UNKNOWN_CONFIDENCE;
use crate::recognizer::RecognitionMethod;
use crate::stability::DEFAULT_WINDOW_CAPACITY;

/// Tunables for the classification pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Sliding-window capacity per session
    pub window_capacity: usize,

    /// Margin for the finger extended/curled tests
    pub finger_margin: f64,

    /// Margin for the thumb-up test
    pub thumb_up_margin: f64,

    /// Depth margin for the palm-facing test
    pub palm_margin: f64,

    /// Bounding-box extent below which normalization keeps scale 1.0
    pub scale_epsilon: f64,

    /// Confidence reported for `Unknown`
    pub unknown_confidence: f64,

    /// Recognition methods to build
    pub methods: Vec<RecognitionMethod>,

    /// Method used when a request does not name one
    pub default_method: RecognitionMethod,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            finger_margin: DEFAULT_FINGER_MARGIN,
            thumb_up_margin: DEFAULT_THUMB_UP_MARGIN,
            palm_margin: DEFAULT_PALM_MARGIN,
            scale_epsilon: DEFAULT_SCALE_EPSILON,
            unknown_confidence: DEFAULT_UNKNOWN_CONFIDENCE,
            methods: vec![
                RecognitionMethod::TwoLayerRuleBased,
                RecognitionMethod::SimpleRules,
            ],
            default_method: RecognitionMethod::TwoLayerRuleBased,
        }
    }
}

impl ClassifierConfig {
    pub fn margins(&self) -> FeatureMargins {
        FeatureMargins {
            finger: self.finger_margin,
            thumb_up: self.thumb_up_margin,
            palm: self.palm_margin,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_capacity == 0 {
            return Err(Error::Config("window_capacity must be at least 1".to_string()));
        }

        for (name, value) in [
            ("finger_margin", self.finger_margin),
            ("thumb_up_margin", self.thumb_up_margin),
            ("palm_margin", self.palm_margin),
            ("scale_epsilon", self.scale_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.unknown_confidence) {
            return Err(Error::Config(format!(
                "unknown_confidence must lie in [0, 1], got {}",
                self.unknown_confidence
            )));
        }

        if self.methods.is_empty() {
            return Err(Error::Config("at least one recognition method is required".to_string()));
        }

        if !self.methods.contains(&self.default_method) {
            return Err(Error::Config(format!(
                "default method {} is not enabled",
                self.default_method
            )));
        }

        Ok(())
    }
}

/// Limits on concurrently tracked sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of live sessions
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_sessions: 64 }
    }
}
