//! Per-frame classification pipeline.
//!
//! validate → normalize → extract → primary → disambiguate → stability
//!
//! `classify` is total: a frame without 21 landmarks becomes `NoHand`, and
//! any non-finite value that shows up along the way becomes `Error`. In both
//! cases the session's stability window is left untouched.

use std::time::Instant;

use handsign_core::{Error, GestureLabel, Landmark, Result, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::confusion::{ConfusionGroupDisambiguator, DisambiguationMethod};
use crate::features::{FeatureExtractor, FeatureMargins, FeatureVector};
use crate::normalizer::LandmarkNormalizer;
use crate::primary::{PrimaryClassifier, SIMPLE_RULES, TWO_LAYER_RULES};
use crate::recognizer::RecognitionMethod;
use crate::session::RecognitionSession;

/// Finger margin used by the single-layer rule set
pub const SIMPLE_FINGER_MARGIN: f64 = 0.02;

/// Outcome of classifying one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Final label after both stages
    pub label: GestureLabel,
    /// Final confidence in [0, 1]
    pub confidence: f64,
    /// Temporal stability in [0, 1]
    pub stability: f64,
    /// Label produced by the first stage
    pub primary_label: GestureLabel,
    /// Label produced by the second stage, if one of its rules fired
    pub secondary_label: Option<GestureLabel>,
    /// Confusion group that resolved the label
    pub confusion_group: Option<String>,
    pub disambiguation: Option<DisambiguationMethod>,
    pub feature_vector: Option<FeatureVector>,
    pub method: RecognitionMethod,
    pub processing_time_ms: f64,
    pub timestamp: Timestamp,
    /// Diagnostic for `Error` results
    pub error: Option<String>,
}

impl ClassificationResult {
    fn terminal(label: GestureLabel, method: RecognitionMethod, error: Option<String>) -> Self {
        Self {
            label,
            confidence: 0.0,
            stability: 0.0,
            primary_label: label,
            secondary_label: None,
            confusion_group: None,
            disambiguation: None,
            feature_vector: None,
            method,
            processing_time_ms: 0.0,
            timestamp: Timestamp::now(),
            error,
        }
    }

    /// Frame without a usable hand
    pub fn no_hand(method: RecognitionMethod) -> Self {
        Self::terminal(GestureLabel::NoHand, method, None)
    }

    /// Internal fault with a diagnostic message
    pub fn error(method: RecognitionMethod, message: impl Into<String>) -> Self {
        Self::terminal(GestureLabel::Error, method, Some(message.into()))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.label, GestureLabel::NoHand | GestureLabel::Error)
    }
}

pub struct GestureClassificationPipeline {
    method: RecognitionMethod,
    normalizer: LandmarkNormalizer,
    extractor: FeatureExtractor,
    primary: PrimaryClassifier,
    disambiguator: Option<ConfusionGroupDisambiguator>,
}

impl GestureClassificationPipeline {
    /// Two-layer pipeline
    pub fn new(config: &ClassifierConfig) -> Self {
        Self::for_method(RecognitionMethod::TwoLayerRuleBased, config)
    }

    pub fn for_method(method: RecognitionMethod, config: &ClassifierConfig) -> Self {
        let normalizer = LandmarkNormalizer::new(config.scale_epsilon);

        match method {
            RecognitionMethod::TwoLayerRuleBased => Self {
                method,
                normalizer,
                extractor: FeatureExtractor::new(config.margins()),
                primary: PrimaryClassifier::with_rules(
                    TWO_LAYER_RULES.to_vec(),
                    config.unknown_confidence,
                ),
                disambiguator: Some(ConfusionGroupDisambiguator::new()),
            },
            RecognitionMethod::SimpleRules => Self {
                method,
                normalizer,
                extractor: FeatureExtractor::new(FeatureMargins {
                    finger: SIMPLE_FINGER_MARGIN,
                    ..config.margins()
                }),
                primary: PrimaryClassifier::with_rules(
                    SIMPLE_RULES.to_vec(),
                    config.unknown_confidence,
                ),
                disambiguator: None,
            },
        }
    }

    /// Replace the first-stage rule table
    pub fn with_primary(mut self, primary: PrimaryClassifier) -> Self {
        self.primary = primary;
        self
    }

    pub fn method(&self) -> RecognitionMethod {
        self.method
    }

    /// Classify one frame against `session`'s history. Never fails.
    pub fn classify(
        &self,
        session: &mut RecognitionSession,
        landmarks: &[Landmark],
    ) -> ClassificationResult {
        let started = Instant::now();

        let mut result = match self.evaluate(session, landmarks) {
            Ok(result) => result,
            Err(e) if e.is_missing_hand() => {
                debug!(session = %session.id, "no hand in frame: {}", e);
                session.skip_frame();
                ClassificationResult::no_hand(self.method)
            }
            Err(e) => {
                warn!(session = %session.id, "classification fault: {}", e);
                session.skip_frame();
                ClassificationResult::error(self.method, e.to_string())
            }
        };

        result.processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        result
    }

    fn evaluate(
        &self,
        session: &mut RecognitionSession,
        landmarks: &[Landmark],
    ) -> Result<ClassificationResult> {
        let normalized = self.normalizer.normalize(landmarks)?;
        if let Some(i) = normalized.frame.first_non_finite() {
            return Err(Error::NumericFault {
                stage: "normalization",
                detail: format!("landmark {} is not finite", i),
            });
        }

        let features = self.extractor.extract(&normalized.frame);
        if let Some(i) = features.vector.first_non_finite() {
            return Err(Error::NumericFault {
                stage: "feature extraction",
                detail: format!("feature {} is not finite", i),
            });
        }

        let primary = self.primary.classify(&features);
        let refinement = self
            .disambiguator
            .as_ref()
            .and_then(|d| d.disambiguate(&primary, &features));

        let (label, confidence) = match &refinement {
            Some(r) => (r.label, r.blended_confidence),
            None => (primary.label, primary.confidence),
        };
        let confidence = confidence.clamp(0.0, 1.0);
        let stability = session.record(label, confidence);

        debug!(
            session = %session.id,
            %label,
            confidence,
            stability,
            "classified frame"
        );

        Ok(ClassificationResult {
            label,
            confidence,
            stability,
            primary_label: primary.label,
            secondary_label: refinement.map(|r| r.label),
            confusion_group: refinement.map(|r| r.group.to_string()),
            disambiguation: refinement.map(|r| r.method),
            feature_vector: Some(features.vector),
            method: self.method,
            processing_time_ms: 0.0,
            timestamp: Timestamp::now(),
            error: None,
        })
    }
}

impl Default for GestureClassificationPipeline {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
