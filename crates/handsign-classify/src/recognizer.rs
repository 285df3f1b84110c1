//! Recognition methods and the registry that builds them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use handsign_core::{Error, Landmark, Result, SessionId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ClassifierConfig;
use crate::pipeline::{ClassificationResult, GestureClassificationPipeline};
use crate::session::RecognitionSession;

/// Selectable recognition strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionMethod {
    /// Primary rules followed by confusion-group disambiguation
    TwoLayerRuleBased,
    /// Single rule layer, no second stage
    SimpleRules,
}

impl RecognitionMethod {
    pub const ALL: [RecognitionMethod; 2] = [
        RecognitionMethod::TwoLayerRuleBased,
        RecognitionMethod::SimpleRules,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecognitionMethod::TwoLayerRuleBased => "two_layer_rule_based",
            RecognitionMethod::SimpleRules => "simple_rules",
        }
    }
}

impl fmt::Display for RecognitionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that turns a landmark frame into a classification
pub trait GestureRecognizer: Send + Sync {
    fn method(&self) -> RecognitionMethod;

    fn recognize(
        &self,
        session: &mut RecognitionSession,
        landmarks: &[Landmark],
    ) -> ClassificationResult;
}

impl GestureRecognizer for GestureClassificationPipeline {
    fn method(&self) -> RecognitionMethod {
        GestureClassificationPipeline::method(self)
    }

    fn recognize(
        &self,
        session: &mut RecognitionSession,
        landmarks: &[Landmark],
    ) -> ClassificationResult {
        self.classify(session, landmarks)
    }
}

/// Enabled recognizers keyed by method
pub struct RecognizerRegistry {
    recognizers: HashMap<RecognitionMethod, Arc<dyn GestureRecognizer>>,
    default_method: RecognitionMethod,
    window_capacity: usize,
}

impl RecognizerRegistry {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;

        let recognizers = config
            .methods
            .iter()
            .map(|&method| {
                let recognizer: Arc<dyn GestureRecognizer> =
                    Arc::new(GestureClassificationPipeline::for_method(method, config));
                (method, recognizer)
            })
            .collect::<HashMap<_, _>>();

        info!(
            methods = ?config.methods,
            default = %config.default_method,
            window = config.window_capacity,
            "Recognizer registry ready"
        );

        Ok(Self {
            recognizers,
            default_method: config.default_method,
            window_capacity: config.window_capacity,
        })
    }

    /// Register or replace the recognizer for its method
    pub fn register(&mut self, recognizer: Arc<dyn GestureRecognizer>) {
        self.recognizers.insert(recognizer.method(), recognizer);
    }

    pub fn get(&self, method: RecognitionMethod) -> Result<Arc<dyn GestureRecognizer>> {
        self.recognizers
            .get(&method)
            .cloned()
            .ok_or_else(|| Error::MethodUnavailable(method.to_string()))
    }

    /// Recognizer for `method`, or the default one
    pub fn resolve(&self, method: Option<RecognitionMethod>) -> Result<Arc<dyn GestureRecognizer>> {
        self.get(method.unwrap_or(self.default_method))
    }

    /// Enabled methods in declaration order
    pub fn available_methods(&self) -> Vec<RecognitionMethod> {
        RecognitionMethod::ALL
            .into_iter()
            .filter(|m| self.recognizers.contains_key(m))
            .collect()
    }

    pub fn default_method(&self) -> RecognitionMethod {
        self.default_method
    }

    pub fn window_capacity(&self) -> usize {
        self.window_capacity
    }

    /// Fresh session sized to this registry's window
    pub fn new_session(&self, id: SessionId) -> RecognitionSession {
        RecognitionSession::new(id, self.window_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use handsign_core::GestureLabel;

    #[test]
    fn test_default_registry_has_both_methods() {
        let registry = RecognizerRegistry::new(&ClassifierConfig::default()).unwrap();
        assert_eq!(registry.available_methods(), RecognitionMethod::ALL.to_vec());
        assert_eq!(registry.default_method(), RecognitionMethod::TwoLayerRuleBased);
        assert_eq!(registry.window_capacity(), 15);
    }

    #[test]
    fn test_disabled_method_is_unavailable() {
        let config = ClassifierConfig {
            methods: vec![RecognitionMethod::TwoLayerRuleBased],
            ..ClassifierConfig::default()
        };
        let registry = RecognizerRegistry::new(&config).unwrap();

        match registry.get(RecognitionMethod::SimpleRules) {
            Err(Error::MethodUnavailable(name)) => assert_eq!(name, "simple_rules"),
            other => panic!("expected MethodUnavailable, got {:?}", other.map(|r| r.method())),
        }
    }

    #[test]
    fn test_default_method_must_be_enabled() {
        let config = ClassifierConfig {
            methods: vec![RecognitionMethod::SimpleRules],
            default_method: RecognitionMethod::TwoLayerRuleBased,
            ..ClassifierConfig::default()
        };
        assert!(matches!(RecognizerRegistry::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let registry = RecognizerRegistry::new(&ClassifierConfig::default()).unwrap();
        let mut session = registry.new_session(SessionId::new());

        let recognizer = registry.resolve(None).unwrap();
        assert_eq!(recognizer.method(), RecognitionMethod::TwoLayerRuleBased);
        let result = recognizer.recognize(&mut session, &fixtures::fist_thumb_side());
        assert_eq!(result.label, GestureLabel::A);
        assert_eq!(result.confidence, 0.92);

        let simple = registry.resolve(Some(RecognitionMethod::SimpleRules)).unwrap();
        let result = simple.recognize(&mut session, &fixtures::fist_thumb_side());
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_method_names() {
        assert_eq!(RecognitionMethod::TwoLayerRuleBased.to_string(), "two_layer_rule_based");
        let parsed: RecognitionMethod = serde_json::from_str("\"simple_rules\"").unwrap();
        assert_eq!(parsed, RecognitionMethod::SimpleRules);
    }
}
