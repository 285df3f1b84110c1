//! Service configuration.

use std::path::Path;

use handsign_classify::{ClassifierConfig, SessionConfig};
use handsign_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `HANDSIGN_CLASSIFIER__WINDOW_CAPACITY`
pub const ENV_PREFIX: &str = "HANDSIGN";

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Classification pipeline tunables
    pub classifier: ClassifierConfig,

    /// Session limits
    pub sessions: SessionConfig,

    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            sessions: SessionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from file, with environment overrides on top
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load from environment variables
    pub fn from_env() -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;

        if self.sessions.max_sessions == 0 {
            return Err(Error::Config("sessions.max_sessions must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
