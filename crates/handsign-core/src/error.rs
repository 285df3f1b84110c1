//! Error types for the handsign system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid landmark frame: expected {expected} landmarks, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("Numeric fault during {stage}: {detail}")]
    NumericFault { stage: &'static str, detail: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown gesture label: {0}")]
    UnknownLabel(String),

    #[error("Recognition method not available: {0}")]
    MethodUnavailable(String),

    #[error("Session limit reached: at most {limit} concurrent sessions")]
    SessionLimit { limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// True for the "hand not visible" family of errors, which callers
    /// report as `NoHand` rather than as a fault.
    pub fn is_missing_hand(&self) -> bool {
        matches!(self, Error::InvalidLandmarkCount { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
