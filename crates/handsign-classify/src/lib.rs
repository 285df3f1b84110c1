//! # Handsign Classify
//!
//! Per-frame hand-gesture classification over 21-point hand landmarks.
//!
//! ## Pipeline
//!
//! 1. **Normalize** - translate to the wrist, scale by the bounding box
//! 2. **Extract** - 15-entry feature vector plus discrete finger states
//! 3. **Primary** - ordered rule table, first match wins
//! 4. **Disambiguate** - confusion-group rules refine similar letters
//! 5. **Stability** - sliding window of recent labels per session
//!
//! ## Stability
//!
//! ```text
//! stability = 0.6 * consistency + 0.4 * mean_confidence
//! ```
//!
//! where both terms run over the last five window entries. The first two
//! samples of a session report `confidence * 0.5` instead.
//!
//! Classification itself is synchronous; [`SessionManager`] adds the async
//! multi-session layer on top.

pub mod config;
pub mod confusion;
pub mod features;
pub mod manager;
pub mod normalizer;
pub mod pipeline;
pub mod primary;
pub mod recognizer;
pub mod session;
pub mod stability;

#[cfg(test)]
mod fixtures;

pub use config::*;
pub use confusion::*;
pub use features::*;
pub use manager::*;
pub use normalizer::*;
pub use pipeline::*;
pub use primary::*;
pub use recognizer::*;
pub use session::*;
pub use stability::*;
