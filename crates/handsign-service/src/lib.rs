//! # Handsign Service
//!
//! Streams hand-landmark frames through the classifier using line-delimited
//! JSON over any async byte stream.
//!
//! ## Messages
//!
//! ### Inbound
//! - `gesture_landmarks` - classify one frame for a session
//! - `reset_session` - clear a session's stability window
//! - `end_session` - drop a session
//! - `ping`
//!
//! ### Outbound
//! - `gesture_result`, `session_reset`, `session_ended`, `pong`, `error`

pub mod config;
pub mod service;
pub mod wire;

pub use config::*;
pub use service::*;
pub use wire::*;
