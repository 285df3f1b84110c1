//! # Handsign-Core
//!
//! Core types and utilities for the handsign per-frame hand-gesture
//! classifier: the 21-point hand skeleton, gesture labels, session
//! identifiers, planar geometry helpers and the shared error type.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
