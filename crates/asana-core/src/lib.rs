//! # Asana-Core
//!
//! Core types and utilities for scoring a detected body pose against a
//! reference pose: the 33-landmark anatomical contract, the scored joints,
//! joint-angle geometry and the immutable reference pose table.

pub mod error;
pub mod geometry;
pub mod reference;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use reference::*;
pub use types::*;
