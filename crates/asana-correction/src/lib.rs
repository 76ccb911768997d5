//! # Asana-Correction
//!
//! Scores a detected pose against its reference pose and turns the result
//! into corrective guidance.
//!
//! ## Pipeline
//!
//! Each frame runs through four stateless stages:
//!
//! 1. **Keypoints** - landmark records → flat `[x, y, z, visibility]*` vector
//! 2. **Angles** - landmark vector → five joint angles in degrees
//! 3. **Metrics** - detected vs. reference → correction metric, per-joint
//!    deviations and depth metric
//! 4. **Feedback** - metrics → ordered, human-readable lines
//!
//! ```text
//! records ──► normalize ──► LandmarkVector ──┐
//!                                            ├──► CorrectionResult ──► Feedback
//!            reference LandmarkVector ───────┘
//! ```
//!
//! Nothing is retained between frames: identical inputs always produce
//! identical feedback.

pub mod angles;
pub mod feedback;
pub mod keypoints;
pub mod metrics;

pub use angles::*;
pub use feedback::*;
pub use keypoints::*;
pub use metrics::*;
