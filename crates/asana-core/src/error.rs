//! Error types for the pose correction system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Landmark count mismatch: expected {expected}, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Reference pose '{pose}' rejected: {reason}")]
    ReferencePose { pose: String, reason: String },

    #[error("Pose classification failed: {0}")]
    Classification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
