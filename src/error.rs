//! Error types for level loading and progress storage.
//!
//! Gameplay itself never fails: bad input is ignored. Only level loading
//! (before play starts) and storage I/O produce errors.

use thiserror::Error;

/// A level that cannot be played.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid level json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level needs at least two fixed anchors, found {found}")]
    MissingAnchors { found: usize },
    #[error("anchor {index} is not fixed")]
    UnfixedAnchor { index: usize },
    #[error("gear {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("anchor {index} lies outside the board")]
    AnchorOutOfBounds { index: usize },
}

/// Reading or writing persisted data failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}
