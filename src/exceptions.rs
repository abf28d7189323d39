//! Error types for dmxpatch

use std::fmt;

/// Main error type for dmxpatch operations
#[derive(Debug)]
pub enum PatchError {
    /// A fixture footprint no universe can hold (zero or above 512 channels).
    /// This is the one input the allocator refuses to repair.
    InvalidFootprint(u16),

    /// Persisted state could not be read or written
    StateError(String),

    /// IO error
    IoError(std::io::Error),

    /// JSON parsing error
    JsonError(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::InvalidFootprint(footprint) => {
                write!(f, "Invalid footprint: {footprint} channels (must be 1-512)")
            }
            PatchError::StateError(msg) => write!(f, "State error: {msg}"),
            PatchError::IoError(err) => write!(f, "IO error: {err}"),
            PatchError::JsonError(err) => write!(f, "JSON error: {err}"),
            PatchError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PatchError {}

impl From<std::io::Error> for PatchError {
    fn from(err: std::io::Error) -> Self {
        PatchError::IoError(err)
    }
}

impl From<serde_json::Error> for PatchError {
    fn from(err: serde_json::Error) -> Self {
        PatchError::JsonError(err)
    }
}

impl From<anyhow::Error> for PatchError {
    fn from(err: anyhow::Error) -> Self {
        PatchError::Generic(err.to_string())
    }
}

/// Result type for dmxpatch operations
pub type Result<T> = std::result::Result<T, PatchError>;
