//! Error type shared by every part of the core.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid speaker name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid vector: {0}")]
    InvalidVector(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("threshold {0} is outside [-1, 1]")]
    InvalidThreshold(f32),

    #[error("degenerate vector: zero norm")]
    DegenerateVector,

    #[error("storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record {}: {reason}", .path.display())]
    CorruptRecord { path: PathBuf, reason: String },

    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    #[error("embedding extraction failed: {0}")]
    Extraction(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the caller supplied bad input and retrying the
    /// same request cannot succeed.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. }
                | Self::InvalidVector(_)
                | Self::DimensionMismatch { .. }
                | Self::DegenerateVector
                | Self::InvalidThreshold(_)
                | Self::InvalidAudio(_)
        )
    }

    /// Returns `true` when durable storage failed; the request may succeed
    /// if retried.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
