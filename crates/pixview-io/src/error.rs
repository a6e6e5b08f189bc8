//! Error types for decode operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Decode error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The decoder rejected the file (corrupt data, truncated stream, ...).
    #[error("failed to read {}: {message}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Neither the extension nor the content identify a known format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoded samples did not form a valid buffer.
    #[error(transparent)]
    Core(#[from] pixview_core::Error),
}

impl IoError {
    /// Creates an [`IoError::Read`] error.
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the decoder itself failed.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}

/// Result type for decode operations.
pub type IoResult<T> = Result<T, IoError>;
