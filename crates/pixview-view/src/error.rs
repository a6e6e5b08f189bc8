//! Error types for the viewport crate.

use pixview_io::IoError;
use thiserror::Error;

/// Viewport-level error.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Rejected call from the core (bad argument, overlay already attached, ...).
    #[error(transparent)]
    Core(#[from] pixview_core::Error),

    /// File could not be read or decoded.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Configuration could not be parsed or holds invalid values.
    #[error("config error: {0}")]
    Config(String),
}

impl ViewError {
    /// Creates a [`ViewError::Config`] error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<std::io::Error> for ViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(IoError::Io(e))
    }
}

/// Result type for viewport operations.
pub type ViewResult<T> = Result<T, ViewError>;
