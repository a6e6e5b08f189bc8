//! Error types for pixview-core operations.
//!
//! The [`Error`] enum covers caller mistakes that are reported synchronously:
//! - Buffer construction with inconsistent dimensions or sample counts
//! - Unsupported sample layouts
//! - Invalid arguments to viewport operations (e.g. a rotation that is not a
//!   multiple of 90 degrees)
//! - Registering an overlay that already belongs to another viewport
//!
//! Transient UI input (zoom out of range, zero-sized resize, a drag without a
//! press) is never an error; the viewport ignores it silently.
//!
//! # Usage
//!
//! ```rust
//! use pixview_core::{Error, Result};
//!
//! fn check_angle(degrees: i32) -> Result<()> {
//!     if degrees % 90 != 0 {
//!         return Err(Error::invalid_argument(format!(
//!             "expected a multiple of 90 degrees, got {degrees}"
//!         )));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_angle(180).is_ok());
//! assert!(check_angle(45).unwrap_err().is_invalid_argument());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by pixview core types and viewport operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A call received an argument outside its contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Width, height or channel count cannot describe a buffer.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Sample count does not match `width * height * channels`.
    #[error("buffer size mismatch: expected {expected} samples, got {got}")]
    BufferSizeMismatch {
        /// Samples implied by the dimensions
        expected: usize,
        /// Samples actually provided
        got: usize,
    },

    /// Sample format or channel layout has no conversion path.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// Format name or description
        format: String,
    },

    /// An overlay was registered while already attached to another viewport.
    #[error("{what} is already attached to a viewport")]
    AlreadyAttached {
        /// Name of the rejected object
        what: String,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::BufferSizeMismatch`] error.
    #[inline]
    pub fn buffer_size_mismatch(expected: usize, got: usize) -> Self {
        Self::BufferSizeMismatch { expected, got }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`Error::AlreadyAttached`] error.
    #[inline]
    pub fn already_attached(what: impl Into<String>) -> Self {
        Self::AlreadyAttached { what: what.into() }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is an [`Error::InvalidArgument`].
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if the error describes a malformed buffer.
    #[inline]
    pub fn is_buffer_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. } | Self::BufferSizeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument() {
        let err = Error::invalid_argument("angle=45");
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("angle=45"));
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let err = Error::buffer_size_mismatch(400, 399);
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("399"));
        assert!(err.is_buffer_error());
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_already_attached() {
        let err = Error::already_attached("color-picker");
        assert_eq!(
            err.to_string(),
            "color-picker is already attached to a viewport"
        );
    }
}
