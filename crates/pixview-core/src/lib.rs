//! # pixview-core
//!
//! Core types shared by every pixview crate.
//!
//! - [`Rgba16Buffer`] - The only pixel layout the viewport displays: 4 channels,
//!   16-bit unsigned samples, row-major
//! - [`SourceBuffer`] - A decoded buffer in any supported [`SampleFormat`] and channel count
//! - [`normalize_to_rgba16`] - Pure conversion from [`SourceBuffer`] to [`Rgba16Buffer`]
//! - [`Rect`] - Integer region in image-pixel coordinates
//! - [`Error`] / [`Result`] - Shared error type
//!
//! ## Crate Structure
//!
//! ```text
//! pixview-core (this crate)
//!    ^
//!    |
//!    +-- pixview-math (geometry, transforms)
//!    +-- pixview-io (decoding)
//!    +-- pixview-view (viewport engine, egui host)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod encoding;
pub mod error;
pub mod format;
pub mod rect;

pub use buffer::{PixelData, Rgba16Buffer, SourceBuffer};
pub use encoding::normalize_to_rgba16;
pub use error::{Error, Result};
pub use format::SampleFormat;
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// ```
/// use pixview_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{PixelData, Rgba16Buffer, SourceBuffer};
    pub use crate::encoding::normalize_to_rgba16;
    pub use crate::error::{Error, Result};
    pub use crate::format::SampleFormat;
    pub use crate::rect::Rect;
}
