//! # pixview-io
//!
//! Turns image files into buffers the viewport can display.
//!
//! Decoding is delegated to the [`image`] crate. The decoded samples keep
//! their native precision in a [`SourceBuffer`] until
//! [`pixview_core::normalize_to_rgba16`] widens them to the 16-bit RGBA layout.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pixview_io::decode;
//!
//! let buf = decode("plate.png")?;
//! println!("{}x{}", buf.width(), buf.height());
//! ```
//!
//! # Failure
//!
//! A file that cannot be opened yields [`IoError::Io`]; anything the decoder
//! rejects yields [`IoError::Read`] carrying the decoder's message. Callers
//! that display images keep their previous image on either failure.

#![warn(missing_docs)]

mod decode;
mod error;

pub use decode::{decode, decode_source, is_supported, supported_extensions};
pub use error::{IoError, IoResult};

pub use pixview_core::{Rgba16Buffer, SourceBuffer};
