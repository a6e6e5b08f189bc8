//! Message types for UI <-> loader communication.
//!
//! The UI thread sends [`LoaderMsg`] commands, the loader answers with
//! [`LoaderEvent`]s. Results carry the generation they were requested under so
//! the UI can drop loads that a newer request superseded.

use std::path::PathBuf;

use pixview_core::Rgba16Buffer;

/// Generation counter for invalidating stale results.
pub type Generation = u64;

/// Messages from UI thread to loader thread.
#[derive(Debug, Clone)]
pub enum LoaderMsg {
    /// Decode an image file.
    Load(PathBuf),

    /// Sync generation counter.
    SyncGeneration(Generation),

    /// Stop the loader.
    Close,
}

/// Events from loader thread to UI thread.
#[derive(Debug)]
pub enum LoaderEvent {
    /// Image decoded and normalized.
    Loaded {
        /// Request generation
        generation: Generation,
        /// Source file
        path: PathBuf,
        /// Decoded pixels
        image: Rgba16Buffer,
    },

    /// Decode failed; the displayed image stays.
    Failed {
        /// Request generation
        generation: Generation,
        /// Source file
        path: PathBuf,
        /// Decoder message
        error: String,
    },
}

impl LoaderEvent {
    /// Generation the result belongs to.
    pub fn generation(&self) -> Generation {
        match self {
            Self::Loaded { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}
