//! Sample formats accepted by the normalizer.
//!
//! The viewport only displays 16-bit unsigned RGBA. Decoders hand over buffers
//! in whatever precision the file used; [`SampleFormat`] names that precision
//! so [`crate::normalize_to_rgba16`] can pick the conversion path.
//!
//! ```rust
//! use pixview_core::SampleFormat;
//!
//! assert_eq!(SampleFormat::U8.bits(), 8);
//! assert!(SampleFormat::F16.is_float());
//! assert_eq!(SampleFormat::U16.max_value(), Some(65535));
//! ```

/// Per-channel sample precision of a decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    /// 8-bit unsigned integer [0, 255].
    U8,
    /// 16-bit unsigned integer [0, 65535]. The display format.
    #[default]
    U16,
    /// 16-bit half-precision float, nominal range [0, 1].
    F16,
    /// 32-bit float, nominal range [0, 1].
    F32,
}

impl SampleFormat {
    /// Number of bits per sample.
    #[inline]
    pub const fn bits(&self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 | Self::F16 => 16,
            Self::F32 => 32,
        }
    }

    /// Whether samples are floating point.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F16 | Self::F32)
    }

    /// Largest integer value, `None` for float formats.
    #[inline]
    pub const fn max_value(&self) -> Option<u32> {
        match self {
            Self::U8 => Some(u8::MAX as u32),
            Self::U16 => Some(u16::MAX as u32),
            Self::F16 | Self::F32 => None,
        }
    }

    /// Short lowercase name, as used in log messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::F16 => "f16",
            Self::F32 => "f32",
        }
    }
}

impl std::fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
