//! Bit-depth and channel normalization.
//!
//! [`normalize_to_rgba16`] turns any [`SourceBuffer`] into the [`Rgba16Buffer`]
//! the viewport displays. It is pure: same input, same output, no state.
//!
//! # Sample conversion
//!
//! | Source | Rule |
//! |--------|------|
//! | `u8`   | `v * 257` (0 → 0, 255 → 65535) |
//! | `u16`  | unchanged |
//! | `f16`/`f32` | clamp to [0, 1], then `round(v * 65535)` |
//!
//! # Channel conversion
//!
//! | Channels | Result |
//! |----------|--------|
//! | 1 | gray replicated to RGB, opaque alpha |
//! | 2 | gray replicated to RGB, second channel as alpha |
//! | 3 | RGB, opaque alpha |
//! | 4+ | first four channels |

use rayon::prelude::*;
use tracing::trace;

use crate::{PixelData, Rgba16Buffer, SourceBuffer};

const OPAQUE: u16 = u16::MAX;

/// Widens an 8-bit sample to 16 bits.
#[inline]
pub fn u8_to_u16(v: u8) -> u16 {
    v as u16 * 257
}

/// Quantizes a float sample in [0, 1] to 16 bits. NaN maps to 0.
#[inline]
pub fn float_to_u16(v: f32) -> u16 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}

/// Expands one pixel of `channels` 16-bit samples into RGBA.
#[inline]
fn expand_pixel(px: &[u16]) -> [u16; 4] {
    match px.len() {
        1 => [px[0], px[0], px[0], OPAQUE],
        2 => [px[0], px[0], px[0], px[1]],
        3 => [px[0], px[1], px[2], OPAQUE],
        _ => [px[0], px[1], px[2], px[3]],
    }
}

fn to_rgba16<T, F>(samples: &[T], channels: usize, convert: F) -> Vec<u16>
where
    T: Copy + Sync,
    F: Fn(T) -> u16 + Sync,
{
    let pixels = samples.len() / channels;
    let mut out = vec![0u16; pixels * Rgba16Buffer::CHANNELS];
    out.par_chunks_exact_mut(Rgba16Buffer::CHANNELS)
        .zip(samples.par_chunks_exact(channels))
        .for_each(|(dst, src)| {
            let mut wide = [0u16; 4];
            let n = src.len().min(4);
            for (w, &s) in wide.iter_mut().zip(&src[..n]) {
                *w = convert(s);
            }
            dst.copy_from_slice(&expand_pixel(&wide[..n]));
        });
    out
}

/// Converts a decoded buffer to 4-channel 16-bit RGBA.
///
/// ```rust
/// use pixview_core::{normalize_to_rgba16, PixelData, SourceBuffer};
///
/// let gray = SourceBuffer::new(2, 1, 1, PixelData::U8(vec![0, 255])).unwrap();
/// let rgba = normalize_to_rgba16(&gray);
/// assert_eq!(rgba.pixel(1, 0), Some([65535, 65535, 65535, 65535]));
/// ```
pub fn normalize_to_rgba16(source: &SourceBuffer) -> Rgba16Buffer {
    let channels = source.channels() as usize;
    trace!(
        width = source.width(),
        height = source.height(),
        channels,
        format = %source.format(),
        "normalizing to rgba16"
    );

    let data = match source.data() {
        PixelData::U8(v) => to_rgba16(v, channels, u8_to_u16),
        PixelData::U16(v) => to_rgba16(v, channels, |s| s),
        PixelData::F16(v) => to_rgba16(v, channels, |s| float_to_u16(s.to_f32())),
        PixelData::F32(v) => to_rgba16(v, channels, float_to_u16),
    };

    // SourceBuffer guarantees width * height * channels samples.
    Rgba16Buffer::new(source.width(), source.height(), data)
        .unwrap_or_else(|_| Rgba16Buffer::filled(0, 0, [0; 4]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn test_u8_widening() {
        assert_eq!(u8_to_u16(0), 0);
        assert_eq!(u8_to_u16(128), 32896);
        assert_eq!(u8_to_u16(255), 65535);
    }

    #[test]
    fn test_float_quantization() {
        assert_eq!(float_to_u16(-0.5), 0);
        assert_eq!(float_to_u16(0.5), 32768);
        assert_eq!(float_to_u16(1.0), 65535);
        assert_eq!(float_to_u16(4.0), 65535);
        assert_eq!(float_to_u16(f32::NAN), 0);
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let src = SourceBuffer::new(1, 1, 3, PixelData::U16(vec![1, 2, 3])).unwrap();
        assert_eq!(normalize_to_rgba16(&src).pixel(0, 0), Some([1, 2, 3, 65535]));
    }

    #[test]
    fn test_gray_alpha() {
        let src = SourceBuffer::new(1, 1, 2, PixelData::U8(vec![255, 0])).unwrap();
        assert_eq!(
            normalize_to_rgba16(&src).pixel(0, 0),
            Some([65535, 65535, 65535, 0])
        );
    }

    #[test]
    fn test_extra_channels_truncated() {
        let src = SourceBuffer::new(1, 1, 5, PixelData::F32(vec![0.0, 1.0, 0.5, 1.0, 0.25]))
            .unwrap();
        assert_eq!(
            normalize_to_rgba16(&src).pixel(0, 0),
            Some([0, 65535, 32768, 65535])
        );
    }

    #[test]
    fn test_half_float() {
        let samples = vec![f16::from_f32(1.0); 4];
        let src = SourceBuffer::new(1, 1, 4, PixelData::F16(samples)).unwrap();
        assert_eq!(normalize_to_rgba16(&src).pixel(0, 0), Some([65535; 4]));
    }

    #[test]
    fn test_dimensions_preserved() {
        let src = SourceBuffer::new(3, 2, 1, PixelData::U8(vec![0; 6])).unwrap();
        let out = normalize_to_rgba16(&src);
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(out.data().len(), 24);
    }
}
