//! Pixel buffers.
//!
//! - [`SourceBuffer`] - What a decoder produces: any [`SampleFormat`], 1 or more
//!   interleaved channels
//! - [`Rgba16Buffer`] - What the viewport displays: 4 interleaved 16-bit channels
//!
//! # Memory Layout
//!
//! Both buffers are **row-major**, top-to-bottom, channels interleaved:
//!
//! ```text
//! [R G B A R G B A ...]  ← Row 0
//! [R G B A R G B A ...]  ← Row 1
//! ```
//!
//! [`Rgba16Buffer`] keeps its samples behind an [`Arc`], so handing a buffer to
//! the viewport or to a loader thread is a reference swap, never a copy.

use std::sync::Arc;

use half::f16;

use crate::{Error, Rect, Result, SampleFormat};

/// Raw samples of a decoded buffer, tagged with their precision.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    /// 8-bit unsigned samples.
    U8(Vec<u8>),
    /// 16-bit unsigned samples.
    U16(Vec<u16>),
    /// Half-float samples.
    F16(Vec<f16>),
    /// 32-bit float samples.
    F32(Vec<f32>),
}

impl PixelData {
    /// Number of samples (not pixels).
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::F16(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    /// `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Precision of the samples.
    pub fn format(&self) -> SampleFormat {
        match self {
            Self::U8(_) => SampleFormat::U8,
            Self::U16(_) => SampleFormat::U16,
            Self::F16(_) => SampleFormat::F16,
            Self::F32(_) => SampleFormat::F32,
        }
    }
}

/// A decoded buffer before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: PixelData,
}

impl SourceBuffer {
    /// Wraps decoded samples.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if `channels` is zero
    /// - [`Error::BufferSizeMismatch`] if `data` does not hold exactly
    ///   `width * height * channels` samples
    pub fn new(width: u32, height: u32, channels: u8, data: PixelData) -> Result<Self> {
        if channels == 0 {
            return Err(Error::invalid_dimensions(width, height, "zero channels"));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::buffer_size_mismatch(expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Sample precision.
    #[inline]
    pub fn format(&self) -> SampleFormat {
        self.data.format()
    }

    /// Raw samples.
    #[inline]
    pub fn data(&self) -> &PixelData {
        &self.data
    }
}

/// A 4-channel, 16-bit unsigned, row-major buffer.
///
/// This is the only layout the viewport accepts. Cloning shares the samples.
///
/// ```rust
/// use pixview_core::Rgba16Buffer;
///
/// let buf = Rgba16Buffer::filled(4, 2, [65535, 0, 0, 65535]);
/// assert_eq!(buf.dimensions(), (4, 2));
/// assert_eq!(buf.pixel(3, 1), Some([65535, 0, 0, 65535]));
/// assert_eq!(buf.pixel(4, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rgba16Buffer {
    width: u32,
    height: u32,
    data: Arc<Vec<u16>>,
}

impl Rgba16Buffer {
    /// Channels per pixel.
    pub const CHANNELS: usize = 4;

    /// Wraps existing RGBA16 samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] unless `data.len() == width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u16>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::CHANNELS;
        if data.len() != expected {
            return Err(Error::buffer_size_mismatch(expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            data: Arc::new(data),
        })
    }

    /// Buffer where every pixel is `pixel`.
    pub fn filled(width: u32, height: u32, pixel: [u16; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * Self::CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            width,
            height,
            data: Arc::new(data),
        }
    }

    /// Checkerboard of `cell`-sized squares alternating `a` and `b`.
    ///
    /// Used as the "no image" placeholder.
    pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u16; 4], b: [u16; 4]) -> Self {
        let cell = cell.max(1);
        let mut data = Vec::with_capacity(width as usize * height as usize * Self::CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                data.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self {
            width,
            height,
            data: Arc::new(data),
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Full extent as a pixel region.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// `true` if the buffer has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// All samples, row-major.
    #[inline]
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Pixel at (x, y), `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u16; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// `true` if both buffers share the same sample storage.
    #[inline]
    pub fn shares_data(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Copy rotated by `quarter_turns` × 90 degrees counter-clockwise.
    ///
    /// Negative values rotate clockwise. A multiple of 4 returns a clone that
    /// shares storage with `self`.
    pub fn rotated(&self, quarter_turns: i32) -> Self {
        let turns = quarter_turns.rem_euclid(4);
        if turns == 0 {
            return self.clone();
        }

        let (w, h) = (self.width as usize, self.height as usize);
        let (out_w, out_h) = if turns == 2 { (w, h) } else { (h, w) };
        let mut out = Vec::with_capacity(self.data.len());

        for oy in 0..out_h {
            for ox in 0..out_w {
                let (sx, sy) = match turns {
                    1 => (w - 1 - oy, ox),
                    2 => (w - 1 - ox, h - 1 - oy),
                    _ => (oy, h - 1 - ox),
                };
                let i = (sy * w + sx) * Self::CHANNELS;
                out.extend_from_slice(&self.data[i..i + Self::CHANNELS]);
            }
        }

        Self {
            width: out_w as u32,
            height: out_h as u32,
            data: Arc::new(out),
        }
    }

    /// 8-bit RGBA copy (high byte of each sample), for GPU upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().map(|&s| (s >> 8) as u8).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> Rgba16Buffer {
        // red channel carries the linear pixel index
        let data = (0..width * height)
            .flat_map(|i| [i as u16, 0, 0, u16::MAX])
            .collect();
        Rgba16Buffer::new(width, height, data).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Rgba16Buffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(err.is_buffer_error());
    }

    #[test]
    fn test_source_buffer_validation() {
        assert!(SourceBuffer::new(2, 2, 0, PixelData::U8(vec![])).is_err());
        assert!(SourceBuffer::new(2, 2, 3, PixelData::U8(vec![0; 11])).is_err());
        let src = SourceBuffer::new(2, 2, 3, PixelData::F32(vec![0.0; 12])).unwrap();
        assert_eq!(src.format(), SampleFormat::F32);
        assert_eq!(src.channels(), 3);
    }

    #[test]
    fn test_rotate_ccw() {
        // 3x2:  0 1 2      ccw ->  2 5
        //       3 4 5              1 4
        //                          0 3
        let rotated = numbered(3, 2).rotated(1);
        assert_eq!(rotated.dimensions(), (2, 3));
        let reds: Vec<u16> = rotated.data().chunks(4).map(|p| p[0]).collect();
        assert_eq!(reds, vec![2, 5, 1, 4, 0, 3]);
    }

    #[test]
    fn test_rotate_cw_and_half_turn() {
        let buf = numbered(3, 2);
        let cw = buf.rotated(-1);
        let reds: Vec<u16> = cw.data().chunks(4).map(|p| p[0]).collect();
        assert_eq!(reds, vec![3, 0, 4, 1, 5, 2]);

        let half = buf.rotated(2);
        let reds: Vec<u16> = half.data().chunks(4).map(|p| p[0]).collect();
        assert_eq!(reds, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_full_turn_shares_storage() {
        let buf = numbered(3, 2);
        assert!(buf.rotated(4).shares_data(&buf));
        assert_eq!(buf.rotated(1).rotated(-1), buf);
    }

    #[test]
    fn test_checkerboard() {
        let a = [1, 1, 1, 1];
        let b = [2, 2, 2, 2];
        let buf = Rgba16Buffer::checkerboard(4, 4, 2, a, b);
        assert_eq!(buf.pixel(0, 0), Some(a));
        assert_eq!(buf.pixel(2, 0), Some(b));
        assert_eq!(buf.pixel(2, 2), Some(a));
    }

    #[test]
    fn test_to_rgba8() {
        let buf = Rgba16Buffer::filled(1, 1, [65535, 257, 0, 32768]);
        assert_eq!(buf.to_rgba8(), vec![255, 1, 0, 128]);
    }
}
