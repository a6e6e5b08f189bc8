//! The displayed image and its placement in world space.
//!
//! [`ImageSurface`] owns the unrotated source buffer and the buffer actually
//! displayed (the source rotated by the current angle). Buffers are
//! [`Rgba16Buffer`]s, so replacing one is a reference swap.
//!
//! With no image set the surface shows a 512x512 checkerboard placeholder,
//! if the caller asked for it to be visible.

use pixview_core::Rgba16Buffer;
use pixview_math::RectF;

use crate::config::SurfaceAnchor;

/// Size of the "no image" placeholder.
pub const PLACEHOLDER_SIZE: u32 = 512;

const PLACEHOLDER_CELL: u32 = 32;
const PLACEHOLDER_DARK: [u16; 4] = [0x2020, 0x2020, 0x2020, u16::MAX];
const PLACEHOLDER_LIGHT: [u16; 4] = [0x3030, 0x3030, 0x3030, u16::MAX];

/// Current raster and where it lives in world space.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    anchor: SurfaceAnchor,
    source: Option<Rgba16Buffer>,
    displayed: Option<Rgba16Buffer>,
    placeholder: Rgba16Buffer,
    rotation: i32,
    visible: bool,
}

impl ImageSurface {
    /// Empty surface; `placeholder_visible` decides whether the checkerboard shows.
    pub fn new(anchor: SurfaceAnchor, placeholder_visible: bool) -> Self {
        Self {
            anchor,
            source: None,
            displayed: None,
            placeholder: Rgba16Buffer::checkerboard(
                PLACEHOLDER_SIZE,
                PLACEHOLDER_SIZE,
                PLACEHOLDER_CELL,
                PLACEHOLDER_DARK,
                PLACEHOLDER_LIGHT,
            ),
            rotation: 0,
            visible: placeholder_visible,
        }
    }

    /// Replaces the image and marks the surface visible.
    ///
    /// The buffer is displayed rotated by the current angle.
    pub fn set_pixels(&mut self, buffer: Rgba16Buffer) {
        self.displayed = Some(buffer.rotated(self.rotation / 90));
        self.source = Some(buffer);
        self.visible = true;
    }

    /// Drops the image and falls back to the placeholder.
    pub fn clear(&mut self, visible: bool) {
        self.source = None;
        self.displayed = None;
        self.visible = visible;
    }

    /// Sets the absolute rotation in degrees (counter-clockwise, multiple of 90,
    /// already normalized to `[0, 360)`).
    pub(crate) fn set_rotation(&mut self, degrees: i32) {
        self.rotation = degrees;
        if let Some(source) = &self.source {
            self.displayed = Some(source.rotated(degrees / 90));
        }
    }

    /// Absolute rotation in degrees.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// `true` if an image (not the placeholder) is set.
    pub fn has_pixels(&self) -> bool {
        self.displayed.is_some()
    }

    /// `true` if the surface is drawn at all.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Buffer to draw: the rotated image or the placeholder.
    pub fn current(&self) -> &Rgba16Buffer {
        self.displayed.as_ref().unwrap_or(&self.placeholder)
    }

    /// The image as displayed, `None` without one.
    pub fn image(&self) -> Option<&Rgba16Buffer> {
        self.displayed.as_ref()
    }

    /// The image as it was set, before rotation.
    pub fn source(&self) -> Option<&Rgba16Buffer> {
        self.source.as_ref()
    }

    /// World rectangle covered by [`ImageSurface::current`].
    pub fn bounding_rect(&self) -> RectF {
        let (w, h) = self.current().dimensions();
        let (w, h) = (w as f64, h as f64);
        match self.anchor {
            SurfaceAnchor::TopLeft => RectF::from_size(w, h),
            SurfaceAnchor::Centered => RectF::new(-w / 2.0, -h / 2.0, w, h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_buffer() {
        let mut s = ImageSurface::new(SurfaceAnchor::TopLeft, false);
        assert!(!s.is_visible());
        assert_eq!(s.bounding_rect(), RectF::from_size(512.0, 512.0));

        s.set_pixels(Rgba16Buffer::filled(100, 50, [0; 4]));
        assert!(s.is_visible());
        assert!(s.has_pixels());
        assert_eq!(s.bounding_rect(), RectF::from_size(100.0, 50.0));
    }

    #[test]
    fn test_centered_anchor() {
        let mut s = ImageSurface::new(SurfaceAnchor::Centered, true);
        s.set_pixels(Rgba16Buffer::filled(100, 50, [0; 4]));
        assert_eq!(s.bounding_rect(), RectF::new(-50.0, -25.0, 100.0, 50.0));
    }

    #[test]
    fn test_rotation_swaps_bounds() {
        let mut s = ImageSurface::new(SurfaceAnchor::TopLeft, true);
        s.set_rotation(90);
        s.set_pixels(Rgba16Buffer::filled(100, 50, [0; 4]));
        assert_eq!(s.bounding_rect(), RectF::from_size(50.0, 100.0));
        assert_eq!(s.source().map(|b| b.dimensions()), Some((100, 50)));

        s.set_rotation(180);
        assert_eq!(s.bounding_rect(), RectF::from_size(100.0, 50.0));
    }

    #[test]
    fn test_clear() {
        let mut s = ImageSurface::new(SurfaceAnchor::TopLeft, false);
        let buf = Rgba16Buffer::filled(4, 4, [1; 4]);
        s.set_pixels(buf.clone());
        assert!(s.current().shares_data(&buf));

        s.clear(true);
        assert!(!s.has_pixels());
        assert!(s.is_visible());
        assert_eq!(s.current().dimensions(), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
    }
}
