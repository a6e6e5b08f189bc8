//! Integer regions in image-pixel coordinates.
//!
//! [`Rect`] describes whole pixels of the source image. The color picker
//! reports its selection as a [`Rect`], and buffers expose their full extent
//! through [`crate::Rgba16Buffer::bounds`].
//!
//! # Coordinate System
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Image   │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! Left/top edges are inclusive, right/bottom edges exclusive.
//!
//! ```rust
//! use pixview_core::Rect;
//!
//! // Dragging from (12, 9) back to (4, 3) still yields a normalized region.
//! let picked = Rect::spanning((12, 9), (4, 3));
//! assert_eq!(picked, Rect::new(4, 3, 9, 7));
//! assert!(picked.contains(12, 9));
//! ```

/// A pixel region defined by origin (x, y) and size (width, height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new region.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region starting at (0, 0).
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Single pixel at (x, y).
    #[inline]
    pub const fn pixel(x: u32, y: u32) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Smallest region covering both pixels `a` and `b`, whatever their order.
    ///
    /// Both corner pixels are included, so `spanning(p, p)` is a 1x1 region.
    #[inline]
    pub fn spanning(a: (u32, u32), b: (u32, u32)) -> Self {
        let (left, right) = (a.0.min(b.0), a.0.max(b.0));
        let (top, bottom) = (a.1.min(b.1), a.1.max(b.1));
        Self::new(left, top, right - left + 1, bottom - top + 1)
    }

    /// X coordinate of the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` if the pixel (px, py) lies inside.
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// `true` if `other` lies entirely inside this region.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping part of two regions, `None` when they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (x < right && y < bottom).then(|| Rect::new(x, y, right - x, bottom - y))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}
