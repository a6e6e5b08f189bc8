//! Floating-point rectangles.
//!
//! [`RectF`] is used for every continuous region the viewport tracks: the
//! visible world rect, the image rect in world space, overlay bounds in
//! screenspace.
//!
//! Unlike the integer pixel region in `pixview-core` it has no pixel
//! semantics; both edges are treated as inclusive by [`RectF::contains`].

use glam::DVec2;

/// Axis-aligned rectangle with origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl RectF {
    /// Creates a rectangle from origin and size.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Rectangle spanning two corners in any order.
    #[inline]
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Rectangle of `size` centered on `center`.
    #[inline]
    pub fn from_center_size(center: DVec2, size: DVec2) -> Self {
        let min = center - size * 0.5;
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Bounding rectangle of a set of points, `None` if empty.
    pub fn bounding(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self::from_corners(min, max))
    }

    /// Top-left corner.
    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.right(), self.bottom())
    }

    /// (width, height)
    #[inline]
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Geometric center.
    #[inline]
    pub fn center(&self) -> DVec2 {
        self.min() + self.size() * 0.5
    }

    /// X of the right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y of the bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Corners clockwise from top-left.
    #[inline]
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.x, self.y),
            DVec2::new(self.right(), self.y),
            DVec2::new(self.right(), self.bottom()),
            DVec2::new(self.x, self.bottom()),
        ]
    }

    /// `true` if width or height is not positive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// `true` if `p` lies inside or on the border.
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// `true` if `other` lies inside or on the border.
    #[inline]
    pub fn contains_rect(&self, other: &RectF) -> bool {
        self.contains(other.min()) && self.contains(other.max())
    }

    /// Smallest rectangle covering both.
    pub fn united(&self, other: &RectF) -> RectF {
        Self::from_corners(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Same size, moved by `delta`.
    #[inline]
    pub fn translated(&self, delta: DVec2) -> RectF {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Same size, centered on `center`.
    #[inline]
    pub fn with_center(&self, center: DVec2) -> RectF {
        Self::from_center_size(center, self.size())
    }

    /// Same top-left corner, new size.
    #[inline]
    pub fn with_size(&self, size: DVec2) -> RectF {
        Self::new(self.x, self.y, size.x, size.y)
    }

    /// Grown by `margin` on every side (shrunk if negative).
    #[inline]
    pub fn expanded(&self, margin: f64) -> RectF {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Component-wise comparison within `epsilon`.
    pub fn abs_diff_eq(&self, other: &RectF, epsilon: f64) -> bool {
        self.min().abs_diff_eq(other.min(), epsilon) && self.size().abs_diff_eq(other.size(), epsilon)
    }
}

impl std::fmt::Display for RectF {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RectF({:.3}, {:.3}, {:.3}x{:.3})",
            self.x, self.y, self.width, self.height
        )
    }
}
