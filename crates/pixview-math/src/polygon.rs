//! Point lists.

use glam::DVec2;

use crate::RectF;

/// An ordered list of points. Mapping a rectangle through a general affine
/// transform yields one of these before its bounding box is taken.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    points: Vec<DVec2>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    /// The four corners of `rect`, clockwise from top-left.
    pub fn from_rect(rect: &RectF) -> Self {
        Self::new(rect.corners().to_vec())
    }

    /// Vertices in order.
    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box; empty polygons give a zero rect.
    pub fn bounding_rect(&self) -> RectF {
        RectF::bounding(self.points.iter().copied()).unwrap_or_default()
    }
}

impl From<RectF> for Polygon {
    fn from(rect: RectF) -> Self {
        Self::from_rect(&rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_roundtrip() {
        let r = RectF::new(1.0, 2.0, 3.0, 4.0);
        let poly = Polygon::from(r);
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.bounding_rect(), r);
    }

    #[test]
    fn test_empty_bounding() {
        assert_eq!(Polygon::default().bounding_rect(), RectF::default());
    }
}
