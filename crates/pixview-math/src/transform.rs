//! Affine view transforms.
//!
//! The viewport maps world coordinates (image pixels, origin at the image's
//! top-left) to device coordinates (widget pixels) with a [`Transform2D`].
//! In practice that is a uniform scale by the zoom factor followed by a
//! translation; nothing here relies on that, so rotated or sheared transforms
//! map correctly too.
//!
//! # Usage
//!
//! ```rust
//! use pixview_math::{DVec2, Transform2D};
//!
//! let view = Transform2D::from_scale_translation(4.0, DVec2::new(10.0, 0.0));
//! let device = view.map_point(DVec2::new(2.0, 3.0));
//! assert_eq!(device, DVec2::new(18.0, 12.0));
//!
//! let back = view.inverse().unwrap().map_point(device);
//! assert!(back.abs_diff_eq(DVec2::new(2.0, 3.0), 1e-12));
//! ```

use glam::{DAffine2, DVec2};

use crate::{Polygon, RectF};

/// A 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    affine: DAffine2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        affine: DAffine2::IDENTITY,
    };

    /// Wraps a raw affine.
    #[inline]
    pub const fn from_affine(affine: DAffine2) -> Self {
        Self { affine }
    }

    /// Uniform `scale` applied first, then `translation`.
    #[inline]
    pub fn from_scale_translation(scale: f64, translation: DVec2) -> Self {
        Self::from_affine(DAffine2::from_scale_angle_translation(
            DVec2::splat(scale),
            0.0,
            translation,
        ))
    }

    /// Rotation by `radians` about the origin.
    #[inline]
    pub fn from_angle(radians: f64) -> Self {
        Self::from_affine(DAffine2::from_angle(radians))
    }

    /// Underlying affine.
    #[inline]
    pub fn affine(&self) -> DAffine2 {
        self.affine
    }

    /// Horizontal scale (length of the mapped X axis).
    #[inline]
    pub fn scale(&self) -> f64 {
        self.affine.matrix2.x_axis.length()
    }

    /// Translation component.
    #[inline]
    pub fn translation(&self) -> DVec2 {
        self.affine.translation
    }

    /// `self` applied after `first`.
    #[inline]
    pub fn after(&self, first: &Transform2D) -> Transform2D {
        Self::from_affine(self.affine * first.affine)
    }

    /// Maps a point.
    #[inline]
    pub fn map_point(&self, p: DVec2) -> DVec2 {
        self.affine.transform_point2(p)
    }

    /// Maps a vector (ignores translation).
    #[inline]
    pub fn map_vector(&self, v: DVec2) -> DVec2 {
        self.affine.transform_vector2(v)
    }

    /// Maps every vertex of a polygon.
    pub fn map_polygon(&self, polygon: &Polygon) -> Polygon {
        Polygon::new(polygon.points().iter().map(|&p| self.map_point(p)).collect())
    }

    /// Bounding rectangle of the four mapped corners of `rect`.
    pub fn map_rect(&self, rect: &RectF) -> RectF {
        RectF::bounding(rect.corners().into_iter().map(|p| self.map_point(p))).unwrap_or_default()
    }

    /// Inverse transform, `None` if singular.
    pub fn inverse(&self) -> Option<Transform2D> {
        let det = self.affine.matrix2.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = self.affine.inverse();
        inv.is_finite().then_some(Self::from_affine(inv))
    }
}

/// Geometry that can be carried through a [`Transform2D`].
pub trait Mappable {
    /// Returns `self` mapped by `transform`.
    fn map_with(&self, transform: &Transform2D) -> Self;
}

impl Mappable for DVec2 {
    fn map_with(&self, transform: &Transform2D) -> Self {
        transform.map_point(*self)
    }
}

impl Mappable for RectF {
    fn map_with(&self, transform: &Transform2D) -> Self {
        transform.map_rect(self)
    }
}

impl Mappable for Polygon {
    fn map_with(&self, transform: &Transform2D) -> Self {
        transform.map_polygon(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_scale_translation() {
        let t = Transform2D::from_scale_translation(2.0, DVec2::new(-4.0, 6.0));
        assert_relative_eq!(t.scale(), 2.0);
        assert_eq!(t.translation(), DVec2::new(-4.0, 6.0));
        assert_eq!(t.map_point(DVec2::new(1.0, 1.0)), DVec2::new(-2.0, 8.0));
        assert_eq!(t.map_vector(DVec2::new(1.0, 1.0)), DVec2::new(2.0, 2.0));
    }

    #[test]
    fn test_map_rect_axis_aligned() {
        let t = Transform2D::from_scale_translation(0.5, DVec2::new(1.0, 1.0));
        let r = t.map_rect(&RectF::from_size(10.0, 4.0));
        assert_eq!(r, RectF::new(1.0, 1.0, 5.0, 2.0));
    }

    #[test]
    fn test_map_rect_rotated_is_bounding_box() {
        let t = Transform2D::from_angle(FRAC_PI_2);
        let r = t.map_rect(&RectF::from_size(4.0, 2.0));
        assert!(r.abs_diff_eq(&RectF::new(-2.0, 0.0, 2.0, 4.0), 1e-9));
    }

    #[test]
    fn test_inverse() {
        let t = Transform2D::from_scale_translation(3.0, DVec2::new(5.0, -7.0));
        let inv = t.inverse().unwrap();
        let p = DVec2::new(11.0, 13.0);
        let back = inv.map_point(t.map_point(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let t = Transform2D::from_scale_translation(0.0, DVec2::ZERO);
        assert!(t.inverse().is_none());
    }

    #[test]
    fn test_composition_order() {
        let scale = Transform2D::from_scale_translation(2.0, DVec2::ZERO);
        let shift = Transform2D::from_scale_translation(1.0, DVec2::new(1.0, 0.0));
        // scale first, then shift
        assert_eq!(shift.after(&scale).map_point(DVec2::ONE), DVec2::new(3.0, 2.0));
    }

    #[test]
    fn test_mappable_polygon() {
        let t = Transform2D::from_scale_translation(2.0, DVec2::ZERO);
        let poly = Polygon::from_rect(&RectF::from_size(1.0, 1.0)).map_with(&t);
        assert_eq!(poly.bounding_rect(), RectF::from_size(2.0, 2.0));
    }
}
