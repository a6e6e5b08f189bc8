//! World <-> screenspace conversion for overlays.
//!
//! Overlays draw in *screenspace*: device pixels, so a 2 px line stays 2 px at
//! any zoom. The viewport captures its world-to-device transform once per
//! navigation change and pushes it to every overlay as a [`Screenspace`].
//!
//! ```text
//!   world (image pixels)  ── to_screenspace ──►  screenspace (device pixels)
//!                         ◄─ from_screenspace ──
//! ```

use pixview_math::{Mappable, Transform2D};

/// Snapshot of the view transform plus its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screenspace {
    transform: Transform2D,
    inverse: Transform2D,
}

impl Default for Screenspace {
    fn default() -> Self {
        Self::new(Transform2D::IDENTITY)
    }
}

impl Screenspace {
    /// Captures `transform` (world to device).
    ///
    /// Navigation keeps the zoom strictly positive, so the transform is always
    /// invertible there; a singular one maps back through the identity.
    pub fn new(transform: Transform2D) -> Self {
        Self {
            transform,
            inverse: transform.inverse().unwrap_or(Transform2D::IDENTITY),
        }
    }

    /// World to device transform.
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// Maps world geometry into screenspace.
    pub fn to_screenspace<T: Mappable>(&self, value: &T) -> T {
        value.map_with(&self.transform)
    }

    /// Maps screenspace geometry back into world space.
    pub fn from_screenspace<T: Mappable>(&self, value: &T) -> T {
        value.map_with(&self.inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixview_math::{DVec2, Polygon, RectF};

    #[test]
    fn test_identity_roundtrip_exact() {
        let ss = Screenspace::default();
        let r = RectF::new(3.0, 4.0, 10.0, 20.0);
        assert_eq!(ss.to_screenspace(&ss.from_screenspace(&r)), r);
    }

    #[test]
    fn test_scale_translate_roundtrip() {
        let ss = Screenspace::new(Transform2D::from_scale_translation(
            2.75,
            DVec2::new(-133.5, 41.25),
        ));
        let r = RectF::new(-7.0, 12.5, 300.0, 0.25);
        let back = ss.to_screenspace(&ss.from_screenspace(&r));
        assert!(back.abs_diff_eq(&r, 1e-9), "{back} != {r}");

        let p = DVec2::new(17.0, -3.0);
        assert!(ss.from_screenspace(&ss.to_screenspace(&p)).abs_diff_eq(p, 1e-12));
    }

    #[test]
    fn test_polygon() {
        let ss = Screenspace::new(Transform2D::from_scale_translation(2.0, DVec2::ONE));
        let poly = Polygon::from_rect(&RectF::from_size(1.0, 1.0));
        assert_eq!(
            ss.to_screenspace(&poly).bounding_rect(),
            RectF::new(1.0, 1.0, 2.0, 2.0)
        );
    }
}
