//! # pixview-math
//!
//! Geometry used by the viewport to move between coordinate spaces.
//!
//! - [`RectF`] - Axis-aligned float rectangle (world rects, screenspace bounds)
//! - [`Polygon`] - Ordered list of points
//! - [`Transform2D`] - Affine map, in practice zoom + pan of the view
//! - [`Mappable`] - Anything a [`Transform2D`] can carry across spaces
//! - [`round_to`] - Fixed decimal rounding, used to keep zoom factors stable
//!
//! # Design
//!
//! Points are [`glam::DVec2`]; the transform wraps [`glam::DAffine2`]. Rectangles
//! are mapped by taking the bounding box of their four transformed corners, so
//! the result stays correct if a rotation is ever composed into the view.
//!
//! ```rust
//! use pixview_math::{DVec2, Mappable, RectF, Transform2D};
//!
//! // zoom 2x, then pan so world (10, 10) lands on the device origin
//! let view = Transform2D::from_scale_translation(2.0, DVec2::new(-20.0, -20.0));
//! let image = RectF::new(0.0, 0.0, 100.0, 50.0);
//! assert_eq!(image.map_with(&view), RectF::new(-20.0, -20.0, 200.0, 100.0));
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - Vector and affine types
//!
//! # Used By
//!
//! - `pixview-view` - Navigation, screenspace overlays

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod polygon;
mod precision;
mod rect;
mod transform;

pub use polygon::*;
pub use precision::*;
pub use rect::*;
pub use transform::*;

pub use glam::{DAffine2, DVec2};
