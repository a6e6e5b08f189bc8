//! Backend-neutral drawing commands emitted by overlays.
//!
//! Overlays never touch a painter directly. They push [`PaintCommand`]s in
//! screenspace (device pixels) and the host replays them with whatever
//! renderer it uses; the egui host does this in `app.rs`.

use egui::{Align2, Color32, Stroke};
use pixview_math::{DVec2, RectF};

/// One primitive in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Rectangle outline.
    Rect {
        /// Outline geometry
        rect: RectF,
        /// Line width and color
        stroke: Stroke,
    },
    /// Filled disc.
    Point {
        /// Center
        center: DVec2,
        /// Radius
        radius: f32,
        /// Fill color
        color: Color32,
    },
    /// Monospace text, one or more lines.
    Text {
        /// Anchor position
        pos: DVec2,
        /// Which corner/edge of the text box sits on `pos`
        anchor: Align2,
        /// Content
        text: String,
        /// Color
        color: Color32,
        /// Font size in points
        size: f32,
    },
}

impl PaintCommand {
    /// Screenspace box touched by the command. Text has no known extent and
    /// reports its anchor point.
    pub fn bounds(&self) -> RectF {
        match self {
            Self::Rect { rect, stroke } => rect.expanded(stroke.width as f64 / 2.0),
            Self::Point { center, radius, .. } => {
                RectF::from_center_size(*center, DVec2::splat(*radius as f64 * 2.0))
            }
            Self::Text { pos, .. } => RectF::new(pos.x, pos.y, 0.0, 0.0),
        }
    }
}
