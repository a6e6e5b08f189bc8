//! Pixel-coordinate grid shown while a modifier chord is held.

use egui::{Align, Align2, Color32};
use pixview_math::{DVec2, RectF};

use super::{EventResponse, ImageBounds, Overlay, OverlayBase};
use crate::event::InputEvent;
use crate::paint::PaintCommand;
use crate::shortcut::{ModifierMatching, ShortcutAction, ShortcutTable};

/// Tile count of a fresh grid.
pub const DEFAULT_TILES: u32 = 6;

const POINT_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 150);
const POINT_RADIUS: f32 = 1.5;
const LABEL_SIZE: f32 = 8.0;
// gap between a point and its label
const LABEL_MARGIN: f64 = 5.0;

/// Intersections of a `tiles` x `tiles` grid over `rect`, x-major.
///
/// Coordinates are snapped to whole pixels from the rect's origin:
/// `left + floor(block * i + 0.5)`.
///
/// ```rust
/// use pixview_math::{DVec2, RectF};
/// use pixview_view::grid_points;
///
/// let points = grid_points(&RectF::from_size(100.0, 50.0), 2);
/// assert_eq!(points.len(), 9);
/// assert_eq!(points[4], DVec2::new(50.0, 25.0));
/// ```
pub fn grid_points(rect: &RectF, tiles: u32) -> Vec<DVec2> {
    let tiles = tiles.max(1);
    let axis = |start: f64, length: f64| -> Vec<f64> {
        let block = length / tiles as f64;
        (0..=tiles)
            .map(|i| start + (block * i as f64 + 0.5).floor())
            .collect()
    };
    let xs = axis(rect.x, rect.width);
    let ys = axis(rect.y, rect.height);
    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| DVec2::new(x, y)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct GridPoint {
    world: DVec2,
    screen: DVec2,
}

/// Grid of labelled points over the image.
///
/// Hidden by default. Shows while `show_coordinates_a` or `show_coordinates_b`
/// is pressed and hides when either chord is released. While visible, the
/// wheel changes the tile count instead of zooming.
#[derive(Debug, Clone)]
pub struct CoordinateGridOverlay {
    base: OverlayBase,
    rect: RectF,
    tiles: u32,
    screen_rect: RectF,
    points: Vec<GridPoint>,
}

impl Default for CoordinateGridOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateGridOverlay {
    /// Hidden grid over a 64x64 placeholder area.
    pub fn new() -> Self {
        let mut grid = Self {
            base: OverlayBase::new(false),
            rect: RectF::from_size(64.0, 64.0),
            tiles: DEFAULT_TILES,
            screen_rect: RectF::default(),
            points: Vec::new(),
        };
        grid.rebuild();
        grid
    }

    /// Current tile count.
    pub fn tiles(&self) -> u32 {
        self.tiles
    }

    /// Sets the tile count, at least 1.
    pub fn set_tiles(&mut self, tiles: u32) {
        self.tiles = tiles.max(1);
        self.rebuild();
    }

    /// World rect the grid covers.
    pub fn rect(&self) -> RectF {
        self.rect
    }

    fn rebuild(&mut self) {
        let ss = self.base.screenspace;
        self.screen_rect = ss.to_screenspace(&self.rect);
        self.points = grid_points(&self.rect, self.tiles)
            .into_iter()
            .map(|world| GridPoint {
                world,
                screen: ss.to_screenspace(&world),
            })
            .collect();
    }

    fn label_placement(&self, p: DVec2) -> (DVec2, Align2) {
        let r = &self.screen_rect;
        let h = if p.x == r.x {
            Align::Min
        } else if p.x >= r.right() {
            Align::Max
        } else {
            Align::Center
        };
        if p.y == r.y {
            (p, Align2([h, Align::Min]))
        } else {
            (DVec2::new(p.x, p.y - LABEL_MARGIN), Align2([h, Align::Max]))
        }
    }
}

impl Overlay for CoordinateGridOverlay {
    fn name(&self) -> &str {
        "coordinate-grid"
    }

    fn base(&self) -> &OverlayBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OverlayBase {
        &mut self.base
    }

    fn reload(&mut self, image: &ImageBounds) {
        self.rect = image.rect;
        self.rebuild();
    }

    fn on_raw_event(
        &mut self,
        event: &InputEvent,
        shortcuts: &ShortcutTable,
        _image: &ImageBounds,
    ) -> EventResponse {
        let chords = [ShortcutAction::ShowCoordinatesA, ShortcutAction::ShowCoordinatesB];
        match event {
            InputEvent::KeyPress { .. } | InputEvent::ShortcutProbe { .. } => {
                if chords.iter().any(|&a| shortcuts.matches(a, event)) && !self.is_visible() {
                    self.set_visible(true);
                    return EventResponse::CHANGED;
                }
            }
            InputEvent::KeyRelease { .. } => {
                let released = chords.iter().any(|&a| {
                    shortcuts
                        .get(a)
                        .matches_with(event, ModifierMatching::ContainsAny)
                });
                if released && self.is_visible() {
                    self.set_visible(false);
                    return EventResponse::CHANGED;
                }
            }
            InputEvent::Scroll { delta, .. } if self.is_visible() => {
                let tiles = if *delta > 0.0 {
                    self.tiles.saturating_add(1)
                } else {
                    self.tiles.saturating_sub(1)
                };
                self.set_tiles(tiles);
                return EventResponse::CONSUMED;
            }
            _ => {}
        }
        EventResponse::IGNORED
    }

    fn bounds_in_screenspace(&self) -> Option<RectF> {
        Some(self.screen_rect)
    }

    fn paint(&self, out: &mut Vec<PaintCommand>) {
        for point in &self.points {
            out.push(PaintCommand::Point {
                center: point.screen,
                radius: POINT_RADIUS,
                color: POINT_COLOR,
            });
            let (pos, anchor) = self.label_placement(point.screen);
            out.push(PaintCommand::Text {
                pos,
                anchor,
                text: format!("x{}\ny{}", point.world.x as i64, point.world.y as i64),
                color: POINT_COLOR,
                size: LABEL_SIZE,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, Modifiers};
    use crate::screenspace::Screenspace;
    use pixview_math::Transform2D;

    fn image(w: f64, h: f64) -> ImageBounds {
        ImageBounds {
            rect: RectF::from_size(w, h),
            has_pixels: true,
        }
    }

    #[test]
    fn test_grid_points_snapping() {
        let points = grid_points(&RectF::from_size(100.0, 50.0), 3);
        assert_eq!(points.len(), 16);
        let xs: Vec<f64> = points.iter().step_by(4).map(|p| p.x).collect();
        let ys: Vec<f64> = points[..4].iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![0.0, 33.0, 67.0, 100.0]);
        assert_eq!(ys, vec![0.0, 17.0, 33.0, 50.0]);
    }

    #[test]
    fn test_grid_points_offset_origin() {
        let points = grid_points(&RectF::new(-50.0, -25.0, 100.0, 50.0), 2);
        assert_eq!(points[0], DVec2::new(-50.0, -25.0));
        assert_eq!(points[8], DVec2::new(50.0, 25.0));
    }

    #[test]
    fn test_zero_tiles_clamped() {
        assert_eq!(grid_points(&RectF::from_size(10.0, 10.0), 0).len(), 4);
    }

    #[test]
    fn test_visibility_follows_chord() {
        let table = ShortcutTable::default();
        let mut grid = CoordinateGridOverlay::new();
        let img = image(100.0, 50.0);
        assert!(!grid.is_visible());

        let held = Modifiers::SHIFT.with(crate::event::Modifier::Alt);
        let press = InputEvent::KeyPress {
            key: Key::Alt,
            modifiers: held,
        };
        assert!(grid.on_raw_event(&press, &table, &img).changed);
        assert!(grid.is_visible());

        // wrong chord on release does nothing
        let other = InputEvent::KeyRelease {
            key: Key::Char('E'),
            modifiers: held,
        };
        grid.on_raw_event(&other, &table, &img);
        assert!(grid.is_visible());

        let release = InputEvent::KeyRelease {
            key: Key::Shift,
            modifiers: held,
        };
        grid.on_raw_event(&release, &table, &img);
        assert!(!grid.is_visible());
    }

    #[test]
    fn test_alt_alone_does_not_show() {
        let table = ShortcutTable::default();
        let mut grid = CoordinateGridOverlay::new();
        let press = InputEvent::KeyPress {
            key: Key::Alt,
            modifiers: Modifiers::ALT,
        };
        assert!(!grid.on_raw_event(&press, &table, &image(10.0, 10.0)).changed);
        assert!(!grid.is_visible());
    }

    #[test]
    fn test_scroll_changes_tiles_only_when_visible() {
        let table = ShortcutTable::default();
        let mut grid = CoordinateGridOverlay::new();
        let img = image(100.0, 100.0);
        let up = InputEvent::Scroll {
            delta: 120.0,
            pos: DVec2::ZERO,
            modifiers: Modifiers::NONE,
        };
        assert!(!grid.on_raw_event(&up, &table, &img).consumed);
        assert_eq!(grid.tiles(), DEFAULT_TILES);

        grid.set_visible(true);
        assert!(grid.on_raw_event(&up, &table, &img).consumed);
        assert_eq!(grid.tiles(), 7);

        let down = InputEvent::Scroll {
            delta: -120.0,
            pos: DVec2::ZERO,
            modifiers: Modifiers::NONE,
        };
        for _ in 0..20 {
            grid.on_raw_event(&down, &table, &img);
        }
        assert_eq!(grid.tiles(), 1);
    }

    #[test]
    fn test_paint_in_screenspace() {
        let mut grid = CoordinateGridOverlay::new();
        grid.on_navigation_changed(&Screenspace::new(Transform2D::from_scale_translation(
            2.0,
            DVec2::new(10.0, 0.0),
        )));
        grid.reload(&image(100.0, 50.0));
        grid.set_tiles(1);
        assert_eq!(
            grid.bounds_in_screenspace(),
            Some(RectF::new(10.0, 0.0, 200.0, 100.0))
        );

        let mut out = Vec::new();
        grid.paint(&mut out);
        assert_eq!(out.len(), 8);
        match &out[3] {
            PaintCommand::Text {
                pos, anchor, text, ..
            } => {
                // second point: (0, 50) in world, left edge, bottom row
                assert_eq!(text, "x0\ny50");
                assert_eq!(*pos, DVec2::new(10.0, 95.0));
                assert_eq!(*anchor, Align2::LEFT_BOTTOM);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &out[5] {
            PaintCommand::Text { anchor, text, .. } => {
                assert_eq!(text, "x100\ny0");
                assert_eq!(*anchor, Align2::RIGHT_TOP);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
