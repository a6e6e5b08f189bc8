//! Rectangular color picker.
//!
//! The picker selects a region of whole image pixels. A `pick` press selects
//! the pixel under the pointer; a `pick_area_start` press does the same and
//! then every `pick_area_expand` move grows the region to span the press pixel
//! and the pixel under the pointer, in any drag direction. `unpick` hides it.

use egui::{Color32, Stroke};
use pixview_core::Rect;
use pixview_math::{DVec2, RectF};
use tracing::trace;

use super::{EventResponse, ImageBounds, Overlay, OverlayBase};
use crate::event::InputEvent;
use crate::paint::PaintCommand;
use crate::shortcut::{ShortcutAction, ShortcutTable};

const STROKE_WIDTH: f32 = 2.0;
const CENTER_RADIUS: f32 = 2.0;
const BOUNDS_PADDING: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    None,
    Point,
    Area,
}

/// Color picker overlay, hidden until the first pick.
#[derive(Debug, Clone)]
pub struct ColorPickerOverlay {
    base: OverlayBase,
    region: Rect,
    anchor: (u32, u32),
    drag: Drag,
    image: ImageBounds,
    screen_rect: RectF,
}

impl Default for ColorPickerOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPickerOverlay {
    /// Hidden picker.
    pub fn new() -> Self {
        Self {
            base: OverlayBase::new(false),
            region: Rect::pixel(0, 0),
            anchor: (0, 0),
            drag: Drag::None,
            image: ImageBounds::default(),
            screen_rect: RectF::default(),
        }
    }

    /// Selected region, `None` while hidden.
    pub fn picked_region(&self) -> Option<Rect> {
        self.is_visible().then_some(self.region)
    }

    /// Selected region regardless of visibility.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Selects `region` and shows the picker.
    pub fn set_region(&mut self, region: Rect) {
        self.region = region;
        self.anchor = (region.x, region.y);
        self.set_visible(true);
        self.refresh();
    }

    fn image_size(&self) -> (u32, u32) {
        (
            self.image.rect.width.max(0.0) as u32,
            self.image.rect.height.max(0.0) as u32,
        )
    }

    fn local(&self, pos: DVec2) -> DVec2 {
        self.base.screenspace.from_screenspace(&pos) - self.image.rect.min()
    }

    /// Image pixel under a device position, `None` outside the image.
    fn pixel_under(&self, pos: DVec2) -> Option<(u32, u32)> {
        if !self.image.has_pixels {
            return None;
        }
        let (w, h) = self.image_size();
        let p = self.local(pos).floor();
        let inside = p.x >= 0.0 && p.y >= 0.0 && p.x < w as f64 && p.y < h as f64;
        inside.then(|| (p.x as u32, p.y as u32))
    }

    /// Image pixel nearest to a device position.
    fn clamped_pixel(&self, pos: DVec2) -> Option<(u32, u32)> {
        let (w, h) = self.image_size();
        if !self.image.has_pixels || w == 0 || h == 0 {
            return None;
        }
        let p = self.local(pos).floor();
        let x = p.x.clamp(0.0, (w - 1) as f64) as u32;
        let y = p.y.clamp(0.0, (h - 1) as f64) as u32;
        Some((x, y))
    }

    fn refresh(&mut self) {
        let world = RectF::new(
            self.image.rect.x + self.region.x as f64,
            self.image.rect.y + self.region.y as f64,
            self.region.width as f64,
            self.region.height as f64,
        );
        self.screen_rect = self.base.screenspace.to_screenspace(&world);
    }

    fn start(&mut self, pixel: (u32, u32), drag: Drag) -> EventResponse {
        self.anchor = pixel;
        self.region = Rect::pixel(pixel.0, pixel.1);
        self.drag = drag;
        self.set_visible(true);
        self.refresh();
        trace!(region = %self.region, "pick started");
        EventResponse::CONSUMED
    }

    fn update(&mut self, region: Rect) -> EventResponse {
        if region == self.region {
            return EventResponse {
                consumed: true,
                changed: false,
            };
        }
        self.region = region;
        self.refresh();
        EventResponse::CONSUMED
    }
}

impl Overlay for ColorPickerOverlay {
    fn name(&self) -> &str {
        "color-picker"
    }

    fn base(&self) -> &OverlayBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OverlayBase {
        &mut self.base
    }

    fn reload(&mut self, image: &ImageBounds) {
        self.image = *image;
        self.refresh();
    }

    fn on_image_changed(&mut self, image: &ImageBounds) {
        let (w, h) = self.image_size();
        let fits = image.has_pixels && Rect::from_size(w, h).contains_rect(&self.region);
        if !fits {
            self.drag = Drag::None;
            self.set_visible(false);
        }
    }

    fn on_raw_event(
        &mut self,
        event: &InputEvent,
        shortcuts: &ShortcutTable,
        image: &ImageBounds,
    ) -> EventResponse {
        self.image = *image;
        match *event {
            InputEvent::PointerPress { pos, .. } => {
                if shortcuts.matches(ShortcutAction::Unpick, event) {
                    self.drag = Drag::None;
                    if self.is_visible() {
                        self.set_visible(false);
                        return EventResponse::CONSUMED;
                    }
                    return EventResponse::IGNORED;
                }
                let drag = if shortcuts.matches(ShortcutAction::PickAreaStart, event) {
                    Drag::Area
                } else if shortcuts.matches(ShortcutAction::Pick, event) {
                    Drag::Point
                } else {
                    return EventResponse::IGNORED;
                };
                match self.pixel_under(pos) {
                    Some(pixel) => self.start(pixel, drag),
                    None => EventResponse::IGNORED,
                }
            }
            InputEvent::PointerMove { pos, .. } => match self.drag {
                Drag::Area if shortcuts.matches(ShortcutAction::PickAreaExpand, event) => {
                    match self.clamped_pixel(pos) {
                        Some(pixel) => self.update(Rect::spanning(self.anchor, pixel)),
                        None => EventResponse::IGNORED,
                    }
                }
                Drag::Point => match self.pixel_under(pos) {
                    Some((x, y)) => {
                        self.anchor = (x, y);
                        self.update(Rect::pixel(x, y))
                    }
                    None => EventResponse::IGNORED,
                },
                _ => EventResponse::IGNORED,
            },
            InputEvent::PointerRelease { .. } => {
                self.drag = Drag::None;
                EventResponse::IGNORED
            }
            _ => EventResponse::IGNORED,
        }
    }

    fn bounds_in_screenspace(&self) -> Option<RectF> {
        Some(self.screen_rect.expanded(BOUNDS_PADDING))
    }

    fn paint(&self, out: &mut Vec<PaintCommand>) {
        out.push(PaintCommand::Rect {
            rect: self.screen_rect,
            stroke: Stroke::new(STROKE_WIDTH, Color32::RED),
        });
        if self.region.width != 1 || self.region.height != 1 {
            out.push(PaintCommand::Point {
                center: self.screen_rect.center(),
                radius: CENTER_RADIUS,
                color: Color32::RED,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Modifier, Modifiers, PointerButton};
    use crate::screenspace::Screenspace;
    use pixview_math::Transform2D;

    const CTRL_SHIFT: Modifiers = Modifiers::CTRL.with(Modifier::Shift);

    fn image() -> ImageBounds {
        ImageBounds {
            rect: RectF::from_size(100.0, 50.0),
            has_pixels: true,
        }
    }

    fn press(modifiers: Modifiers, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerPress {
            button: PointerButton::Primary,
            pos: DVec2::new(x, y),
            modifiers,
        }
    }

    fn moved(modifiers: Modifiers, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove {
            pos: DVec2::new(x, y),
            modifiers,
        }
    }

    fn picker() -> ColorPickerOverlay {
        let mut p = ColorPickerOverlay::new();
        p.reload(&image());
        p
    }

    #[test]
    fn test_hidden_by_default() {
        assert_eq!(ColorPickerOverlay::new().picked_region(), None);
    }

    #[test]
    fn test_single_pick() {
        let table = ShortcutTable::default();
        let mut p = picker();
        let r = p.on_raw_event(&press(Modifiers::CTRL, 10.7, 20.2), &table, &image());
        assert!(r.changed);
        assert_eq!(p.picked_region(), Some(Rect::new(10, 20, 1, 1)));
    }

    #[test]
    fn test_pick_outside_image_ignored() {
        let table = ShortcutTable::default();
        let mut p = picker();
        p.on_raw_event(&press(Modifiers::CTRL, 150.0, 20.0), &table, &image());
        assert_eq!(p.picked_region(), None);
    }

    #[test]
    fn test_area_pick_any_direction() {
        let table = ShortcutTable::default();
        let mut p = picker();
        p.on_raw_event(&press(CTRL_SHIFT, 30.0, 40.0), &table, &image());
        assert_eq!(p.picked_region(), Some(Rect::pixel(30, 40)));

        p.on_raw_event(&moved(CTRL_SHIFT, 12.5, 5.5), &table, &image());
        assert_eq!(p.picked_region(), Some(Rect::new(12, 5, 19, 36)));

        // past the image edge: clamped to the last pixel
        p.on_raw_event(&moved(CTRL_SHIFT, 500.0, 500.0), &table, &image());
        assert_eq!(p.picked_region(), Some(Rect::new(30, 40, 70, 10)));
    }

    #[test]
    fn test_expand_needs_chord() {
        let table = ShortcutTable::default();
        let mut p = picker();
        p.on_raw_event(&press(CTRL_SHIFT, 30.0, 40.0), &table, &image());
        p.on_raw_event(&moved(Modifiers::CTRL, 10.0, 10.0), &table, &image());
        assert_eq!(p.picked_region(), Some(Rect::pixel(30, 40)));
    }

    #[test]
    fn test_release_ends_drag() {
        let table = ShortcutTable::default();
        let mut p = picker();
        p.on_raw_event(&press(CTRL_SHIFT, 30.0, 40.0), &table, &image());
        let release = InputEvent::PointerRelease {
            button: PointerButton::Primary,
            pos: DVec2::new(30.0, 40.0),
            modifiers: CTRL_SHIFT,
        };
        p.on_raw_event(&release, &table, &image());
        p.on_raw_event(&moved(CTRL_SHIFT, 0.0, 0.0), &table, &image());
        assert_eq!(p.picked_region(), Some(Rect::pixel(30, 40)));
    }

    #[test]
    fn test_unpick() {
        let table = ShortcutTable::default();
        let mut p = picker();
        p.on_raw_event(&press(Modifiers::CTRL, 1.0, 1.0), &table, &image());
        let unpick = InputEvent::PointerPress {
            button: PointerButton::Secondary,
            pos: DVec2::ZERO,
            modifiers: Modifiers::CTRL,
        };
        assert!(p.on_raw_event(&unpick, &table, &image()).changed);
        assert_eq!(p.picked_region(), None);
    }

    #[test]
    fn test_pick_through_zoomed_screenspace() {
        let table = ShortcutTable::default();
        let mut p = ColorPickerOverlay::new();
        let ss = Screenspace::new(Transform2D::from_scale_translation(4.0, DVec2::new(-40.0, 0.0)));
        p.on_navigation_changed(&ss);
        p.reload(&image());
        // device (0, 8) -> world (10, 2)
        p.on_raw_event(&press(Modifiers::CTRL, 0.0, 8.0), &table, &image());
        assert_eq!(p.picked_region(), Some(Rect::pixel(10, 2)));
        assert_eq!(
            p.bounds_in_screenspace(),
            Some(RectF::new(0.0, 8.0, 4.0, 4.0).expanded(4.0))
        );
    }

    #[test]
    fn test_image_change_hides_out_of_bounds_region() {
        let table = ShortcutTable::default();
        let mut p = picker();
        p.on_raw_event(&press(Modifiers::CTRL, 90.0, 10.0), &table, &image());

        let smaller = ImageBounds {
            rect: RectF::from_size(50.0, 50.0),
            has_pixels: true,
        };
        p.reload(&smaller);
        p.on_image_changed(&smaller);
        assert_eq!(p.picked_region(), None);
    }

    #[test]
    fn test_paint_marks_center_of_areas() {
        let mut p = picker();
        p.set_region(Rect::pixel(1, 1));
        let mut out = Vec::new();
        p.paint(&mut out);
        assert_eq!(out.len(), 1);

        p.set_region(Rect::new(0, 0, 4, 2));
        out.clear();
        p.paint(&mut out);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[1], PaintCommand::Point { center, .. } if center == DVec2::new(2.0, 1.0)));
    }
}
