//! Zoom and pan state machine.
//!
//! [`Navigator`] owns the zoom factor and the *world rect*: the window into
//! world space the device currently shows. Device coordinates map to world
//! coordinates as
//!
//! ```text
//! world = world_rect.min + device / zoom
//! ```
//!
//! and the world rect's size is always `device_size / zoom - epsilon`.
//!
//! # Interaction
//!
//! Presses of a pan or zoom binding set an [`InteractionState`] flag and
//! remember which button set it. Moves then pan by the pointer delta (scaled
//! by `1 / zoom`) or drag-zoom around the press position; releasing the
//! button clears its flags. Flags are independent: nothing prevents panning
//! and zooming at once.
//!
//! Requests the navigator cannot honor (zoom outside the configured range,
//! a zero-sized resize, a move with no press) are ignored and reported as
//! `false`, never as errors.
//!
//! ```rust
//! use pixview_math::DVec2;
//! use pixview_view::{NavigationConfig, Navigator};
//!
//! let mut nav = Navigator::new(NavigationConfig::default(), DVec2::new(800.0, 600.0));
//! assert!(nav.zoom_viewport(2.0, DVec2::new(400.0, 300.0)));
//! assert_eq!(nav.zoom(), 2.0);
//!
//! // 2 * 20 = 40 is above the default maximum of 20
//! assert!(!nav.zoom_viewport(20.0, DVec2::ZERO));
//! assert_eq!(nav.zoom(), 2.0);
//! ```

use std::ops::{BitOr, BitOrAssign};

use pixview_math::{DVec2, RectF, Transform2D, round_to};
use tracing::trace;

use crate::config::NavigationConfig;
use crate::event::PointerButton;
use crate::screenspace::Screenspace;

/// Independent interaction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InteractionState(u8);

impl InteractionState {
    /// Idle.
    pub const NONE: Self = Self(0);
    /// Dragging pans the view.
    pub const PANNING: Self = Self(1);
    /// Dragging zooms the view.
    pub const ZOOMING: Self = Self(1 << 1);
    /// A color pick is in progress.
    pub const PICKING: Self = Self(1 << 2);
    /// An unpick is in progress.
    pub const UNPICKING: Self = Self(1 << 3);

    /// `true` if every flag of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` if any flag of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Clears the flags of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for InteractionState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for InteractionState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Zoom/pan state machine for one viewport.
#[derive(Debug, Clone)]
pub struct Navigator {
    config: NavigationConfig,
    zoom: f64,
    world_rect: RectF,
    device_size: DVec2,
    state: InteractionState,
    triggers: Vec<(InteractionState, PointerButton)>,
    // None right after a press so the first move never jumps
    previous_pos: Option<DVec2>,
    initial_pos: Option<DVec2>,
    cursor_pos: DVec2,
}

impl Navigator {
    /// Navigator at zoom 1.0 with the world rect centered on the origin.
    pub fn new(config: NavigationConfig, device_size: DVec2) -> Self {
        let mut nav = Self {
            config,
            zoom: 1.0,
            world_rect: RectF::default(),
            device_size,
            state: InteractionState::NONE,
            triggers: Vec::new(),
            previous_pos: None,
            initial_pos: None,
            cursor_pos: DVec2::ZERO,
        };
        nav.world_rect = RectF::from_center_size(DVec2::ZERO, nav.scene_size());
        nav
    }

    /// Tunables in use.
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Visible window into world space.
    pub fn world_rect(&self) -> RectF {
        self.world_rect
    }

    /// Device size in pixels.
    pub fn device_size(&self) -> DVec2 {
        self.device_size
    }

    /// Active interaction flags.
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Last known pointer position, device pixels.
    pub fn cursor_pos(&self) -> DVec2 {
        self.cursor_pos
    }

    /// Records the pointer position without moving anything.
    pub fn set_cursor_pos(&mut self, pos: DVec2) {
        self.cursor_pos = pos;
    }

    /// `true` while a pan or drag-zoom is active.
    pub fn is_dragging(&self) -> bool {
        self.state
            .intersects(InteractionState::PANNING | InteractionState::ZOOMING)
    }

    /// World to device transform.
    pub fn transform(&self) -> Transform2D {
        Transform2D::from_scale_translation(self.zoom, -self.world_rect.min() * self.zoom)
    }

    /// Transform snapshot handed to overlays.
    pub fn screenspace(&self) -> Screenspace {
        Screenspace::new(self.transform())
    }

    /// World position under a device position.
    pub fn device_to_world(&self, p: DVec2) -> DVec2 {
        self.world_rect.min() + p / self.zoom
    }

    /// Device position of a world position.
    pub fn world_to_device(&self, p: DVec2) -> DVec2 {
        (p - self.world_rect.min()) * self.zoom
    }

    fn scene_size(&self) -> DVec2 {
        (self.device_size / self.zoom - DVec2::splat(self.config.scene_rect_epsilon))
            .max(DVec2::ZERO)
    }

    fn update_scene_rect(&mut self) {
        self.world_rect = self.world_rect.with_size(self.scene_size());
    }

    /// Moves the world rect by `delta` world units.
    pub fn pan(&mut self, delta: DVec2) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.world_rect = self.world_rect.translated(delta);
        true
    }

    /// Multiplies the zoom by `amount`, keeping the world point under
    /// `anchor` (device pixels) fixed on screen.
    ///
    /// Returns `false` and changes nothing if the rounded result falls outside
    /// `[zoom_min, zoom_max]`.
    pub fn zoom_viewport(&mut self, amount: f64, anchor: DVec2) -> bool {
        if !(amount.is_finite() && amount > 0.0 && anchor.is_finite()) {
            return false;
        }
        let new_zoom = round_to(self.zoom * amount, self.config.zoom_precision);
        if !(self.config.zoom_min..=self.config.zoom_max).contains(&new_zoom) {
            trace!(zoom = self.zoom, requested = new_zoom, "zoom out of range");
            return false;
        }

        let before = self.device_to_world(anchor);
        self.zoom = new_zoom;
        self.update_scene_rect();
        let after = self.device_to_world(anchor);
        self.world_rect = self.world_rect.translated(before - after);
        true
    }

    /// Back to zoom 1.0 around the cursor.
    pub fn reset_zoom(&mut self) -> bool {
        self.zoom_viewport(1.0 / self.zoom, self.cursor_pos)
    }

    /// Centers the world rect on `image_rect`, zoom unchanged.
    pub fn reset_pan(&mut self, image_rect: &RectF) -> bool {
        self.world_rect = self.world_rect.with_center(image_rect.center());
        true
    }

    /// Largest zoom showing all of `image_rect` within `fit_margin` of the
    /// device, clamped to the zoom range, then centered.
    pub fn fit(&mut self, image_rect: &RectF) -> bool {
        if image_rect.is_empty() || self.device_size.min_element() <= 0.0 {
            return false;
        }
        let ratio = self.device_size / image_rect.size();
        let zoom = (ratio.min_element() * self.config.fit_margin)
            .clamp(self.config.zoom_min, self.config.zoom_max);
        self.zoom = round_to(zoom, self.config.zoom_precision);
        self.update_scene_rect();
        self.reset_pan(image_rect)
    }

    /// New device size. Ignored unless both sides are positive; the world
    /// rect keeps its origin and is resized for the current zoom.
    pub fn resize(&mut self, size: DVec2) -> bool {
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return false;
        }
        if size == self.device_size {
            return false;
        }
        self.device_size = size;
        self.update_scene_rect();
        true
    }

    /// Sets `flag`, remembering `button` as the one that clears it.
    pub fn begin(&mut self, flag: InteractionState, button: PointerButton, pos: DVec2) {
        self.state |= flag;
        self.triggers.push((flag, button));
        self.initial_pos = Some(pos);
        self.previous_pos = None;
        self.cursor_pos = pos;
    }

    /// Pointer moved to `pos`. Returns `true` if the view changed.
    pub fn drag_to(&mut self, pos: DVec2) -> bool {
        self.cursor_pos = pos;
        if !self.is_dragging() {
            return false;
        }

        let previous = self.previous_pos.unwrap_or(pos);
        let initial = *self.initial_pos.get_or_insert(pos);
        let diff = previous - pos;
        let mut changed = false;

        if self.state.contains(InteractionState::PANNING) && diff != DVec2::ZERO {
            changed |= self.pan(diff / self.zoom);
        }
        if self.state.contains(InteractionState::ZOOMING) {
            let delta = if diff.x != 0.0 { diff.x } else { diff.y };
            if delta != 0.0 {
                let amount = 1.0 + delta * self.config.drag_zoom_sensitivity;
                changed |= self.zoom_viewport(amount, initial);
            }
        }

        self.previous_pos = Some(pos);
        changed
    }

    /// `button` went up: clears the flags it set. Returns `true` if any were.
    pub fn release(&mut self, button: PointerButton) -> bool {
        self.previous_pos = None;
        self.initial_pos = None;

        let before = self.state;
        let mut remaining = Vec::with_capacity(self.triggers.len());
        for (flag, trigger) in self.triggers.drain(..) {
            if trigger == button {
                self.state.remove(flag);
            } else {
                remaining.push((flag, trigger));
            }
        }
        self.triggers = remaining;
        self.state != before
    }

    /// Wheel zoom around `pos`: `amount = 2^(delta * wheel_zoom_factor)`.
    pub fn scroll(&mut self, delta: f64, pos: DVec2) -> bool {
        self.cursor_pos = pos;
        self.zoom_viewport(2f64.powf(delta * self.config.wheel_zoom_factor), pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DEVICE: DVec2 = DVec2::new(800.0, 600.0);

    fn nav() -> Navigator {
        Navigator::new(NavigationConfig::default(), DEVICE)
    }

    #[test]
    fn test_world_rect_size_tracks_zoom() {
        let mut n = nav();
        assert_eq!(n.world_rect().size(), DVec2::new(799.5, 599.5));
        n.zoom_viewport(2.0, DVec2::ZERO);
        assert_eq!(n.world_rect().size(), DVec2::new(399.5, 299.5));
    }

    #[test]
    fn test_zoom_rejected_below_min() {
        let mut n = nav();
        let before = n.world_rect();
        assert!(!n.zoom_viewport(0.05, DVec2::new(10.0, 10.0)));
        assert_eq!(n.zoom(), 1.0);
        assert_eq!(n.world_rect(), before);
    }

    #[test]
    fn test_nan_zoom_rejected() {
        // 10^400 overflows, so rounding yields NaN
        let config = NavigationConfig {
            zoom_precision: 400,
            ..NavigationConfig::default()
        };
        let mut n = Navigator::new(config, DEVICE);
        let before = n.world_rect();
        assert!(!n.zoom_viewport(2.0, DVec2::ZERO));
        assert_eq!(n.zoom(), 1.0);
        assert_eq!(n.world_rect(), before);
    }

    #[test]
    fn test_zoom_accepts_bounds() {
        let mut n = nav();
        assert!(n.zoom_viewport(0.1, DVec2::ZERO));
        assert_eq!(n.zoom(), 0.1);
        assert!(n.zoom_viewport(200.0, DVec2::ZERO));
        assert_eq!(n.zoom(), 20.0);
    }

    #[test]
    fn test_zoom_is_rounded() {
        let mut n = nav();
        n.zoom_viewport(1.0 / 3.0, DVec2::ZERO);
        assert_eq!(n.zoom(), 0.333333);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut n = nav();
        let anchor = DVec2::new(123.0, 456.0);
        let world_before = n.device_to_world(anchor);
        n.zoom_viewport(2.5, anchor);
        let world_after = n.device_to_world(anchor);
        assert_relative_eq!(world_before.x, world_after.x, epsilon = 1e-9);
        assert_relative_eq!(world_before.y, world_after.y, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_inverse_law() {
        let mut n = nav();
        let anchor = DVec2::new(200.0, 100.0);
        let start = n.world_rect();
        n.zoom_viewport(4.0, anchor);
        n.zoom_viewport(0.25, anchor);
        assert!(n.world_rect().abs_diff_eq(&start, 1e-6));
    }

    #[test]
    fn test_pan_roundtrip_exact() {
        let mut n = nav();
        let start = n.world_rect();
        n.pan(DVec2::new(13.0, -7.5));
        n.pan(DVec2::new(-13.0, 7.5));
        assert_eq!(n.world_rect(), start);
    }

    #[test]
    fn test_reset_pan_centers_image() {
        let mut n = nav();
        n.pan(DVec2::new(1000.0, -300.0));
        n.zoom_viewport(3.0, DVec2::new(5.0, 5.0));
        let image = RectF::from_size(100.0, 50.0);
        n.reset_pan(&image);
        let c = n.world_rect().center();
        assert_relative_eq!(c.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 25.0, epsilon = 1e-9);
        assert_eq!(n.zoom(), 3.0);
    }

    #[test]
    fn test_reset_zoom_around_cursor() {
        let mut n = nav();
        n.set_cursor_pos(DVec2::new(300.0, 200.0));
        n.zoom_viewport(4.0, DVec2::new(50.0, 50.0));
        let world = n.device_to_world(n.cursor_pos());
        assert!(n.reset_zoom());
        assert_eq!(n.zoom(), 1.0);
        assert!(n.device_to_world(n.cursor_pos()).abs_diff_eq(world, 1e-9));
    }

    #[test]
    fn test_resize() {
        let mut n = nav();
        let origin = n.world_rect().min();
        assert!(!n.resize(DVec2::new(0.0, 100.0)));
        assert!(!n.resize(DVec2::new(-5.0, 100.0)));
        assert_eq!(n.device_size(), DEVICE);

        assert!(n.resize(DVec2::new(400.0, 300.0)));
        let after = n.world_rect();
        assert_eq!(after.min(), origin);
        assert_eq!(after.size(), DVec2::new(399.5, 299.5));

        // idempotent
        assert!(!n.resize(DVec2::new(400.0, 300.0)));
        assert_eq!(n.world_rect(), after);
    }

    #[test]
    fn test_drag_pan() {
        let mut n = nav();
        n.zoom_viewport(2.0, DVec2::ZERO);
        let start = n.world_rect().min();

        n.begin(InteractionState::PANNING, PointerButton::Middle, DVec2::new(100.0, 100.0));
        // first move only primes the delta tracking
        assert!(!n.drag_to(DVec2::new(110.0, 100.0)));
        assert!(n.drag_to(DVec2::new(130.0, 90.0)));
        // 20 device px right at zoom 2 = 10 world px
        assert_eq!(n.world_rect().min(), start + DVec2::new(-10.0, 5.0));

        assert!(n.release(PointerButton::Middle));
        assert!(n.state().is_empty());
        assert!(!n.drag_to(DVec2::new(500.0, 500.0)));
    }

    #[test]
    fn test_drag_zoom() {
        let mut n = nav();
        n.begin(InteractionState::ZOOMING, PointerButton::Middle, DVec2::new(400.0, 300.0));
        n.drag_to(DVec2::new(400.0, 300.0));
        // dragging left zooms in: 1 + 10 * 0.01
        assert!(n.drag_to(DVec2::new(390.0, 300.0)));
        assert_relative_eq!(n.zoom(), 1.1);
        // vertical only motion uses dy
        assert!(n.drag_to(DVec2::new(390.0, 310.0)));
        assert_relative_eq!(n.zoom(), round_to(1.1 * 0.9, 6));
    }

    #[test]
    fn test_release_only_clears_own_flags() {
        let mut n = nav();
        n.begin(InteractionState::PANNING, PointerButton::Middle, DVec2::ZERO);
        n.begin(InteractionState::PICKING, PointerButton::Primary, DVec2::ZERO);
        assert!(n.state().contains(InteractionState::PANNING | InteractionState::PICKING));

        assert!(n.release(PointerButton::Primary));
        assert!(n.state().contains(InteractionState::PANNING));
        assert!(!n.state().contains(InteractionState::PICKING));
        assert!(!n.release(PointerButton::Secondary));
    }

    #[test]
    fn test_permissive_flags() {
        let mut n = nav();
        n.begin(InteractionState::PANNING, PointerButton::Primary, DVec2::ZERO);
        n.begin(InteractionState::ZOOMING, PointerButton::Middle, DVec2::ZERO);
        assert!(n.state().contains(InteractionState::PANNING | InteractionState::ZOOMING));
    }

    #[test]
    fn test_wheel() {
        let mut n = nav();
        assert!(n.scroll(1000.0, DVec2::new(10.0, 10.0)));
        assert_relative_eq!(n.zoom(), 2.0);
        assert!(n.scroll(-1000.0, DVec2::new(10.0, 10.0)));
        assert_relative_eq!(n.zoom(), 1.0);
    }

    #[test]
    fn test_fit() {
        let mut n = nav();
        let image = RectF::from_size(1600.0, 300.0);
        assert!(n.fit(&image));
        assert_relative_eq!(n.zoom(), 0.475);
        assert!(n.world_rect().center().abs_diff_eq(image.center(), 1e-9));

        assert!(!n.fit(&RectF::default()));
    }

    #[test]
    fn test_transform_maps_world_rect_to_device() {
        let mut n = nav();
        n.zoom_viewport(2.0, DVec2::new(40.0, 30.0));
        n.pan(DVec2::new(12.0, -4.0));
        let t = n.transform();
        let origin = t.map_point(n.world_rect().min());
        assert!(origin.abs_diff_eq(DVec2::ZERO, 1e-9));
        let p = DVec2::new(77.0, 13.0);
        assert!(t.map_point(n.device_to_world(p)).abs_diff_eq(p, 1e-9));
    }

    #[test]
    fn test_zoom_always_in_range() {
        let mut n = nav();
        for amount in [3.0, 3.0, 3.0, 0.01, 0.5, 0.5, 0.5, 0.5, 0.5, 7.0, 1e9, 1e-9] {
            n.zoom_viewport(amount, DVec2::new(1.0, 2.0));
            assert!(n.zoom() >= 0.1 && n.zoom() <= 20.0, "zoom {}", n.zoom());
        }
    }
}
