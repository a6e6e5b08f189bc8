//! The viewport engine: image, navigation, background and overlays behind one
//! event pipeline.
//!
//! # Event pipeline
//!
//! [`ImageViewport::handle_event`] classifies every [`InputEvent`] with the
//! shortcut table first:
//!
//! 1. A press whose first matching binding is a navigation or viewport
//!    command (pan, zoom, rotate, clear, ...) is executed and stops there.
//! 2. Anything else is forwarded to the overlays in registration order.
//! 3. Moves drive an active pan/zoom drag instead of reaching overlays.
//! 4. Wheel events go to overlays first; unless one consumes the event it
//!    zooms around the pointer.
//!
//! Observers registered with [`ImageViewport::on_picked_region_changed`] and
//! [`ImageViewport::on_image_cleared`] run synchronously, in registration
//! order, once the triggering mutation is fully applied.
//!
//! ```rust
//! use pixview_core::Rgba16Buffer;
//! use pixview_view::{ImageViewport, ViewportConfig};
//!
//! let mut viewport = ImageViewport::new(ViewportConfig::default()).unwrap();
//! viewport.set_image(Rgba16Buffer::filled(100, 50, [0, 0, 0, 65535]));
//!
//! // the first image is centered
//! let center = viewport.world_rect().center();
//! assert_eq!((center.x, center.y), (50.0, 25.0));
//!
//! assert_eq!(viewport.rotate_90(90, true).unwrap(), 90);
//! assert!(viewport.rotate_90(45, true).is_err());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use pixview_core::{Error, Rect, Rgba16Buffer, SourceBuffer, normalize_to_rgba16};
use pixview_math::{DVec2, RectF, Transform2D};
use tracing::{debug, warn};

use crate::background::{BackgroundFill, BackgroundRenderer, BackgroundStyle, BackgroundStyleLibrary};
use crate::config::ViewportConfig;
use crate::event::InputEvent;
use crate::navigation::{InteractionState, Navigator};
use crate::overlay::{
    ColorPickerOverlay, CoordinateGridOverlay, ImageBounds, OverlayHandle, OverlayHost,
};
use crate::paint::PaintCommand;
use crate::screenspace::Screenspace;
use crate::shortcut::{ShortcutAction, ShortcutTable};
use crate::surface::ImageSurface;
use crate::ViewResult;

/// What the pipeline did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// The viewport claimed the event; the host must not act on it.
    pub consumed: bool,
    /// Something visible changed.
    pub repaint: bool,
}

impl EventOutcome {
    const HANDLED: Self = Self {
        consumed: true,
        repaint: true,
    };
}

type PickedObserver = Box<dyn FnMut(Option<Rect>)>;
type ClearedObserver = Box<dyn FnMut()>;

/// Pan/zoom image viewport.
pub struct ImageViewport {
    config: ViewportConfig,
    navigator: Navigator,
    surface: ImageSurface,
    background: BackgroundRenderer,
    overlays: OverlayHost,
    color_picker: Rc<RefCell<ColorPickerOverlay>>,
    coordinate_grid: Rc<RefCell<CoordinateGridOverlay>>,
    image_generation: u64,
    last_picked: Option<Rect>,
    picked_observers: Vec<PickedObserver>,
    cleared_observers: Vec<ClearedObserver>,
}

impl fmt::Debug for ImageViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageViewport")
            .field("zoom", &self.navigator.zoom())
            .field("world_rect", &self.navigator.world_rect())
            .field("rotation", &self.surface.rotation())
            .field("has_image", &self.surface.has_pixels())
            .field("overlays", &self.overlays.len())
            .finish_non_exhaustive()
    }
}

impl ImageViewport {
    /// Viewport with the default background library.
    pub fn new(config: ViewportConfig) -> ViewResult<Self> {
        Self::with_library(config, BackgroundStyleLibrary::default())
    }

    /// Viewport with a caller-provided background library.
    ///
    /// The color picker and coordinate grid are registered first, in that
    /// order.
    pub fn with_library(config: ViewportConfig, library: BackgroundStyleLibrary) -> ViewResult<Self> {
        config.validate()?;

        let mut background = BackgroundRenderer::new(library);
        if let Some(label) = &config.background {
            if !background.select(label) {
                warn!(style = %label, "unknown background style, keeping default");
            }
        }

        let navigator = Navigator::new(config.navigation.clone(), DVec2::from(config.initial_size));
        let surface = ImageSurface::new(config.anchor, config.placeholder_visible);

        let mut viewport = Self {
            config,
            navigator,
            surface,
            background,
            overlays: OverlayHost::new(),
            color_picker: Rc::new(RefCell::new(ColorPickerOverlay::new())),
            coordinate_grid: Rc::new(RefCell::new(CoordinateGridOverlay::new())),
            image_generation: 0,
            last_picked: None,
            picked_observers: Vec::new(),
            cleared_observers: Vec::new(),
        };

        let picker: OverlayHandle = viewport.color_picker.clone();
        let grid: OverlayHandle = viewport.coordinate_grid.clone();
        viewport.add_overlay(picker)?;
        viewport.add_overlay(grid)?;

        if viewport.surface.is_visible() {
            viewport.reset_pan();
        }
        Ok(viewport)
    }

    /// Configuration in use.
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Image
    // ------------------------------------------------------------------------

    /// Displays `buffer`, rotated by the current angle.
    ///
    /// The view is centered on the image when the surface goes from hidden to
    /// visible.
    pub fn set_image(&mut self, buffer: Rgba16Buffer) {
        let was_visible = self.surface.is_visible();
        debug!(width = buffer.width(), height = buffer.height(), "image set");
        self.surface.set_pixels(buffer);
        self.image_changed();
        if !was_visible {
            self.reset_pan();
        }
        self.notify_picked();
    }

    /// Normalizes a decoded buffer and displays it.
    pub fn set_image_from_source(&mut self, source: &SourceBuffer) {
        self.set_image(normalize_to_rgba16(source));
    }

    /// Decodes `path` and displays it. On failure the current image stays.
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> ViewResult<()> {
        let buffer = pixview_io::decode(path)?;
        self.set_image(buffer);
        Ok(())
    }

    /// Drops the image and notifies the image-cleared observers.
    pub fn clear_image(&mut self) {
        self.surface.clear(self.config.placeholder_visible);
        debug!("image cleared");
        self.image_changed();
        for observer in &mut self.cleared_observers {
            observer();
        }
        self.notify_picked();
    }

    /// Rotates by `degrees` (counter-clockwise, multiple of 90), relative to
    /// the current angle if `additive`. Returns the new absolute angle in
    /// `[0, 360)`.
    ///
    /// The angle is kept without an image and applies to the next one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `degrees` is not a multiple of 90.
    pub fn rotate_90(&mut self, degrees: i32, additive: bool) -> pixview_core::Result<i32> {
        if degrees % 90 != 0 {
            return Err(Error::invalid_argument(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }
        let base = if additive { self.surface.rotation() } else { 0 };
        let angle = (base + degrees.rem_euclid(360)).rem_euclid(360);
        self.surface.set_rotation(angle);
        debug!(angle, "image rotated");
        if self.surface.has_pixels() {
            self.image_changed();
            self.notify_picked();
        }
        Ok(angle)
    }

    /// Absolute rotation in degrees.
    pub fn rotation(&self) -> i32 {
        self.surface.rotation()
    }

    /// The image surface.
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Displayed image, `None` without one.
    pub fn image(&self) -> Option<&Rgba16Buffer> {
        self.surface.image()
    }

    /// Bumped whenever the displayed buffer changes.
    pub fn image_generation(&self) -> u64 {
        self.image_generation
    }

    /// Image geometry as overlays see it.
    pub fn image_bounds(&self) -> ImageBounds {
        ImageBounds {
            rect: self.surface.bounding_rect(),
            has_pixels: self.surface.has_pixels(),
        }
    }

    fn image_changed(&mut self) {
        self.image_generation += 1;
        self.overlays.image_changed(&self.image_bounds());
    }

    // ------------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------------

    /// Active color-picker selection in image pixels, `None` while hidden.
    pub fn picked_region(&self) -> Option<Rect> {
        self.color_picker.borrow().picked_region()
    }

    /// Registers an overlay. Returns `Ok(false)` if it is already registered.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyAttached`] if the overlay belongs to another viewport.
    pub fn add_overlay(&mut self, overlay: OverlayHandle) -> pixview_core::Result<bool> {
        let screenspace = self.navigator.screenspace();
        let image = self.image_bounds();
        self.overlays.add(overlay, &screenspace, &image)
    }

    /// The overlay host.
    pub fn overlays(&self) -> &OverlayHost {
        &self.overlays
    }

    /// Built-in color picker.
    pub fn color_picker(&self) -> Rc<RefCell<ColorPickerOverlay>> {
        Rc::clone(&self.color_picker)
    }

    /// Built-in coordinate grid.
    pub fn coordinate_grid(&self) -> Rc<RefCell<CoordinateGridOverlay>> {
        Rc::clone(&self.coordinate_grid)
    }

    /// Paint commands of every visible overlay, device pixels.
    pub fn paint_overlays(&self) -> Vec<PaintCommand> {
        let mut out = Vec::new();
        self.overlays.paint(&mut out);
        out
    }

    /// Called with the new selection whenever it changes or the picker is
    /// shown or hidden.
    pub fn on_picked_region_changed(&mut self, observer: impl FnMut(Option<Rect>) + 'static) {
        self.picked_observers.push(Box::new(observer));
    }

    /// Called after every [`ImageViewport::clear_image`].
    pub fn on_image_cleared(&mut self, observer: impl FnMut() + 'static) {
        self.cleared_observers.push(Box::new(observer));
    }

    fn notify_picked(&mut self) {
        let current = self.picked_region();
        if current == self.last_picked {
            return;
        }
        self.last_picked = current;
        for observer in &mut self.picked_observers {
            observer(current);
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    fn sync_overlays(&self) {
        self.overlays
            .navigation_changed(&self.navigator.screenspace(), &self.image_bounds());
    }

    fn navigated(&self, changed: bool) -> bool {
        if changed {
            self.sync_overlays();
        }
        changed
    }

    /// New device size in pixels. Ignored unless both sides are positive.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let changed = self.navigator.resize(DVec2::new(width, height));
        self.navigated(changed)
    }

    /// Zooms by `amount` around `anchor` (device pixels).
    pub fn zoom_viewport(&mut self, amount: f64, anchor: DVec2) -> bool {
        let changed = self.navigator.zoom_viewport(amount, anchor);
        self.navigated(changed)
    }

    /// Back to zoom 1.0 around the cursor.
    pub fn reset_zoom(&mut self) -> bool {
        let changed = self.navigator.reset_zoom();
        self.navigated(changed)
    }

    /// Centers the view on the image.
    pub fn reset_pan(&mut self) -> bool {
        let rect = self.surface.bounding_rect();
        let changed = self.navigator.reset_pan(&rect);
        self.navigated(changed)
    }

    /// Zooms to show the whole image and centers it.
    pub fn fit_image(&mut self) -> bool {
        let rect = self.surface.bounding_rect();
        let changed = self.navigator.fit(&rect);
        self.navigated(changed)
    }

    /// Moves the view by `delta` world units.
    pub fn pan(&mut self, delta: DVec2) -> bool {
        let changed = self.navigator.pan(delta);
        self.navigated(changed)
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.navigator.zoom()
    }

    /// Visible world rect.
    pub fn world_rect(&self) -> RectF {
        self.navigator.world_rect()
    }

    /// World to device transform.
    pub fn transform(&self) -> Transform2D {
        self.navigator.transform()
    }

    /// Current transform as pushed to overlays.
    pub fn screenspace(&self) -> Screenspace {
        self.navigator.screenspace()
    }

    /// Active interaction flags.
    pub fn interaction_state(&self) -> InteractionState {
        self.navigator.state()
    }

    /// The navigation state machine.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    // ------------------------------------------------------------------------
    // Background
    // ------------------------------------------------------------------------

    /// Fill for the area behind the image at the current zoom.
    pub fn background_fill(&mut self) -> &BackgroundFill {
        let zoom = self.navigator.zoom();
        self.background.fill(zoom)
    }

    /// Cycles to the next background style.
    pub fn next_background(&mut self) -> &BackgroundStyle {
        self.background.next_style()
    }

    /// Active background style.
    pub fn background_style(&self) -> &BackgroundStyle {
        self.background.style()
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Bindings in use.
    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.config.shortcuts
    }

    /// Replaces every binding.
    pub fn set_shortcuts(&mut self, shortcuts: ShortcutTable) {
        self.config.shortcuts = shortcuts;
    }

    /// Runs `event` through the pipeline.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventOutcome {
        let outcome = self.dispatch_event(event);
        self.notify_picked();
        outcome
    }

    fn forward(&self, event: &InputEvent) -> EventOutcome {
        let r = self
            .overlays
            .dispatch(event, &self.config.shortcuts, &self.image_bounds());
        EventOutcome {
            consumed: r.consumed,
            repaint: r.changed,
        }
    }

    fn dispatch_event(&mut self, event: &InputEvent) -> EventOutcome {
        match *event {
            InputEvent::ShortcutProbe { .. } => {
                let claimed = self.config.shortcuts.lookup_first(event).is_some();
                let forwarded = self.forward(event);
                EventOutcome {
                    consumed: claimed || forwarded.consumed,
                    repaint: forwarded.repaint,
                }
            }
            InputEvent::KeyPress { .. } | InputEvent::PointerPress { .. } => {
                let action = self.config.shortcuts.lookup_first(event);
                if let Some(action) = action.filter(|a| a.is_navigation()) {
                    self.run_action(action, event);
                    return EventOutcome::HANDLED;
                }
                let InputEvent::PointerPress { button, pos, .. } = *event else {
                    return self.forward(event);
                };
                self.navigator.set_cursor_pos(pos);
                let forwarded = self.forward(event);
                match action {
                    // a press outside the image starts no pick
                    Some(ShortcutAction::Pick | ShortcutAction::PickAreaStart)
                        if forwarded.consumed =>
                    {
                        self.navigator.begin(InteractionState::PICKING, button, pos);
                    }
                    Some(ShortcutAction::Unpick) => {
                        self.navigator.begin(InteractionState::UNPICKING, button, pos);
                    }
                    _ => {}
                }
                forwarded
            }
            InputEvent::PointerMove { pos, .. } => {
                if self.navigator.is_dragging() {
                    let changed = self.navigator.drag_to(pos);
                    return EventOutcome {
                        consumed: true,
                        repaint: self.navigated(changed),
                    };
                }
                self.navigator.set_cursor_pos(pos);
                self.forward(event)
            }
            InputEvent::PointerRelease { button, pos, .. } => {
                self.navigator.set_cursor_pos(pos);
                let released = self.navigator.release(button);
                let forwarded = self.forward(event);
                EventOutcome {
                    consumed: forwarded.consumed,
                    repaint: released || forwarded.repaint,
                }
            }
            InputEvent::Scroll { delta, pos, .. } => {
                let forwarded = self.forward(event);
                if forwarded.consumed {
                    return forwarded;
                }
                let changed = self.navigator.scroll(delta, pos);
                EventOutcome {
                    consumed: true,
                    repaint: self.navigated(changed) || forwarded.repaint,
                }
            }
            InputEvent::KeyRelease { .. } => self.forward(event),
        }
    }

    fn run_action(&mut self, action: ShortcutAction, event: &InputEvent) {
        debug!(?action, "shortcut");
        match action {
            ShortcutAction::ResetZoom => {
                self.reset_zoom();
            }
            ShortcutAction::PanPrimary | ShortcutAction::PanSecondary => {
                self.begin_drag(InteractionState::PANNING, event);
            }
            ShortcutAction::ZoomSecondary => {
                self.begin_drag(InteractionState::ZOOMING, event);
            }
            // rotate_90 only fails on angles that are not multiples of 90
            ShortcutAction::RotateCw => {
                let _ = self.rotate_90(-90, true);
            }
            ShortcutAction::RotateCcw => {
                let _ = self.rotate_90(90, true);
            }
            ShortcutAction::Clear => self.clear_image(),
            ShortcutAction::ResetPan => {
                self.reset_pan();
            }
            ShortcutAction::ChangeBackground => {
                self.next_background();
            }
            ShortcutAction::Pick
            | ShortcutAction::PickAreaStart
            | ShortcutAction::PickAreaExpand
            | ShortcutAction::Unpick
            | ShortcutAction::ShowCoordinatesA
            | ShortcutAction::ShowCoordinatesB => {}
        }
    }

    // Drags are released by their button, so key-bound pan/zoom is a no-op.
    fn begin_drag(&mut self, flag: InteractionState, event: &InputEvent) {
        if let InputEvent::PointerPress { button, pos, .. } = *event {
            self.navigator.begin(flag, button, pos);
        }
    }
}
