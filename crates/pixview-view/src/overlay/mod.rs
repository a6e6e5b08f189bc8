//! Screenspace overlays and the host that drives them.
//!
//! An overlay is an annotation drawn above the image in device pixels. It
//! reads the view transform and the image bounds but never mutates
//! navigation; it can only ask for a repaint through its [`EventResponse`].
//!
//! # Lifecycle
//!
//! | Trigger | Calls, per overlay in registration order |
//! |---------|-------------------------------------------|
//! | registration | `attach`, `on_navigation_changed`, `reload` |
//! | zoom / pan / resize | `on_navigation_changed`, `reload` |
//! | image set / cleared / rotated | `reload`, `on_image_changed` |
//! | input not consumed by navigation | `on_raw_event` |
//! | repaint | `paint` (visible overlays only) |
//!
//! `reload` must be cheap and idempotent: it may run before every repaint.
//!
//! # Implementing an overlay
//!
//! Embed an [`OverlayBase`] and implement the required methods:
//!
//! ```rust
//! use pixview_view::{
//!     EventResponse, ImageBounds, InputEvent, Overlay, OverlayBase, PaintCommand,
//!     ShortcutTable,
//! };
//! use pixview_math::RectF;
//!
//! #[derive(Debug, Default)]
//! struct Frame {
//!     base: OverlayBase,
//!     image: RectF,
//! }
//!
//! impl Overlay for Frame {
//!     fn name(&self) -> &str {
//!         "frame"
//!     }
//!     fn base(&self) -> &OverlayBase {
//!         &self.base
//!     }
//!     fn base_mut(&mut self) -> &mut OverlayBase {
//!         &mut self.base
//!     }
//!     fn reload(&mut self, image: &ImageBounds) {
//!         self.image = image.rect;
//!     }
//!     fn on_raw_event(&mut self, _: &InputEvent, _: &ShortcutTable, _: &ImageBounds) -> EventResponse {
//!         EventResponse::IGNORED
//!     }
//!     fn bounds_in_screenspace(&self) -> Option<RectF> {
//!         Some(self.base.screenspace.to_screenspace(&self.image))
//!     }
//!     fn paint(&self, out: &mut Vec<PaintCommand>) {
//!         if let Some(rect) = self.bounds_in_screenspace() {
//!             out.push(PaintCommand::Rect { rect, stroke: (1.0, egui::Color32::WHITE).into() });
//!         }
//!     }
//! }
//! ```

mod grid;
mod picker;

pub use grid::{CoordinateGridOverlay, DEFAULT_TILES, grid_points};
pub use picker::ColorPickerOverlay;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use pixview_core::{Error, Result};
use pixview_math::RectF;
use tracing::debug;

use crate::event::InputEvent;
use crate::paint::PaintCommand;
use crate::screenspace::Screenspace;
use crate::shortcut::ShortcutTable;

/// Shared handle to a registered overlay.
pub type OverlayHandle = Rc<RefCell<dyn Overlay>>;

/// Identity of one overlay host (one viewport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(u64);

impl HostId {
    /// A fresh id, never returned before in this process.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Image geometry pushed to overlays.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageBounds {
    /// World rect of the displayed surface
    pub rect: RectF,
    /// `false` while only the placeholder shows
    pub has_pixels: bool,
}

/// What an overlay did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// Later pipeline stages must not act on the event.
    pub consumed: bool,
    /// The overlay needs a repaint.
    pub changed: bool,
}

impl EventResponse {
    /// Not interested.
    pub const IGNORED: Self = Self {
        consumed: false,
        changed: false,
    };

    /// State changed, event still free for others.
    pub const CHANGED: Self = Self {
        consumed: false,
        changed: true,
    };

    /// State changed and the event is taken.
    pub const CONSUMED: Self = Self {
        consumed: true,
        changed: true,
    };

    /// Combines two responses.
    pub fn merge(self, other: Self) -> Self {
        Self {
            consumed: self.consumed || other.consumed,
            changed: self.changed || other.changed,
        }
    }
}

/// State every overlay carries.
#[derive(Debug, Clone, Default)]
pub struct OverlayBase {
    /// Last transform pushed by the host
    pub screenspace: Screenspace,
    /// Drawn at all
    pub visible: bool,
    host: Option<HostId>,
}

impl OverlayBase {
    /// Base with the given initial visibility.
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    /// Host this overlay is attached to.
    pub fn host(&self) -> Option<HostId> {
        self.host
    }
}

/// A screenspace annotation.
pub trait Overlay: fmt::Debug {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Shared state.
    fn base(&self) -> &OverlayBase;

    /// Shared state, mutable.
    fn base_mut(&mut self) -> &mut OverlayBase;

    /// Binds the overlay to `host`.
    ///
    /// Returns `Ok(false)` if already bound to the same host.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyAttached`] if bound to a different host.
    fn attach(&mut self, host: HostId) -> Result<bool> {
        match self.base().host {
            Some(current) if current == host => Ok(false),
            Some(_) => Err(Error::already_attached(self.name())),
            None => {
                self.base_mut().host = Some(host);
                Ok(true)
            }
        }
    }

    /// New view transform.
    fn on_navigation_changed(&mut self, screenspace: &Screenspace) {
        self.base_mut().screenspace = *screenspace;
    }

    /// Recomputes cached screenspace geometry.
    fn reload(&mut self, _image: &ImageBounds) {}

    /// The image was replaced, rotated or cleared. Runs after `reload`.
    fn on_image_changed(&mut self, _image: &ImageBounds) {}

    /// Input not consumed by navigation.
    fn on_raw_event(
        &mut self,
        event: &InputEvent,
        shortcuts: &ShortcutTable,
        image: &ImageBounds,
    ) -> EventResponse;

    /// Area touched by [`Overlay::paint`], device pixels.
    fn bounds_in_screenspace(&self) -> Option<RectF>;

    /// Appends drawing commands, device pixels.
    fn paint(&self, out: &mut Vec<PaintCommand>);

    /// Shows or hides the overlay.
    fn set_visible(&mut self, visible: bool) {
        self.base_mut().visible = visible;
    }

    /// `true` if drawn.
    fn is_visible(&self) -> bool {
        self.base().visible
    }
}

/// Ordered overlay list of one viewport.
pub struct OverlayHost {
    id: HostId,
    overlays: Vec<OverlayHandle>,
}

impl fmt::Debug for OverlayHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayHost")
            .field("id", &self.id)
            .field("overlays", &self.overlays.len())
            .finish()
    }
}

impl Default for OverlayHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayHost {
    /// Empty host with a fresh id.
    pub fn new() -> Self {
        Self {
            id: HostId::next(),
            overlays: Vec::new(),
        }
    }

    /// This host's id.
    pub fn id(&self) -> HostId {
        self.id
    }

    /// Registered overlays, in order.
    pub fn overlays(&self) -> &[OverlayHandle] {
        &self.overlays
    }

    /// Number of overlays.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    /// `true` if none are registered.
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// `true` if `overlay` is registered here.
    pub fn contains(&self, overlay: &OverlayHandle) -> bool {
        self.overlays
            .iter()
            .any(|o| std::ptr::addr_eq(Rc::as_ptr(o), Rc::as_ptr(overlay)))
    }

    /// Appends `overlay` and brings it up to date.
    ///
    /// Returns `Ok(false)` if it was already registered.
    pub fn add(
        &mut self,
        overlay: OverlayHandle,
        screenspace: &Screenspace,
        image: &ImageBounds,
    ) -> Result<bool> {
        if self.contains(&overlay) {
            return Ok(false);
        }
        {
            let mut o = overlay.borrow_mut();
            o.attach(self.id)?;
            o.on_navigation_changed(screenspace);
            o.reload(image);
            debug!(overlay = o.name(), index = self.overlays.len(), "overlay registered");
        }
        self.overlays.push(overlay);
        Ok(true)
    }

    /// Pushes a new transform to every overlay and reloads it.
    pub fn navigation_changed(&self, screenspace: &Screenspace, image: &ImageBounds) {
        for overlay in &self.overlays {
            let mut o = overlay.borrow_mut();
            o.on_navigation_changed(screenspace);
            o.reload(image);
        }
    }

    /// Reloads every overlay, then notifies it of the new image.
    pub fn image_changed(&self, image: &ImageBounds) {
        for overlay in &self.overlays {
            let mut o = overlay.borrow_mut();
            o.reload(image);
            o.on_image_changed(image);
        }
    }

    /// Forwards `event` to every overlay; the responses are merged.
    pub fn dispatch(
        &self,
        event: &InputEvent,
        shortcuts: &ShortcutTable,
        image: &ImageBounds,
    ) -> EventResponse {
        self.overlays.iter().fold(EventResponse::IGNORED, |acc, overlay| {
            acc.merge(overlay.borrow_mut().on_raw_event(event, shortcuts, image))
        })
    }

    /// Paint commands of visible overlays, in registration order.
    pub fn paint(&self, out: &mut Vec<PaintCommand>) {
        for overlay in &self.overlays {
            let o = overlay.borrow();
            if o.is_visible() {
                o.paint(out);
            }
        }
    }

    /// Union of the screenspace bounds of visible overlays.
    pub fn bounds_in_screenspace(&self) -> Option<RectF> {
        self.overlays
            .iter()
            .filter_map(|o| {
                let o = o.borrow();
                if o.is_visible() {
                    o.bounds_in_screenspace()
                } else {
                    None
                }
            })
            .reduce(|a, b| a.united(&b))
    }
}
