//! # pixview-view
//!
//! Embeddable pan/zoom image viewport with screenspace overlays, plus an
//! eframe viewer built on top of it.
//!
//! Features:
//! - Anchor-stable zoom, pan and fit with a configurable zoom range
//! - 16-bit RGBA image surface with quarter-turn rotation
//! - Background styles with cached dot-grid tiles
//! - Overlay plugins (coordinate grid, color picker) in screen pixels
//! - Configurable shortcut table with exact / contains-all / contains-any
//!   modifier matching
//! - Background loader thread for the viewer
//!
//! # Quick Start
//!
//! ```rust
//! use pixview_core::Rgba16Buffer;
//! use pixview_math::DVec2;
//! use pixview_view::{ImageViewport, InputEvent, Modifiers, ViewportConfig};
//!
//! let mut viewport = ImageViewport::new(ViewportConfig::default()).unwrap();
//! viewport.resize(800.0, 600.0);
//! viewport.set_image(Rgba16Buffer::filled(64, 64, [65535, 0, 0, 65535]));
//!
//! // wheel up around the view center zooms in
//! let outcome = viewport.handle_event(&InputEvent::Scroll {
//!     delta: 120.0,
//!     pos: DVec2::new(400.0, 300.0),
//!     modifiers: Modifiers::NONE,
//! });
//! assert!(outcome.repaint);
//! assert!(viewport.zoom() > 1.0);
//! ```
//!
//! Running the viewer:
//!
//! ```ignore
//! use pixview_view::{run, ViewerConfig};
//! use std::path::PathBuf;
//!
//! let exit_code = run(Some(PathBuf::from("plate.exr")), ViewerConfig::default());
//! ```
//!
//! # Default Shortcuts
//!
//! | Input | Action |
//! |-------|--------|
//! | `Home` | Reset zoom to 1:1 |
//! | `F` | Center image |
//! | `Q` / `E` | Rotate counter-clockwise / clockwise |
//! | `B` | Next background style |
//! | `Delete` | Clear image |
//! | `Alt` + drag, middle drag | Pan |
//! | `Alt` + middle drag | Zoom |
//! | Wheel | Zoom around pointer |
//! | `Ctrl` + click | Pick pixel |
//! | `Ctrl+Shift` + drag | Pick area |
//! | `Ctrl` + right click | Clear pick |
//! | `Alt+Shift` (hold) | Coordinate grid, wheel changes density |
//!
//! The viewer adds `O` (open), double-click (fit) and `Esc` (exit).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod app;
mod background;
mod config;
mod error;
mod event;
mod handler;
mod messages;
mod navigation;
mod overlay;
mod paint;
mod screenspace;
mod shortcut;
mod surface;
mod viewport;

pub use app::{ViewerApp, ViewerConfig};
pub use background::{
    BackgroundFill, BackgroundRenderer, BackgroundStyle, BackgroundStyleLibrary, DEFAULT_STYLE,
    TILE_RESOLUTION, TILE_SCALE, TexturePattern, generate_brush, should_draw_texture,
};
pub use config::{DEFAULT_VIEWPORT, NavigationConfig, SurfaceAnchor, ViewportConfig};
pub use error::{ViewError, ViewResult};
pub use event::{Input, InputEvent, Key, Modifier, Modifiers, PointerButton};
pub use handler::LoaderHandler;
pub use messages::{Generation, LoaderEvent, LoaderMsg};
pub use navigation::{InteractionState, Navigator};
pub use overlay::{
    ColorPickerOverlay, CoordinateGridOverlay, DEFAULT_TILES, EventResponse, HostId, ImageBounds,
    Overlay, OverlayBase, OverlayHandle, OverlayHost, grid_points,
};
pub use paint::PaintCommand;
pub use screenspace::Screenspace;
pub use shortcut::{ModifierMatching, Shortcut, ShortcutAction, ShortcutTable};
pub use surface::{ImageSurface, PLACEHOLDER_SIZE};
pub use viewport::{EventOutcome, ImageViewport};

use std::path::PathBuf;

use tracing::{debug, error, info};

/// Run the viewer with an optional initial file.
///
/// Creates an eframe window sized from the viewport configuration and enters
/// the event loop. Returns the exit code once the window closes: 0 for
/// success, 1 for an invalid configuration or a windowing error.
pub fn run(path: Option<PathBuf>, config: ViewerConfig) -> i32 {
    if let Err(e) = config.viewport.validate() {
        error!("invalid viewport config: {e}");
        return 1;
    }

    let title = path
        .as_ref()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(|n| format!("pixview - {n}"))
        .unwrap_or_else(|| "pixview".into());

    match &path {
        Some(p) => info!(path = %p.display(), "starting viewer"),
        None => info!("starting empty viewer"),
    }

    let [width, height] = config.viewport.initial_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            debug!("window created, initializing app");
            Ok(Box::new(ViewerApp::new(cc, path, config)?))
        }),
    );

    match result {
        Ok(()) => {
            debug!("viewer exited normally");
            0
        }
        Err(e) => {
            error!("viewer error: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_exits_early() {
        let mut config = ViewerConfig::default();
        config.viewport.navigation.zoom_min = 10.0;
        config.viewport.navigation.zoom_max = 1.0;
        assert_eq!(run(None, config), 1);
    }

    #[test]
    fn test_reexports_compose() {
        let table = ShortcutTable::default();
        let event = InputEvent::KeyPress {
            key: Key::Home,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(table.lookup_first(&event), Some(ShortcutAction::ResetZoom));
    }
}
