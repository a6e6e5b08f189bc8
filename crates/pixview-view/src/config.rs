//! Viewport configuration.
//!
//! [`ViewportConfig`] gathers every tunable of the engine. It serializes to
//! RON so a host can ship or persist its own defaults:
//!
//! ```rust
//! use pixview_view::ViewportConfig;
//!
//! let cfg = ViewportConfig::from_ron_str("(navigation: (zoom_max: 8.0))").unwrap();
//! assert_eq!(cfg.navigation.zoom_max, 8.0);
//! assert_eq!(cfg.navigation.zoom_min, 0.1);
//! ```
//!
//! Missing fields take their defaults. [`ViewportConfig::validate`] rejects
//! values the navigation cannot work with.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shortcut::ShortcutTable;
use crate::{ViewError, ViewResult};

/// Default device size before the host reports one.
pub const DEFAULT_VIEWPORT: [f64; 2] = [1280.0, 720.0];

/// Decimals an f64 zoom factor can meaningfully carry.
const MAX_ZOOM_PRECISION: u32 = 15;

/// Zoom and pan tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Smallest accepted zoom factor.
    pub zoom_min: f64,
    /// Largest accepted zoom factor.
    pub zoom_max: f64,
    /// Decimals kept when rounding a new zoom factor.
    pub zoom_precision: u32,
    /// Drag-zoom amount per device pixel.
    pub drag_zoom_sensitivity: f64,
    /// Wheel zoom exponent per wheel unit: `amount = 2^(delta * factor)`.
    pub wheel_zoom_factor: f64,
    /// Subtracted from the world rect size to keep it strictly inside the device.
    pub scene_rect_epsilon: f64,
    /// Share of the device used by "fit to window".
    pub fit_margin: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.1,
            zoom_max: 20.0,
            zoom_precision: 6,
            drag_zoom_sensitivity: 0.01,
            wheel_zoom_factor: 0.001,
            scene_rect_epsilon: 0.5,
            fit_margin: 0.95,
        }
    }
}

/// Where the image sits in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceAnchor {
    /// Top-left corner at the world origin: the image covers `0,0 - w,h`.
    #[default]
    TopLeft,
    /// Image centered on the world origin.
    Centered,
}

/// Complete viewport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Zoom and pan tunables
    pub navigation: NavigationConfig,
    /// Input bindings
    pub shortcuts: ShortcutTable,
    /// Image placement in world space
    pub anchor: SurfaceAnchor,
    /// Device size used until the first resize
    pub initial_size: [f64; 2],
    /// Show the checkerboard placeholder when no image is set
    pub placeholder_visible: bool,
    /// Label of the initial background style, library default if `None`
    pub background: Option<String>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationConfig::default(),
            shortcuts: ShortcutTable::default(),
            anchor: SurfaceAnchor::default(),
            initial_size: DEFAULT_VIEWPORT,
            placeholder_visible: false,
            background: None,
        }
    }
}

impl ViewportConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(s: &str) -> ViewResult<Self> {
        let cfg: Self = ron::from_str(s).map_err(|e| ViewError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Pretty RON representation.
    pub fn to_ron_string(&self) -> ViewResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ViewError::config(e.to_string()))
    }

    /// Reads a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ViewResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading viewport config");
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text).map_err(|e| match e {
            ViewError::Config(msg) => ViewError::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Writes a RON file, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ViewResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Platform config location, e.g. `~/.config/pixview/viewport.ron`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pixview").join("viewport.ron"))
    }

    /// Config from [`ViewportConfig::default_path`], defaults if absent or invalid.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Rejects values navigation cannot honor.
    pub fn validate(&self) -> ViewResult<()> {
        let nav = &self.navigation;
        if !(nav.zoom_min.is_finite() && nav.zoom_min > 0.0) {
            return Err(ViewError::config(format!(
                "zoom_min must be positive, got {}",
                nav.zoom_min
            )));
        }
        if !(nav.zoom_max.is_finite() && nav.zoom_max > nav.zoom_min) {
            return Err(ViewError::config(format!(
                "zoom_max ({}) must be greater than zoom_min ({})",
                nav.zoom_max, nav.zoom_min
            )));
        }
        if !(1.0 >= nav.zoom_min && 1.0 <= nav.zoom_max) {
            return Err(ViewError::config("zoom range must contain 1.0"));
        }
        if nav.zoom_precision > MAX_ZOOM_PRECISION {
            return Err(ViewError::config(format!(
                "zoom_precision must be at most {MAX_ZOOM_PRECISION}, got {}",
                nav.zoom_precision
            )));
        }
        if !(nav.fit_margin > 0.0 && nav.fit_margin <= 1.0) {
            return Err(ViewError::config(format!(
                "fit_margin must be in (0, 1], got {}",
                nav.fit_margin
            )));
        }
        if nav.scene_rect_epsilon < 0.0 || !nav.scene_rect_epsilon.is_finite() {
            return Err(ViewError::config("scene_rect_epsilon must be >= 0"));
        }
        if self.initial_size.iter().any(|&v| !(v.is_finite() && v > 0.0)) {
            return Err(ViewError::config("initial_size must be positive"));
        }
        Ok(())
    }
}
