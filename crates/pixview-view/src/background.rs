//! Background styles and the cached fill behind the image.
//!
//! A [`BackgroundStyle`] is an immutable value: two colors, an optional tile
//! pattern, and the zoom range in which the pattern shows. The
//! [`BackgroundStyleLibrary`] is an ordered list of styles owned by the
//! viewport; "next style" cycles through it.
//!
//! [`BackgroundRenderer`] turns the current style into a [`BackgroundFill`].
//! Tile generation is expensive, so fills are cached per
//! `(style, draw_texture)` pair and only rebuilt after a style change or an
//! explicit [`BackgroundRenderer::invalidate`].
//!
//! # Default library
//!
//! | Label | Primary | Secondary | Dots |
//! |-------|---------|-----------|------|
//! | Light | 240,240,238 | 200,200,200 | no |
//! | Light Grid of Dots | 240,240,238 | 200,200,200 | yes |
//! | Mid Grey | 125,125,125 | 100,100,100 | no |
//! | Black Grid of Dots (default) | 0,0,0 | 30,30,30 | yes |
//! | Black | 0,0,0 | 30,30,30 | no |
//! | Dark Grid of Dots | 25,25,25 | 18,18,18 | yes |

use std::collections::HashMap;
use std::sync::Arc;

use egui::{Color32, ColorImage};
use tracing::debug;

/// Side of a generated pattern tile, in texels.
pub const TILE_RESOLUTION: usize = 1024;

/// World units per texel when a tile is drawn.
pub const TILE_SCALE: f64 = 0.05;

const DOT_RADIUS: f64 = 50.0;
const DOT_FOCAL_RADIUS: f64 = 44.0;

/// Label of the style selected when none is configured.
pub const DEFAULT_STYLE: &str = "Black Grid of Dots";

/// Tileable pattern drawn over the primary color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexturePattern {
    /// One soft dot of the secondary color per tile.
    DotGrid,
}

/// One background look.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundStyle {
    /// Display name, unique within a library
    pub label: String,
    /// Fill color
    pub primary: Color32,
    /// Pattern color
    pub secondary: Color32,
    /// Pattern, `None` for a flat fill
    pub texture: Option<TexturePattern>,
    /// Zoom range in which the pattern is drawn; `None` bounds are open.
    pub texture_zoom_range: (Option<f64>, Option<f64>),
}

impl BackgroundStyle {
    /// Flat style.
    pub fn flat(label: impl Into<String>, primary: Color32, secondary: Color32) -> Self {
        Self {
            label: label.into(),
            primary,
            secondary,
            texture: None,
            texture_zoom_range: (Some(0.3), None),
        }
    }

    /// Style with a dot grid.
    pub fn dotted(label: impl Into<String>, primary: Color32, secondary: Color32) -> Self {
        Self {
            texture: Some(TexturePattern::DotGrid),
            ..Self::flat(label, primary, secondary)
        }
    }
}

/// `true` if `style` has a pattern and `zoom` lies in its visibility range.
pub fn should_draw_texture(style: &BackgroundStyle, zoom: f64) -> bool {
    if style.texture.is_none() {
        return false;
    }
    let (min, max) = style.texture_zoom_range;
    min.is_none_or(|min| zoom >= min) && max.is_none_or(|max| zoom <= max)
}

/// Ordered, cyclable list of styles.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundStyleLibrary {
    styles: Vec<BackgroundStyle>,
    default_index: usize,
}

impl Default for BackgroundStyleLibrary {
    fn default() -> Self {
        let light = Color32::from_rgb(240, 240, 238);
        let light_dot = Color32::from_rgb(200, 200, 200);
        let black = Color32::from_rgb(0, 0, 0);
        let black_dot = Color32::from_rgb(30, 30, 30);

        let styles = vec![
            BackgroundStyle::flat("Light", light, light_dot),
            BackgroundStyle::dotted("Light Grid of Dots", light, light_dot),
            BackgroundStyle::flat(
                "Mid Grey",
                Color32::from_rgb(125, 125, 125),
                Color32::from_rgb(100, 100, 100),
            ),
            BackgroundStyle::dotted(DEFAULT_STYLE, black, black_dot),
            BackgroundStyle::flat("Black", black, black_dot),
            BackgroundStyle::dotted(
                "Dark Grid of Dots",
                Color32::from_rgb(25, 25, 25),
                Color32::from_rgb(18, 18, 18),
            ),
        ];
        Self {
            styles,
            default_index: 3,
        }
    }
}

impl BackgroundStyleLibrary {
    /// Library over `styles`, the first one being the default.
    ///
    /// Returns `None` for an empty list.
    pub fn new(styles: Vec<BackgroundStyle>) -> Option<Self> {
        (!styles.is_empty()).then_some(Self {
            styles,
            default_index: 0,
        })
    }

    /// Makes the style labelled `label` the default. Returns `false` if absent.
    pub fn set_default(&mut self, label: &str) -> bool {
        match self.index_of(label) {
            Some(i) => {
                self.default_index = i;
                true
            }
            None => false,
        }
    }

    /// Index of the style labelled `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.styles.iter().position(|s| s.label == label)
    }

    /// Index of the default style.
    pub fn default_index(&self) -> usize {
        self.default_index
    }

    /// Style at `index`, wrapping around.
    pub fn get(&self, index: usize) -> &BackgroundStyle {
        &self.styles[index % self.styles.len()]
    }

    /// Index after `index`, wrapping around.
    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.styles.len()
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Always `false`: a library holds at least one style.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// All styles in order.
    pub fn styles(&self) -> &[BackgroundStyle] {
        &self.styles
    }
}

/// What the host paints behind the image.
#[derive(Debug, Clone)]
pub struct BackgroundFill {
    /// Flat fill color
    pub color: Color32,
    /// Tile to repeat over the fill, already composited on `color`
    pub texture: Option<Arc<ColorImage>>,
    /// World units per texel of `texture`
    pub scale: f64,
}

impl BackgroundFill {
    /// World size of one tile.
    pub fn tile_world_size(&self) -> f64 {
        TILE_RESOLUTION as f64 * self.scale
    }
}

/// Current style plus a fill cache.
#[derive(Debug)]
pub struct BackgroundRenderer {
    library: BackgroundStyleLibrary,
    current: usize,
    cache: HashMap<(usize, bool), BackgroundFill>,
    generated: usize,
}

impl BackgroundRenderer {
    /// Renderer starting on the library's default style.
    pub fn new(library: BackgroundStyleLibrary) -> Self {
        let current = library.default_index();
        Self {
            library,
            current,
            cache: HashMap::new(),
            generated: 0,
        }
    }

    /// The style library.
    pub fn library(&self) -> &BackgroundStyleLibrary {
        &self.library
    }

    /// Active style.
    pub fn style(&self) -> &BackgroundStyle {
        self.library.get(self.current)
    }

    /// Index of the active style.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Selects the style labelled `label`. Returns `false` if absent.
    pub fn select(&mut self, label: &str) -> bool {
        match self.library.index_of(label) {
            Some(i) => {
                self.current = i;
                self.cache.clear();
                true
            }
            None => false,
        }
    }

    /// Cycles to the next style and drops cached fills.
    pub fn next_style(&mut self) -> &BackgroundStyle {
        self.current = self.library.next(self.current);
        self.cache.clear();
        debug!(style = %self.style().label, "background style changed");
        self.style()
    }

    /// Drops cached fills; the next [`BackgroundRenderer::fill`] regenerates.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Number of fills generated so far.
    pub fn generated_count(&self) -> usize {
        self.generated
    }

    /// Fill for the active style at `zoom`.
    pub fn fill(&mut self, zoom: f64) -> &BackgroundFill {
        let draw_texture = should_draw_texture(self.style(), zoom);
        let key = (self.current, draw_texture);
        if !self.cache.contains_key(&key) {
            let fill = generate_brush(self.style(), draw_texture);
            self.generated += 1;
            self.cache.insert(key, fill);
        }
        &self.cache[&key]
    }
}

/// Builds the fill for `style`; the pattern is only generated if `draw_texture`.
pub fn generate_brush(style: &BackgroundStyle, draw_texture: bool) -> BackgroundFill {
    let texture = match style.texture {
        Some(TexturePattern::DotGrid) if draw_texture => {
            Some(Arc::new(dot_tile(style.primary, style.secondary)))
        }
        _ => None,
    };
    BackgroundFill {
        color: style.primary,
        texture,
        scale: TILE_SCALE,
    }
}

fn mix(a: Color32, b: Color32, t: f64) -> Color32 {
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// One dot centered in a `TILE_RESOLUTION` tile: solid `dot` up to the focal
/// radius, fading into `fill` at the dot radius.
fn dot_tile(fill: Color32, dot: Color32) -> ColorImage {
    let center = TILE_RESOLUTION as f64 / 2.0;
    let mut image = ColorImage::new([TILE_RESOLUTION, TILE_RESOLUTION], fill);
    let lo = (center - DOT_RADIUS).floor() as usize;
    let hi = (center + DOT_RADIUS).ceil() as usize;

    for y in lo..hi {
        for x in lo..hi {
            let dx = x as f64 + 0.5 - center;
            let dy = y as f64 + 0.5 - center;
            let r = (dx * dx + dy * dy).sqrt();
            if r >= DOT_RADIUS {
                continue;
            }
            let t = ((r - DOT_FOCAL_RADIUS) / (DOT_RADIUS - DOT_FOCAL_RADIUS)).clamp(0.0, 1.0);
            image.pixels[y * TILE_RESOLUTION + x] = mix(dot, fill, t);
        }
    }
    image
}
