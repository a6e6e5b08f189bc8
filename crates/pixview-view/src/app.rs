//! eframe/egui host around [`ImageViewport`].
//!
//! Translates egui input into [`InputEvent`]s, paints the background, the
//! image and the overlay commands, and hands file loads to the loader thread.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use egui::{Color32, ColorImage, FontId, Pos2, Rect, TextureHandle, TextureOptions};
use pixview_math::DVec2;
use tracing::{debug, info};

use crate::config::ViewportConfig;
use crate::event::{Input, InputEvent, Key, Modifier, Modifiers, PointerButton};
use crate::handler::LoaderHandler;
use crate::messages::{Generation, LoaderEvent, LoaderMsg};
use crate::paint::PaintCommand;
use crate::viewport::ImageViewport;
use crate::ViewResult;

/// egui reports wheel motion in points; one notch is about 50 points and 120
/// wheel units.
const WHEEL_UNITS_PER_POINT: f64 = 2.4;

/// Configuration for launching the viewer.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Viewport configuration.
    pub viewport: ViewportConfig,
    /// Verbosity level.
    pub verbose: u8,
}

/// Main viewer application.
pub struct ViewerApp {
    /// Sender for commands to the loader thread.
    tx: Sender<LoaderMsg>,
    /// Receiver for results from the loader thread.
    rx: Receiver<LoaderEvent>,
    /// Loader thread handle (Option for Drop).
    worker: Option<JoinHandle<()>>,

    viewport: ImageViewport,

    /// Uploaded image and the viewport generation it shows.
    image_texture: Option<(u64, TextureHandle)>,
    /// Uploaded background tile and its source.
    background_texture: Option<(Arc<ColorImage>, TextureHandle)>,

    /// Modifiers held last frame, to synthesize modifier key events.
    held: Modifiers,
    /// Generation counter for stale result rejection.
    generation: Generation,
    image_path: Option<PathBuf>,
    error: Option<String>,
}

impl ViewerApp {
    /// Creates the application and starts the loader thread.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        image_path: Option<PathBuf>,
        config: ViewerConfig,
    ) -> ViewResult<Self> {
        let viewport = ImageViewport::new(config.viewport)?;

        let (tx_to_worker, rx_in_worker) = channel();
        let (tx_to_ui, rx_from_worker) = channel();
        let worker = thread::spawn(move || {
            LoaderHandler::new(rx_in_worker, tx_to_ui).run();
        });

        let mut app = Self {
            tx: tx_to_worker,
            rx: rx_from_worker,
            worker: Some(worker),
            viewport,
            image_texture: None,
            background_texture: None,
            held: Modifiers::NONE,
            generation: 0,
            image_path: None,
            error: None,
        };

        if let Some(path) = image_path {
            app.request_load(path);
        }
        Ok(app)
    }

    fn send(&self, msg: LoaderMsg) {
        let _ = self.tx.send(msg);
    }

    /// Queues a decode; results of older requests are dropped.
    fn request_load(&mut self, path: PathBuf) {
        self.generation += 1;
        self.send(LoaderMsg::SyncGeneration(self.generation));
        self.send(LoaderMsg::Load(path));
    }

    /// Open file dialog and load selected image.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", pixview_io::supported_extensions())
            .add_filter("All files", &["*"])
            .pick_file()
        {
            self.request_load(path);
        }
    }

    /// Applies loader results. Returns true if any arrived.
    fn process_events(&mut self, ctx: &egui::Context) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.rx.try_recv() {
            had_events = true;
            if event.generation() < self.generation {
                debug!(generation = event.generation(), "dropping stale load");
                continue;
            }
            match event {
                LoaderEvent::Loaded { path, image, .. } => {
                    info!(path = %path.display(), "loaded {}x{}", image.width(), image.height());
                    self.viewport.set_image(image);
                    let title = format!(
                        "pixview - {}",
                        path.file_name().and_then(|n| n.to_str()).unwrap_or("Image")
                    );
                    ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
                    self.image_path = Some(path);
                    self.error = None;
                }
                LoaderEvent::Failed { error, .. } => {
                    self.error = Some(error);
                }
            }
        }
        had_events
    }

    /// Handle app-level keys. Returns true if should exit.
    fn handle_app_keys(&mut self, ctx: &egui::Context) -> bool {
        let (escape, open) = ctx.input(|i| {
            (i.key_pressed(egui::Key::Escape), i.key_pressed(egui::Key::O))
        });
        let held = self.held;
        let claimed = |viewport: &mut ImageViewport, key: Key| {
            viewport
                .handle_event(&InputEvent::ShortcutProbe {
                    input: Input::Key(key),
                    modifiers: held,
                })
                .consumed
        };

        if escape && !claimed(&mut self.viewport, Key::Escape) {
            return true;
        }
        if open && !claimed(&mut self.viewport, Key::Char('O')) {
            self.open_file_dialog();
        }
        false
    }

    /// Check for dropped files.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.request_load(path);
        }
    }

    /// Converts this frame's egui input into viewport events.
    fn collect_events(&mut self, ctx: &egui::Context, canvas: Rect, hovered: bool) -> Vec<InputEvent> {
        let local = |p: Pos2| DVec2::new((p.x - canvas.min.x) as f64, (p.y - canvas.min.y) as f64);
        let previous = self.held;

        let (held, out) = ctx.input(|i| {
            let held = to_modifiers(&i.modifiers);
            let mut out = modifier_transitions(previous, held);

            for event in &i.events {
                match event {
                    egui::Event::Key {
                        key,
                        pressed,
                        repeat: false,
                        modifiers,
                        ..
                    } => {
                        let Some(key) = to_key(*key) else { continue };
                        let modifiers = to_modifiers(modifiers);
                        out.push(if *pressed {
                            InputEvent::KeyPress { key, modifiers }
                        } else {
                            InputEvent::KeyRelease { key, modifiers }
                        });
                    }
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed,
                        modifiers,
                    } => {
                        let Some(button) = to_button(*button) else { continue };
                        let modifiers = to_modifiers(modifiers);
                        if *pressed {
                            if !canvas.contains(*pos) {
                                continue;
                            }
                            out.push(InputEvent::PointerPress {
                                button,
                                pos: local(*pos),
                                modifiers,
                            });
                        } else {
                            out.push(InputEvent::PointerRelease {
                                button,
                                pos: local(*pos),
                                modifiers,
                            });
                        }
                    }
                    egui::Event::PointerMoved(pos) => out.push(InputEvent::PointerMove {
                        pos: local(*pos),
                        modifiers: held,
                    }),
                    _ => {}
                }
            }

            if hovered && i.raw_scroll_delta.y != 0.0 {
                if let Some(pos) = i.pointer.hover_pos() {
                    out.push(InputEvent::Scroll {
                        delta: i.raw_scroll_delta.y as f64 * WHEEL_UNITS_PER_POINT,
                        pos: local(pos),
                        modifiers: held,
                    });
                }
            }
            (held, out)
        });

        self.held = held;
        out
    }

    /// Draw top control panel.
    fn draw_controls(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open").clicked() {
                    self.open_file_dialog();
                }
                ui.separator();

                if ui.button("Fit").on_hover_text("Fit image to window (double-click)").clicked() {
                    self.viewport.fit_image();
                }
                if ui.button("1:1").on_hover_text("Reset zoom (Home)").clicked() {
                    self.viewport.reset_zoom();
                }
                if ui.button("Center").on_hover_text("Center image (F)").clicked() {
                    self.viewport.reset_pan();
                }
                ui.separator();

                if ui.button("⟲").on_hover_text("Rotate counter-clockwise (Q)").clicked() {
                    let _ = self.viewport.rotate_90(90, true);
                }
                if ui.button("⟳").on_hover_text("Rotate clockwise (E)").clicked() {
                    let _ = self.viewport.rotate_90(-90, true);
                }
                ui.separator();

                let label = self.viewport.background_style().label.clone();
                if ui.button(label).on_hover_text("Next background (B)").clicked() {
                    self.viewport.next_background();
                }
                ui.separator();

                ui.label(format!("{}%", (self.viewport.zoom() * 100.0).round() as i32));
                if let Some(image) = self.viewport.image() {
                    ui.separator();
                    ui.label(format!("{}x{}", image.width(), image.height()));
                }
                if self.viewport.rotation() != 0 {
                    ui.label(format!("{}°", self.viewport.rotation()));
                }
            });
        });
    }

    /// Draw bottom hints panel.
    fn draw_hints(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("hints").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(region) = self.viewport.picked_region() {
                    ui.monospace(format!(
                        "[{:4},{:4}] {}x{}",
                        region.x, region.y, region.width, region.height
                    ));
                    ui.separator();
                }
                if let Some(err) = &self.error {
                    ui.colored_label(Color32::RED, err);
                    ui.separator();
                }
                ui.label(
                    "O: Open | Home: 1:1 | F: Center | Q/E: Rotate | B: Background | \
                     Del: Clear | Ctrl+Click: Pick | Alt+Shift: Coordinates | Esc: Exit",
                );
            });
        });
    }

    /// Draw main canvas.
    fn draw_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let available = ui.available_size();
                let (rect, response) =
                    ui.allocate_exact_size(available, egui::Sense::click_and_drag());

                self.viewport.resize(rect.width() as f64, rect.height() as f64);

                let mut repaint = false;
                for event in self.collect_events(ui.ctx(), rect, response.hovered()) {
                    repaint |= self.viewport.handle_event(&event).repaint;
                }
                if response.double_clicked() {
                    repaint |= self.viewport.fit_image();
                }

                let painter = ui.painter_at(rect);
                self.paint_background(ui.ctx(), &painter, rect);
                self.paint_image(ui.ctx(), &painter, rect);
                self.paint_overlays(&painter, rect);

                if repaint {
                    ui.ctx().request_repaint();
                }
            });
    }

    fn paint_background(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        let world = self.viewport.world_rect();
        let fill = self.viewport.background_fill().clone();
        painter.rect_filled(rect, 0.0, fill.color);

        let Some(tile) = fill.texture.clone() else {
            return;
        };
        let stale = self
            .background_texture
            .as_ref()
            .is_none_or(|(source, _)| !Arc::ptr_eq(source, &tile));
        if stale {
            let handle = ctx.load_texture(
                "pixview_background",
                (*tile).clone(),
                TextureOptions::LINEAR_REPEAT,
            );
            self.background_texture = Some((Arc::clone(&tile), handle));
        }
        if let Some((_, handle)) = &self.background_texture {
            let uv = tile_uv(&world, fill.tile_world_size());
            painter.image(handle.id(), rect, uv, Color32::WHITE);
        }
    }

    fn paint_image(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        let surface = self.viewport.surface();
        if !surface.is_visible() {
            return;
        }
        let generation = self.viewport.image_generation();
        let stale = self
            .image_texture
            .as_ref()
            .is_none_or(|(g, _)| *g != generation);
        if stale {
            let buffer = surface.current();
            let image = ColorImage::from_rgba_unmultiplied(
                [buffer.width() as usize, buffer.height() as usize],
                &buffer.to_rgba8(),
            );
            let handle = ctx.load_texture("pixview_image", image, TextureOptions::NEAREST);
            self.image_texture = Some((generation, handle));
        }

        let screen = self
            .viewport
            .screenspace()
            .to_screenspace(&surface.bounding_rect());
        if let Some((_, handle)) = &self.image_texture {
            painter.image(
                handle.id(),
                to_egui_rect(&screen, rect.min),
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    fn paint_overlays(&self, painter: &egui::Painter, rect: Rect) {
        let origin = rect.min;
        let at = |p: DVec2| Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32);
        for command in self.viewport.paint_overlays() {
            match command {
                PaintCommand::Rect { rect, stroke } => {
                    painter.rect_stroke(to_egui_rect(&rect, origin), 0.0, stroke);
                }
                PaintCommand::Point {
                    center,
                    radius,
                    color,
                } => {
                    painter.circle_filled(at(center), radius, color);
                }
                PaintCommand::Text {
                    pos,
                    anchor,
                    text,
                    color,
                    size,
                } => {
                    painter.text(at(pos), anchor, text, FontId::monospace(size), color);
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_events = self.process_events(ctx);

        self.handle_dropped_files(ctx);

        if self.handle_app_keys(ctx) {
            self.send(LoaderMsg::Close);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.draw_controls(ctx);
        self.draw_hints(ctx);
        self.draw_canvas(ctx);

        if had_events {
            ctx.request_repaint();
        }
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        // Signal loader to stop
        let _ = self.tx.send(LoaderMsg::Close);

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Texture coordinates of a repeating tile `size` world units wide that
/// covers `world`.
fn tile_uv(world: &pixview_math::RectF, size: f64) -> Rect {
    Rect::from_min_max(
        egui::pos2((world.x / size) as f32, (world.y / size) as f32),
        egui::pos2((world.right() / size) as f32, (world.bottom() / size) as f32),
    )
}

fn to_egui_rect(r: &pixview_math::RectF, origin: Pos2) -> Rect {
    Rect::from_min_size(
        Pos2::new(origin.x + r.x as f32, origin.y + r.y as f32),
        egui::vec2(r.width as f32, r.height as f32),
    )
}

fn to_modifiers(m: &egui::Modifiers) -> Modifiers {
    Modifiers {
        alt: m.alt,
        ctrl: m.ctrl,
        shift: m.shift,
        meta: m.mac_cmd,
    }
}

fn to_button(b: egui::PointerButton) -> Option<PointerButton> {
    match b {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn to_key(key: egui::Key) -> Option<Key> {
    use egui::Key as K;
    let mapped = match key {
        K::Home => Key::Home,
        K::End => Key::End,
        K::Delete => Key::Delete,
        K::Backspace => Key::Backspace,
        K::Escape => Key::Escape,
        K::Enter => Key::Enter,
        K::Space => Key::Space,
        K::Tab => Key::Tab,
        other => {
            let name = other.name();
            let mut chars = name.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::char(c)),
                (Some('F'), Some(_)) => name[1..].parse().ok().map(Key::Function),
                _ => None,
            };
        }
    };
    Some(mapped)
}

/// Press/release events for modifiers that changed between two frames.
///
/// Presses carry the new modifier set, releases the set held before.
fn modifier_transitions(previous: Modifiers, held: Modifiers) -> Vec<InputEvent> {
    let mut out = Vec::new();
    for (modifier, key) in [
        (Modifier::Alt, Key::Alt),
        (Modifier::Shift, Key::Shift),
        (Modifier::Control, Key::Control),
        (Modifier::Meta, Key::Meta),
    ] {
        match (previous.contains(modifier), held.contains(modifier)) {
            (false, true) => out.push(InputEvent::KeyPress {
                key,
                modifiers: held,
            }),
            (true, false) => out.push(InputEvent::KeyRelease {
                key,
                modifiers: previous,
            }),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(to_key(egui::Key::Home), Some(Key::Home));
        assert_eq!(to_key(egui::Key::Q), Some(Key::Char('Q')));
        assert_eq!(to_key(egui::Key::Num3), Some(Key::Char('3')));
        assert_eq!(to_key(egui::Key::F5), Some(Key::Function(5)));
        assert_eq!(to_key(egui::Key::ArrowLeft), None);
    }

    #[test]
    fn test_modifier_transitions() {
        let alt_shift = Modifiers::ALT.with(Modifier::Shift);
        let out = modifier_transitions(Modifiers::ALT, alt_shift);
        assert_eq!(
            out,
            vec![InputEvent::KeyPress {
                key: Key::Shift,
                modifiers: alt_shift
            }]
        );

        let out = modifier_transitions(alt_shift, Modifiers::NONE);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.modifiers() == alt_shift));
    }

    #[test]
    fn test_tile_uv_repeats_with_world() {
        let world = pixview_math::RectF::new(-32.0, 0.0, 128.0, 64.0);
        let uv = tile_uv(&world, 64.0);
        assert_eq!(uv.min, egui::pos2(-0.5, 0.0));
        assert_eq!(uv.max, egui::pos2(1.5, 1.0));
    }

    #[test]
    fn test_viewer_config_default() {
        let config = ViewerConfig::default();
        assert_eq!(config.verbose, 0);
        assert_eq!(config.viewport, ViewportConfig::default());
    }
}
