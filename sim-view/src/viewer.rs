//! Interactive 2D n-body viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`ParticleSystem`] plus the
//! settings it was built from, and implements [`eframe::App`] to step,
//! render and control the simulation through an egui UI.

use eframe::App;
use nbody_sim_core::{
    ChamberBox, Color, Field, Particle, ParticleSystem, RandomSampler, RenderSink, RenderStyle,
    SimConfig, SimError, Vector2,
    render::{CircleDraw, TriangleDraw},
};

/// Smallest on-screen radius of a body, in points.
const MIN_SCREEN_RADIUS: f32 = 1.0;

/// Reflecting box around the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChamberSettings {
    pub restitution: f64,
}

/// Everything needed to (re)build the simulation.
///
/// ### Fields
/// - `cfg` - Core simulation configuration.
/// - `particles` - Number of orbiting bodies seeded on reset.
/// - `center_mass` - Mass of the fixed central anchor.
/// - `dt` - Fixed step passed to `simulate` each frame (also the field's step).
/// - `chamber` - Optional reflecting box spanning the canvas.
/// - `field` - Optional downward field strength.
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub cfg: SimConfig,
    pub particles: usize,
    pub center_mass: f64,
    pub dt: f64,
    pub chamber: Option<ChamberSettings>,
    pub field: Option<f64>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            cfg: SimConfig::default(),
            particles: 200,
            center_mass: 1e6,
            dt: 0.005,
            chamber: None,
            field: None,
        }
    }
}

/// Replaces the system's effectors with those requested in `settings`.
///
/// The field is built with `settings.dt`, so this must run again whenever
/// the step size changes.
fn install_effectors(system: &mut ParticleSystem, settings: &ViewerSettings) {
    let cfg = *system.config();
    system.clear_effectors();

    if let Some(chamber) = settings.chamber {
        system.add_effector(
            ChamberBox::new(0.0, 0.0, cfg.width, cfg.height).with_restitution(chamber.restitution),
        );
    }
    if let Some(strength) = settings.field {
        system.add_effector(Field::uniform(settings.dt, Vector2::new(0.0, strength)));
    }
}

/// Builds a seeded system with the effectors requested in `settings`.
fn build_system(settings: &ViewerSettings) -> Result<ParticleSystem, SimError> {
    let mut system = ParticleSystem::new(settings.cfg)?;
    install_effectors(&mut system, settings);
    system.emit_scenario(settings.particles, settings.center_mass)?;
    Ok(system)
}

/// Maps the pixel canvas of the simulation onto the central panel.
///
/// Both spaces are y-down, so there is no axis flip: world coordinates are
/// taken relative to the canvas centre, scaled by `zoom`, offset by `pan`
/// and centred inside the panel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Camera {
    zoom: f32,
    pan: egui::Vec2,
    origin: Vector2,
}

impl Camera {
    fn new(cfg: &SimConfig) -> Self {
        Self {
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            origin: Vector2::new(cfg.width / 2.0, cfg.height / 2.0),
        }
    }

    fn world_to_screen(&self, p: Vector2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let local = p - self.origin;
        egui::pos2(
            center.x + local.x as f32 * self.zoom + self.pan.x,
            center.y + local.y as f32 * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Camera::world_to_screen`], up to rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vector2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (p.y - center.y - self.pan.y) / self.zoom;
        self.origin + Vector2::new(x as f64, y as f64)
    }
}

/// [`RenderSink`] that paints onto an egui panel.
struct EguiSink<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    camera: &'a Camera,
}

fn to_color32(color: Color, alpha: f64) -> egui::Color32 {
    let [r, g, b, a] = color.to_rgba8(alpha);
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

impl RenderSink for EguiSink<'_> {
    fn fill_circle(&mut self, circle: &CircleDraw) {
        let center = self.camera.world_to_screen(circle.center, self.rect);
        let radius = (circle.radius as f32 * self.camera.zoom).max(MIN_SCREEN_RADIUS);
        self.painter
            .circle_filled(center, radius, to_color32(circle.fill, circle.alpha));
    }

    fn fill_triangle(&mut self, triangle: &TriangleDraw) {
        let points = triangle
            .vertices
            .iter()
            .map(|&v| self.camera.world_to_screen(v, self.rect))
            .collect();
        self.painter.add(egui::Shape::convex_polygon(
            points,
            to_color32(triangle.fill, triangle.alpha),
            egui::Stroke::NONE,
        ));
    }
}

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle keyboard shortcuts and panel widgets.
/// 2. Record the frame time and, unless paused, advance by `settings.dt`.
/// 3. Render the particles through an [`EguiSink`].
///
/// ### Fields
/// - `system` - The running simulation.
/// - `settings` - What `reset` rebuilds the simulation from.
/// - `sampler` - Colour source for bodies emitted by clicking.
/// - `camera` - Pan/zoom of the central panel.
/// - `emit_mass` - Mass of bodies emitted by clicking.
/// - `last_error` - Most recent rejected action, shown in the status bar.
pub struct Viewer {
    system: ParticleSystem,
    settings: ViewerSettings,
    sampler: RandomSampler,
    camera: Camera,
    emit_mass: f64,
    last_error: Option<String>,
}

impl Viewer {
    /// Creates a viewer running the orbit-disk scenario described by `settings`.
    pub fn new(settings: ViewerSettings) -> Result<Self, SimError> {
        let system = build_system(&settings)?;
        // Offset the seed so click colours don't mirror the scenario's.
        let sampler = match settings.cfg.seed {
            Some(seed) => RandomSampler::seeded(seed.wrapping_add(1)),
            None => RandomSampler::from_entropy(),
        };

        Ok(Self {
            system,
            camera: Camera::new(&settings.cfg),
            settings,
            sampler,
            emit_mass: 100.0,
            last_error: None,
        })
    }

    pub fn particle_count(&self) -> usize {
        self.system.len()
    }

    /// Rebuilds the scenario from the current settings.
    ///
    /// Pause state, phase toggles and render style carry over. On failure the
    /// running system is kept and the error is shown in the status bar.
    fn reset(&mut self) {
        match build_system(&self.settings) {
            Ok(mut system) => {
                system.set_paused(self.system.is_paused());
                system.disable_devour = self.system.disable_devour;
                system.disable_gravitation = self.system.disable_gravitation;
                system.set_render_style(self.system.render_style());
                self.camera.origin = Vector2::new(
                    self.settings.cfg.width / 2.0,
                    self.settings.cfg.height / 2.0,
                );
                self.system = system;
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Removes every particle, effectors stay.
    fn clear(&mut self) {
        self.system.clear();
    }

    /// Changes the step size, rebuilding the field so it integrates with
    /// the same `dt` as the system.
    fn set_dt(&mut self, dt: f64) {
        if dt != self.settings.dt {
            self.settings.dt = dt;
            install_effectors(&mut self.system, &self.settings);
        }
    }

    /// Advances exactly one step, even while paused.
    fn step_once(&mut self) {
        let paused = self.system.is_paused();
        self.system.set_paused(false);
        self.system.simulate(self.settings.dt);
        self.system.set_paused(paused);
    }

    /// Emits a random-coloured body at rest at a world position.
    fn emit_at(&mut self, position: Vector2) {
        let cfg = self.system.config();
        let particle = Particle::new(
            position,
            Vector2::ZERO,
            Color::random(&mut self.sampler),
            self.emit_mass,
        )
        .with_bounds(cfg.width, cfg.height);

        if let Err(e) = self.system.emit(particle) {
            self.last_error = Some(e.to_string());
        }
    }

    /// Space toggles pause, `T` switches the render style.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (space, t) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::T),
            )
        });
        if space {
            self.system.toggle_pause();
        }
        if t {
            self.system.switch_render_style();
        }
    }

    /// Helper to draw a labeled `f64` [`egui::DragValue`].
    fn labeled_drag_f64(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: std::ops::RangeInclusive<f64>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, style, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.system.is_paused() { "▶ Run" } else { "⏸ Pause" })
                    .clicked()
                {
                    self.system.toggle_pause();
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                let mut style = self.system.render_style();
                ui.selectable_value(&mut style, RenderStyle::PointCloud, "● Points");
                ui.selectable_value(&mut style, RenderStyle::Triangle, "▲ Triangles");
                self.system.set_render_style(style);

                ui.separator();
                ui.add(egui::Slider::new(&mut self.camera.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (counts, mass, frame timing).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let timer = self.system.frame_timer();
                ui.label(format!("{:.1} fps", timer.framerate()));
                ui.label(format!("frame = {:.2} ms", timer.interval()));
                ui.separator();
                ui.label(format!("steps = {}", self.system.steps()));
                ui.label(format!("total mass = {:.1}", self.system.total_mass()));
                ui.label(format!("particles = {}", self.system.len()));
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the right-hand panel for live toggles and reset parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Simulation");

                ui.separator();
                ui.checkbox(&mut self.system.disable_devour, "disable devour");
                ui.checkbox(&mut self.system.disable_gravitation, "disable gravitation");
                let mut dt = self.settings.dt;
                Self::labeled_drag_f64(ui, "dt:", &mut dt, 0.0001..=0.1, 0.0005);
                self.set_dt(dt);
                Self::labeled_drag_f64(ui, "click mass:", &mut self.emit_mass, 1.0..=1e6, 1.0);

                ui.separator();
                ui.label("Applied on reset");
                ui.horizontal(|ui| {
                    ui.label("particles:");
                    ui.add(egui::DragValue::new(&mut self.settings.particles).range(0..=5000));
                });
                Self::labeled_drag_f64(
                    ui,
                    "center mass:",
                    &mut self.settings.center_mass,
                    1.0..=1e9,
                    100.0,
                );
                Self::labeled_drag_f64(
                    ui,
                    "G:",
                    &mut self.settings.cfg.gravitational_constant,
                    0.0..=100.0,
                    0.01,
                );
                Self::labeled_drag_f64(
                    ui,
                    "roche k:",
                    &mut self.settings.cfg.roche_coefficient,
                    0.0..=4.0,
                    0.01,
                );

                ui.separator();
                if ui.button("Apply & reset").clicked() {
                    self.reset();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.settings.cfg = SimConfig::default();
                }
            });
    }

    /// Builds the central panel where particles are drawn and emitted.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.camera.pan += response.drag_delta();
            }

            if response.clicked()
                && let Some(pointer) = response.hover_pos()
            {
                let world = self.camera.screen_to_world(pointer, rect);
                self.emit_at(world);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.camera.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.camera.zoom = (self.camera.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.camera.world_to_screen(world_before, rect);
                self.camera.pan += pointer_screen - screen_after;
            }

            // Canvas outline.
            let cfg = self.system.config();
            let corners = [
                Vector2::new(0.0, 0.0),
                Vector2::new(cfg.width, 0.0),
                Vector2::new(cfg.width, cfg.height),
                Vector2::new(0.0, cfg.height),
            ];
            let outline = corners
                .iter()
                .map(|&c| self.camera.world_to_screen(c, rect))
                .collect::<Vec<_>>();
            painter.add(egui::Shape::closed_line(
                outline,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
            ));

            let mut sink = EguiSink {
                painter: &painter,
                rect,
                camera: &self.camera,
            };
            self.system.render(&mut sink);

            if !self.system.is_paused() {
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback: input, one simulation step, then all panels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        let now_ms = ctx.input(|i| i.time) * 1000.0;
        self.system.record_frame(now_ms);
        self.system.simulate(self.settings.dt);

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
