// src/gui.rs
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use egui::{Color32, Pos2, Rect, Shape, Stroke, TextureHandle, TextureOptions, Vec2};

use crate::config::{AppConfig, GridStyle, StrokeStyle, SurfaceKind};
use crate::ecg::{
    BitmapSurface, DicomReader, DrawCommand, EcgError, LeadLayout, LeadMenu, Redraw,
    RenderOrchestrator, RenderSurface, RetainedScene, StrokeKind,
};
use crate::engine::DatasetLoader;
use crate::logging::EventLog;

/// The paint target picked by `render.surface`.
pub enum HostSurface {
    Vector(RetainedScene),
    Raster(BitmapSurface),
}

impl RenderSurface for HostSurface {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<(), EcgError> {
        match self {
            HostSurface::Vector(scene) => scene.present(commands),
            HostSurface::Raster(bitmap) => bitmap.present(commands),
        }
    }
}

// Everything the user can trigger in one frame.
enum UiAction {
    Open,
    Reload,
    Exit,
    SelectLead(LeadLayout),
    Drop(PathBuf),
    Resize(f32, f32),
}

pub struct EcgPlotApp {
    orchestrator: RenderOrchestrator<HostSurface>,
    loader: DatasetLoader<DicomReader>,
    menu: LeadMenu,
    style: GridStyle,
    log: Arc<dyn EventLog>,

    // last path handed to the loader, for Reload
    last_path: Option<PathBuf>,
    // last viewport forwarded to the orchestrator
    last_viewport: Option<(f32, f32)>,
    status: String,
    // set when the surface received a new frame
    dirty: bool,
    failure: Option<String>,
    texture: Option<(u64, TextureHandle)>,
}

impl EcgPlotApp {
    pub fn new(config: AppConfig, log: Arc<dyn EventLog>) -> Result<Self, EcgError> {
        let render = config.render;
        let lead = render.lead_layout()?;
        let style = render.style;
        let surface = match render.surface {
            SurfaceKind::Vector => HostSurface::Vector(RetainedScene::default()),
            SurfaceKind::Raster => HostSurface::Raster(BitmapSurface::new(style)),
        };
        Ok(Self {
            orchestrator: RenderOrchestrator::new(render, lead, surface, Arc::clone(&log)),
            loader: DatasetLoader::new(DicomReader),
            menu: LeadMenu::new(lead),
            style,
            log,
            last_path: None,
            last_viewport: None,
            status: "Open or drop a DICOM ECG file.".to_owned(),
            dirty: false,
            failure: None,
            texture: None,
        })
    }

    fn open(&mut self, path: PathBuf) {
        match self.loader.start(path.clone()) {
            Ok(()) => {
                self.log.debug(&format!("loading {}", path.display()));
                self.status = format!("Loading {}...", path.display());
                self.last_path = Some(path);
            }
            Err(err) => {
                self.log.log(err.severity(), &err.to_string());
                self.status = err.to_string();
            }
        }
    }

    fn poll_loader(&mut self) {
        let Some(outcome) = self.loader.poll() else {
            return;
        };
        match outcome.result {
            Err(err @ EcgError::LoaderFailed(_)) => self.report_failure(err.to_string()),
            result => {
                let redraw = self.orchestrator.on_load_result(&outcome.path, result);
                if redraw.is_ok() {
                    self.status = outcome.path.display().to_string();
                }
                self.note(redraw);
            }
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Open => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Dicom Files", &["dcm"])
                    .pick_file()
                {
                    self.open(path);
                }
            }
            UiAction::Reload => {
                if let Some(path) = self.last_path.clone() {
                    self.open(path);
                }
            }
            UiAction::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            UiAction::SelectLead(lead) => {
                if self.menu.select(lead) {
                    let redraw = self.orchestrator.on_lead_layout_changed(lead);
                    self.note(redraw);
                }
            }
            UiAction::Drop(path) => {
                if self.loader.is_loading() {
                    self.log.info(&format!("ignoring {} while loading", path.display()));
                } else if path.is_file() {
                    self.open(path);
                }
            }
            UiAction::Resize(width, height) => {
                if self.last_viewport == Some((width, height)) {
                    return;
                }
                self.last_viewport = Some((width, height));
                let redraw = self.orchestrator.on_viewport_changed(width, height);
                self.note(redraw);
            }
        }
    }

    // The orchestrator already logged failures; only the status line is left.
    fn note(&mut self, redraw: Result<Redraw, EcgError>) {
        match redraw {
            Ok(Redraw::GridOnly(lead)) => {
                self.status = format!("Lead layout {lead} is not implemented yet.");
                self.dirty = true;
            }
            Ok(Redraw::Presented { .. }) => self.dirty = true,
            Ok(Redraw::Unchanged | Redraw::Deferred) => {}
            Err(err) => self.status = err.to_string(),
        }
    }

    // Lead layout, decoded shape and grid cell size for the status bar.
    fn summary(&self) -> String {
        let mut parts = vec![self.menu.checked().label().to_owned()];
        if let Some(matrix) = self.orchestrator.matrix() {
            parts.push(format!(
                "{} ch x {} samples",
                matrix.channel_count(),
                matrix.sample_count()
            ));
        }
        if let Some(layout) = self.orchestrator.layout() {
            parts.push(format!("cell {:.1} px", layout.cell_size));
        }
        parts.join(" | ")
    }

    fn report_failure(&mut self, message: String) {
        self.log.fatal(&format!("unhandled failure: {message}"));
        self.failure = Some(message);
    }

    fn menu_bar(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let idle = !self.loader.is_loading();
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.add_enabled(idle, egui::Button::new("Open...")).clicked() {
                    actions.push(UiAction::Open);
                    ui.close_menu();
                }
                let can_reload = idle && self.last_path.is_some();
                if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                    actions.push(UiAction::Reload);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    actions.push(UiAction::Exit);
                    ui.close_menu();
                }
            });
            ui.menu_button("Layout", |ui| {
                for lead in LeadLayout::ALL {
                    if ui
                        .selectable_label(self.menu.is_checked(lead), lead.label())
                        .clicked()
                    {
                        actions.push(UiAction::SelectLead(lead));
                        ui.close_menu();
                    }
                }
            });
        });
    }

    fn paint(&mut self, ctx: &egui::Context, painter: &egui::Painter, origin: Pos2) {
        match self.orchestrator.surface() {
            HostSurface::Vector(scene) => {
                for command in scene.commands() {
                    paint_command(painter, origin, &self.style, command);
                }
            }
            HostSurface::Raster(bitmap) => {
                let (width, height) = bitmap.size();
                if width == 0 || height == 0 {
                    return;
                }
                let generation = bitmap.generation();
                let stale = self
                    .texture
                    .as_ref()
                    .map_or(true, |(seen, _)| *seen != generation);
                if stale {
                    let image = egui::ColorImage::from_rgb(
                        [width as usize, height as usize],
                        bitmap.pixels(),
                    );
                    match &mut self.texture {
                        Some((seen, handle)) => {
                            handle.set(image, TextureOptions::LINEAR);
                            *seen = generation;
                        }
                        None => {
                            let handle =
                                ctx.load_texture("ecg-raster", image, TextureOptions::LINEAR);
                            self.texture = Some((generation, handle));
                        }
                    }
                }
                if let Some((_, handle)) = &self.texture {
                    painter.image(
                        handle.id(),
                        Rect::from_min_size(origin, Vec2::new(width as f32, height as f32)),
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
            }
        }
    }

    fn failure_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.failure.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Oops! An error occured!")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.failure = None;
        }
    }
}

fn color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

fn stroke(style: StrokeStyle) -> Stroke {
    Stroke::new(style.width, color(style.color))
}

fn paint_command(painter: &egui::Painter, origin: Pos2, style: &GridStyle, command: &DrawCommand) {
    let at = |x: f32, y: f32| origin + Vec2::new(x, y);
    match command {
        DrawCommand::Clear { width, height } => {
            painter.rect_filled(
                Rect::from_min_size(origin, Vec2::new(*width, *height)),
                0.0,
                color(style.background),
            );
        }
        DrawCommand::Line(line) => {
            let pen = match line.kind {
                StrokeKind::Major => style.major,
                StrokeKind::Minor => style.minor,
                StrokeKind::Trace => style.trace,
            };
            painter.line_segment(
                [at(line.start.x, line.start.y), at(line.end.x, line.end.y)],
                stroke(pen),
            );
        }
        DrawCommand::Polyline(polyline) => {
            let points = polyline.points.iter().map(|p| at(p.x, p.y)).collect();
            painter.add(Shape::line(points, stroke(style.trace)));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown failure".to_owned()
    }
}

impl eframe::App for EcgPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        // 1. Drag & drop: first dropped file only
        if let Some(path) = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone())) {
            actions.push(UiAction::Drop(path));
        }

        // 2. Menus and status line
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar(ui, &mut actions));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.loader.is_loading() {
                    ui.spinner();
                }
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.summary());
                });
            });
        });

        // 3. Canvas: its size drives the grid
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                actions.push(UiAction::Resize(rect.width(), rect.height()));
                self.paint(ctx, &painter, rect.min);
            });

        // 4. Pipeline work; a failure here is reported, never fatal
        let handled = panic::catch_unwind(AssertUnwindSafe(|| {
            self.poll_loader();
            for action in actions {
                self.dispatch(ctx, action);
            }
        }));
        if let Err(payload) = handled {
            self.report_failure(panic_message(payload.as_ref()));
        }
        if std::mem::take(&mut self.dirty) {
            ctx.request_repaint();
        }

        self.failure_notice(ctx);

        if self.loader.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
