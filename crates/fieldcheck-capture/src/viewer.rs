//! Preview window.
//!
//! The viewer drains the session bus once per UI frame on the GUI thread.
//! `prepare-surface` binds the session's frame slot to the drawing area;
//! end-of-stream and errors only change the status line, since the session
//! has already stopped the pipeline by then.

use std::time::Duration;

use egui::{Align, Layout, Vec2};

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::event::{CaptureEvent, CaptureEventHandler};
use crate::session::{CaptureSession, FrameSlot};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Waiting,
    Playing { width: u32, height: u32 },
    Ended,
    Failed(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Waiting => write!(f, "Waiting for camera…"),
            Status::Playing { width, height } => write!(f, "Live {width}×{height}"),
            Status::Ended => write!(f, "Stream ended"),
            Status::Failed(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Texture-backed drawing area fed from a [`FrameSlot`].
#[derive(Default)]
struct DrawingArea {
    frames: Option<FrameSlot>,
    texture: Option<egui::TextureHandle>,
}

impl DrawingArea {
    fn bind(&mut self, frames: FrameSlot) {
        self.frames = Some(frames);
    }

    fn is_bound(&self) -> bool {
        self.frames.is_some()
    }

    fn paint(&mut self, ui: &mut egui::Ui) {
        if let Some(frame) = self.frames.as_ref().and_then(FrameSlot::take) {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [frame.width as usize, frame.height as usize],
                &frame.rgba,
            );
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture = Some(ui.ctx().load_texture(
                        "preview",
                        image,
                        egui::TextureOptions::LINEAR,
                    ))
                }
            }
        }

        match &self.texture {
            Some(texture) => {
                let size = fit_within(texture.size_vec2(), ui.available_size());
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                });
            }
            None => {
                ui.centered_and_justified(|ui| ui.weak("No video"));
            }
        }
    }
}

/// Largest size with the frame's aspect ratio that fits in `avail`.
fn fit_within(frame: Vec2, avail: Vec2) -> Vec2 {
    if frame.x <= 0.0 || frame.y <= 0.0 || avail.x <= 0.0 || avail.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (avail.x / frame.x).min(avail.y / frame.y);
    frame * scale
}

/// Viewer-side reaction to capture events.
struct ViewState {
    slot: FrameSlot,
    surface: DrawingArea,
    status: Status,
}

impl CaptureEventHandler for ViewState {
    fn on_event(&mut self, event: &CaptureEvent) {
        match event {
            CaptureEvent::PrepareSurface { width, height } => {
                if !self.surface.is_bound() {
                    self.surface.bind(self.slot.clone());
                }
                self.status = Status::Playing {
                    width: *width,
                    height: *height,
                };
            }
            CaptureEvent::EndOfStream => self.status = Status::Ended,
            CaptureEvent::Error { message, .. } => self.status = Status::Failed(message.clone()),
        }
    }
}

pub struct ViewerApp {
    session: CaptureSession,
    view: ViewState,
    frame_interval: Duration,
}

impl ViewerApp {
    pub fn new(session: CaptureSession, framerate: u32) -> Self {
        let slot = session.frames();
        Self {
            session,
            view: ViewState {
                slot,
                surface: DrawingArea::default(),
                status: Status::Waiting,
            },
            frame_interval: Duration::from_secs(1) / framerate.max(1),
        }
    }

    fn controls(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.view.status.to_string());
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                // Snapshot capture is not implemented; the button is inert.
                ui.add_enabled(false, egui::Button::new("Snap"))
                    .on_disabled_hover_text("Snapshots are not available");
            });
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.dispatch_pending(&mut self.view);

        egui::TopBottomPanel::bottom("controls")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(10.0))
            .show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| self.view.surface.paint(ui));

        if !self.session.is_stopped() {
            ctx.request_repaint_after(self.frame_interval);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        tracing::info!("viewer closed");
        self.session.stop();
    }
}

/// Open the preview window for `session` and block until it is closed.
pub fn run(session: CaptureSession, config: &CaptureConfig) -> Result<(), CaptureError> {
    let window = &config.window;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(window.title.clone())
            .with_inner_size([window.width as f32, window.height as f32]),
        centered: true,
        ..Default::default()
    };
    let framerate = config.framerate;

    eframe::run_native(
        &window.title,
        options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(session, framerate)))),
    )
    .map_err(|e| CaptureError::Ui(e.to_string()))
}
