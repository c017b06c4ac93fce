//! Webcam viewer.
//!
//! Opens the camera, writes every frame to the output image and shows a live
//! preview until the window is closed. Exits immediately when no default
//! camera node exists.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldcheck_capture::config::parse_resolution;
use fieldcheck_capture::{
    viewer, CaptureConfigInput, CaptureError, CaptureSession, CaptureSource, SnapFormat,
};

#[derive(Parser, Debug)]
#[command(name = "fieldcheck-cam", about = "Webcam capture with live preview")]
struct Cli {
    /// TOML config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Capture device node.
    #[arg(long)]
    device: Option<String>,

    /// Capture resolution as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_resolution)]
    resolution: Option<(u32, u32)>,

    /// Frames per second.
    #[arg(long)]
    framerate: Option<u32>,

    /// Output image format: jpeg or png.
    #[arg(long)]
    format: Option<SnapFormat>,

    /// Output image path (default: cam.<ext>).
    #[arg(long)]
    output: Option<String>,

    /// Frame source: v4l2 or test.
    #[arg(long)]
    source: Option<CaptureSource>,
}

impl Cli {
    fn overlay(self, mut input: CaptureConfigInput) -> CaptureConfigInput {
        if self.device.is_some() {
            input.device = self.device;
        }
        if let Some((w, h)) = self.resolution {
            input.width = Some(w);
            input.height = Some(h);
        }
        if self.framerate.is_some() {
            input.framerate = self.framerate;
        }
        if self.format.is_some() {
            input.format = self.format;
        }
        if self.output.is_some() {
            input.output = self.output;
        }
        if self.source.is_some() {
            input.source = self.source;
        }
        input
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut cli = Cli::parse();
    let input = match cli.config.take() {
        Some(path) => CaptureConfigInput::load(&path)?,
        None => CaptureConfigInput::default(),
    };
    let config = cli.overlay(input).resolve()?;

    let session = match CaptureSession::open(&config) {
        Ok(session) => session,
        Err(e @ CaptureError::NoDefaultDevice(_)) => {
            eprintln!("{e}\nThe program is now exiting.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        device = %session.device().display(),
        output = %config.output.display(),
        "capture running"
    );
    viewer::run(session, &config)?;
    Ok(())
}
