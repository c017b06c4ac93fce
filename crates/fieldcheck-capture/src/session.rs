//! Capture session: owns the running pipeline and its preview frame slot.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use gst::prelude::*;

use crate::config::{CaptureConfig, CaptureSource};
use crate::device::resolve_device;
use crate::error::CaptureError;
use crate::event::{prepare_surface_message, CaptureEvent, CaptureEventHandler};
use crate::pipeline::{PipelineDescription, PREVIEW_SINK};

/// One tightly packed RGBA preview frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PreviewFrame {
    /// Copy `height` rows of `stride` bytes, dropping any row padding.
    pub fn from_strided(width: u32, height: u32, stride: usize, data: &[u8]) -> Option<Self> {
        let row = width as usize * 4;
        if stride < row || data.len() < stride * (height as usize).saturating_sub(1) + row {
            return None;
        }
        let mut rgba = Vec::with_capacity(row * height as usize);
        for y in 0..height as usize {
            rgba.extend_from_slice(&data[y * stride..y * stride + row]);
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Latest preview frame, shared between the streaming thread and the viewer.
///
/// This is the surface handle the viewer binds to its drawing area once the
/// pipeline announces `prepare-surface`.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<Mutex<Option<PreviewFrame>>>,
}

impl FrameSlot {
    pub fn store(&self, frame: PreviewFrame) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(frame);
        }
    }

    /// Take the newest frame not yet taken.
    pub fn take(&self) -> Option<PreviewFrame> {
        self.inner.lock().ok().and_then(|mut slot| slot.take())
    }
}

pub struct CaptureSession {
    device: PathBuf,
    description: PipelineDescription,
    pipeline: gst::Pipeline,
    frames: FrameSlot,
    stopped: bool,
}

impl CaptureSession {
    /// Resolve the device, build the pipeline for `config` and start it.
    pub fn open(config: &CaptureConfig) -> Result<Self, CaptureError> {
        let device = match config.source {
            CaptureSource::V4l2 => resolve_device(&config.device, &config.default_device)?,
            CaptureSource::Test => config.device.clone(),
        };
        let description = PipelineDescription::from_config(&device, config);
        Self::launch(device, description)
    }

    /// Start an already-built description.
    pub fn launch(device: PathBuf, description: PipelineDescription) -> Result<Self, CaptureError> {
        gst::init()?;

        let launch_line = description.to_string();
        tracing::info!(device = %device.display(), pipeline = %launch_line, "starting capture pipeline");

        let pipeline = gst::parse::launch(&launch_line)?
            .downcast::<gst::Pipeline>()
            .map_err(|_| CaptureError::Pipeline("launch line did not produce a pipeline".into()))?;

        let preview = pipeline
            .by_name(PREVIEW_SINK)
            .and_then(|element| element.downcast::<gst_app::AppSink>().ok())
            .ok_or_else(|| CaptureError::Pipeline(format!("no appsink named {PREVIEW_SINK}")))?;

        let frames = FrameSlot::default();
        install_preview(&preview, frames.clone());

        if let Err(e) = pipeline.set_state(gst::State::Playing) {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(e.into());
        }

        Ok(Self {
            device,
            description,
            pipeline,
            frames,
            stopped: false,
        })
    }

    /// Device the pipeline captures from, after fallback.
    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn description(&self) -> &PipelineDescription {
        &self.description
    }

    /// Handle to the preview frames, for binding to a drawing surface.
    pub fn frames(&self) -> FrameSlot {
        self.frames.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Set the pipeline to `Null`. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        match self.pipeline.set_state(gst::State::Null) {
            Ok(_) => tracing::info!("capture pipeline stopped"),
            Err(e) => tracing::warn!(error = %e, "failed to stop capture pipeline"),
        }
    }

    /// Drain pending bus messages without blocking.
    ///
    /// End-of-stream and errors stop the pipeline before the handler sees
    /// them. Returns the number of events dispatched.
    pub fn dispatch_pending(&mut self, handler: &mut dyn CaptureEventHandler) -> usize {
        let Some(bus) = self.pipeline.bus() else {
            return 0;
        };
        let mut dispatched = 0;
        while let Some(msg) = bus.pop() {
            let Some(event) = CaptureEvent::from_message(&msg) else {
                continue;
            };
            self.react(&event);
            handler.on_event(&event);
            dispatched += 1;
        }
        dispatched
    }

    fn react(&mut self, event: &CaptureEvent) {
        match event {
            CaptureEvent::EndOfStream => {
                tracing::info!("end of stream");
                self.stop();
            }
            CaptureEvent::Error { message, debug: debug_info } => {
                tracing::error!(error = %message, debug = ?debug_info, "capture pipeline error");
                self.stop();
            }
            CaptureEvent::PrepareSurface { width, height } => {
                tracing::debug!(width, height, "preview surface ready");
            }
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Copy every preview sample into `frames`; announce the surface on the first.
fn install_preview(appsink: &gst_app::AppSink, frames: FrameSlot) {
    let announced = AtomicBool::new(false);
    appsink.set_callbacks(
        gst_app::AppSinkCallbacks::builder()
            .new_sample(move |sink| {
                let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                let caps = sample.caps().ok_or(gst::FlowError::Error)?;
                let info =
                    gst_video::VideoInfo::from_caps(caps).map_err(|_| gst::FlowError::Error)?;
                let buffer = sample.buffer().ok_or(gst::FlowError::Error)?;
                let map = buffer.map_readable().map_err(|_| gst::FlowError::Error)?;

                let stride = info.stride()[0] as usize;
                let frame = PreviewFrame::from_strided(info.width(), info.height(), stride, &map)
                    .ok_or(gst::FlowError::Error)?;
                frames.store(frame);

                if !announced.swap(true, Ordering::SeqCst) {
                    let msg = prepare_surface_message(sink, info.width(), info.height());
                    if sink.post_message(msg).is_err() {
                        tracing::warn!("failed to post prepare-surface message");
                    }
                }
                Ok(gst::FlowSuccess::Ok)
            })
            .build(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_rows_are_repacked() {
        // 2x2 RGBA with 4 bytes of padding per row.
        let data: Vec<u8> = vec![
            1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0, //
            3, 3, 3, 3, 4, 4, 4, 4, 0, 0, 0, 0,
        ];
        let frame = PreviewFrame::from_strided(2, 2, 12, &data).unwrap();
        assert_eq!(frame.rgba.len(), 16);
        assert_eq!(&frame.rgba[..8], &[1, 1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(&frame.rgba[8..], &[3, 3, 3, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert!(PreviewFrame::from_strided(2, 2, 8, &[0; 12]).is_none());
        assert!(PreviewFrame::from_strided(2, 1, 4, &[0; 8]).is_none());
    }

    #[test]
    fn last_row_needs_no_padding() {
        let frame = PreviewFrame::from_strided(1, 2, 8, &[0; 12]).unwrap();
        assert_eq!(frame.rgba.len(), 8);
    }

    #[test]
    fn slot_hands_out_each_frame_once() {
        let slot = FrameSlot::default();
        assert!(slot.take().is_none());
        let frame = PreviewFrame {
            width: 1,
            height: 1,
            rgba: vec![9, 9, 9, 9],
        };
        slot.clone().store(frame.clone());
        assert_eq!(slot.take(), Some(frame));
        assert!(slot.take().is_none());
    }

    #[test]
    fn missing_default_device_produces_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = CaptureConfig {
            device: dir.path().join("video3"),
            default_device: dir.path().join("video0"),
            ..CaptureConfig::default()
        };
        assert!(matches!(
            CaptureSession::open(&config),
            Err(CaptureError::NoDefaultDevice(_))
        ));
    }
}
