//! Webcam capture with a live preview window.
//!
//! - **Config**: [`CaptureConfig`], loaded from TOML and/or CLI flags
//! - **Device**: default-camera check and fallback ([`resolve_device`])
//! - **Pipeline**: launch-line description ([`PipelineDescription`])
//! - **Session**: running pipeline, bus-to-[`CaptureEvent`] dispatch
//! - **Viewer**: eframe window that binds the preview surface

pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod session;
pub mod viewer;

pub use config::{CaptureConfig, CaptureConfigInput, CaptureSource, SnapFormat, DEFAULT_DEVICE};
pub use device::resolve_device;
pub use error::CaptureError;
pub use event::{CaptureEvent, CaptureEventHandler};
pub use pipeline::{PipelineDescription, PREVIEW_SINK, STAGE_SEPARATOR};
pub use session::{CaptureSession, FrameSlot, PreviewFrame};
pub use viewer::ViewerApp;
