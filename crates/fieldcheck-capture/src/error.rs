use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no webcam detected: {} cannot be found", .0.display())]
    NoDefaultDevice(PathBuf),
    #[error("invalid capture config: {0}")]
    InvalidConfig(String),
    #[error("pipeline error: {0}")]
    Pipeline(String),
    #[error("viewer window failed: {0}")]
    Ui(String),
    #[error("failed to read config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<gst::glib::Error> for CaptureError {
    fn from(e: gst::glib::Error) -> Self {
        CaptureError::Pipeline(e.to_string())
    }
}

impl From<gst::StateChangeError> for CaptureError {
    fn from(e: gst::StateChangeError) -> Self {
        CaptureError::Pipeline(e.to_string())
    }
}
