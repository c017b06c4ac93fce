//! Capture pipeline description.
//!
//! A description is three launch-syntax stages joined by ` ! `:
//!
//! ```text
//! v4l2src device=… ! video/x-raw,width=W,height=H,framerate=F/1 ! <sink>
//! ```
//!
//! The sink stage tees the raw frames into an image encoder that rewrites
//! the output file for every frame, and into the `preview` appsink that feeds
//! the viewer window.

use std::fmt;
use std::path::Path;

use crate::config::{CaptureConfig, CaptureSource, SnapFormat};

/// Separator between launch-syntax stages.
pub const STAGE_SEPARATOR: &str = " ! ";

/// Name of the appsink element that receives preview frames.
pub const PREVIEW_SINK: &str = "preview";

/// Source stage used for [`CaptureSource::Test`].
const TEST_SOURCE: &str = "videotestsrc is-live=true pattern=smpte";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDescription {
    source: String,
    format: String,
    sink: String,
}

impl PipelineDescription {
    pub fn new(
        device: &Path,
        width: u32,
        height: u32,
        framerate: u32,
        format: SnapFormat,
        output: &Path,
    ) -> Self {
        Self {
            source: format!("v4l2src device=\"{}\"", device.display()),
            format: format!("video/x-raw,width={width},height={height},framerate={framerate}/1"),
            sink: format!(
                "tee name=snap \
                 ! queue ! {encoder} ! multifilesink location=\"{output}\" \
                 snap. ! queue leaky=downstream max-size-buffers=2 \
                 ! videoconvert ! video/x-raw,format=RGBA \
                 ! appsink name={PREVIEW_SINK} max-buffers=1 drop=true sync=false",
                encoder = format.encoder(),
                output = output.display(),
            ),
        }
    }

    /// Description for `config`, capturing from `device`.
    pub fn from_config(device: &Path, config: &CaptureConfig) -> Self {
        let desc = Self::new(
            device,
            config.width,
            config.height,
            config.framerate,
            config.format,
            &config.output,
        );
        match config.source {
            CaptureSource::V4l2 => desc,
            CaptureSource::Test => desc.with_source(TEST_SOURCE),
        }
    }

    /// Replace the source stage, keeping format and sink.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn sink(&self) -> &str {
        &self.sink
    }
}

impl fmt::Display for PipelineDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{STAGE_SEPARATOR}{}{STAGE_SEPARATOR}{}",
            self.source, self.format, self.sink
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn describe() -> PipelineDescription {
        PipelineDescription::new(
            Path::new("/dev/video0"),
            1280,
            720,
            30,
            SnapFormat::Jpeg,
            Path::new("cam.jpg"),
        )
    }

    #[test]
    fn stages_in_order() {
        let desc = describe();
        assert_eq!(desc.source(), "v4l2src device=\"/dev/video0\"");
        assert_eq!(
            desc.format(),
            "video/x-raw,width=1280,height=720,framerate=30/1"
        );
        let text = desc.to_string();
        assert!(text.starts_with("v4l2src device=\"/dev/video0\" ! video/x-raw,width=1280"));
        assert!(text.contains("! tee name=snap"));
    }

    #[test]
    fn sink_encodes_to_output_file() {
        let desc = describe();
        assert!(desc.sink().contains("jpegenc ! multifilesink location=\"cam.jpg\""));
        assert!(desc.sink().contains("appsink name=preview"));

        let png = PipelineDescription::new(
            Path::new("/dev/video1"),
            640,
            480,
            15,
            SnapFormat::Png,
            Path::new("/tmp/out.png"),
        );
        assert!(png.sink().contains("pngenc ! multifilesink location=\"/tmp/out.png\""));
        assert!(png.format().ends_with("framerate=15/1"));
    }

    #[test]
    fn test_source_replaces_only_the_source() {
        let config = CaptureConfig {
            source: CaptureSource::Test,
            ..CaptureConfig::default()
        };
        let desc = PipelineDescription::from_config(&PathBuf::from("/dev/video0"), &config);
        assert_eq!(desc.source(), TEST_SOURCE);
        assert_eq!(desc.format(), describe().format());
        assert_eq!(desc.sink(), describe().sink());
    }
}
