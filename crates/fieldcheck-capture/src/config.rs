use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CaptureError;

/// Device node used when the requested one is missing.
pub const DEFAULT_DEVICE: &str = "/dev/video0";

/// Encoded image format written by the capture sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapFormat {
    #[default]
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
}

impl SnapFormat {
    /// GStreamer encoder element for this format.
    pub fn encoder(self) -> &'static str {
        match self {
            SnapFormat::Jpeg => "jpegenc",
            SnapFormat::Png => "pngenc",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SnapFormat::Jpeg => "jpg",
            SnapFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for SnapFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapFormat::Jpeg => write!(f, "jpeg"),
            SnapFormat::Png => write!(f, "png"),
        }
    }
}

impl std::str::FromStr for SnapFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(SnapFormat::Jpeg),
            "png" => Ok(SnapFormat::Png),
            other => Err(format!("unknown image format: {other}")),
        }
    }
}

/// Where frames come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    /// Camera node through `v4l2src`.
    #[default]
    V4l2,
    /// Synthetic colour bars, no device needed.
    Test,
}

impl std::str::FromStr for CaptureSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v4l2" => Ok(CaptureSource::V4l2),
            "test" => Ok(CaptureSource::Test),
            other => Err(format!("unknown capture source: {other}")),
        }
    }
}

/// Parse a `WIDTHxHEIGHT` string, e.g. `1280x720`.
pub fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width in {s:?}"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height in {s:?}"))?;
    if w == 0 || h == 0 {
        return Err(format!("resolution must be positive, got {s:?}"));
    }
    Ok((w, h))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CaptureConfigInput {
    pub source: Option<CaptureSource>,
    pub device: Option<String>,
    pub default_device: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub framerate: Option<u32>,
    pub format: Option<SnapFormat>,
    pub output: Option<String>,
    pub window: WindowConfigInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WindowConfigInput {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 660,
            height: 543,
            title: "fieldcheck webcam".into(),
        }
    }
}

/// Everything a capture session needs, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub source: CaptureSource,
    pub device: PathBuf,
    pub default_device: PathBuf,
    pub width: u32,
    pub height: u32,
    pub framerate: u32,
    pub format: SnapFormat,
    pub output: PathBuf,
    pub window: WindowConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let format = SnapFormat::default();
        Self {
            source: CaptureSource::default(),
            device: PathBuf::from(DEFAULT_DEVICE),
            default_device: PathBuf::from(DEFAULT_DEVICE),
            width: 1280,
            height: 720,
            framerate: 30,
            format,
            output: default_output(format),
            window: WindowConfig::default(),
        }
    }
}

fn default_output(format: SnapFormat) -> PathBuf {
    PathBuf::from(format!("cam.{}", format.extension()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn positive(name: &str, value: Option<u32>, fallback: u32) -> Result<u32, CaptureError> {
    match value {
        Some(0) => Err(CaptureError::InvalidConfig(format!(
            "{name} must be a positive integer"
        ))),
        Some(v) => Ok(v),
        None => Ok(fallback),
    }
}

impl CaptureConfigInput {
    pub fn resolve(self) -> Result<CaptureConfig, CaptureError> {
        let defaults = CaptureConfig::default();
        let format = self.format.unwrap_or(defaults.format);
        let window_defaults = WindowConfig::default();

        Ok(CaptureConfig {
            source: self.source.unwrap_or(defaults.source),
            device: non_empty(self.device)
                .map(PathBuf::from)
                .unwrap_or(defaults.device),
            default_device: non_empty(self.default_device)
                .map(PathBuf::from)
                .unwrap_or(defaults.default_device),
            width: positive("width", self.width, defaults.width)?,
            height: positive("height", self.height, defaults.height)?,
            framerate: positive("framerate", self.framerate, defaults.framerate)?,
            format,
            output: non_empty(self.output)
                .map(PathBuf::from)
                .unwrap_or_else(|| default_output(format)),
            window: WindowConfig {
                width: positive("window.width", self.window.width, window_defaults.width)?,
                height: positive("window.height", self.window.height, window_defaults.height)?,
                title: non_empty(self.window.title).unwrap_or(window_defaults.title),
            },
        })
    }

    pub fn from_toml_str(input: &str) -> Result<Self, CaptureError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        toml::from_str(input)
            .map_err(|e| CaptureError::InvalidConfig(format!("invalid config TOML: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, CaptureError> {
        let text = std::fs::read_to_string(path).map_err(|source| CaptureError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl CaptureConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, CaptureError> {
        CaptureConfigInput::from_toml_str(input)?.resolve()
    }
}
