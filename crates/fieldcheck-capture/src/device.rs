//! Capture device selection.

use std::path::{Path, PathBuf};

use crate::error::CaptureError;

/// Pick the device node to capture from.
///
/// The default node must exist, otherwise there is no webcam at all. A
/// missing `requested` node falls back to `default` with a warning.
pub fn resolve_device(requested: &Path, default: &Path) -> Result<PathBuf, CaptureError> {
    if !default.exists() {
        return Err(CaptureError::NoDefaultDevice(default.to_path_buf()));
    }
    if requested.exists() {
        Ok(requested.to_path_buf())
    } else {
        tracing::warn!(
            requested = %requested.display(),
            fallback = %default.display(),
            "capture device not detected, falling back to default camera"
        );
        Ok(default.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_request_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("video0");
        let requested = dir.path().join("video2");
        std::fs::write(&default, b"").unwrap();
        std::fs::write(&requested, b"").unwrap();

        assert_eq!(resolve_device(&requested, &default).unwrap(), requested);
    }

    #[test]
    fn missing_request_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("video0");
        std::fs::write(&default, b"").unwrap();

        let resolved = resolve_device(&dir.path().join("video7"), &default).unwrap();
        assert_eq!(resolved, default);
    }

    #[test]
    fn missing_default_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("video0");
        let requested = dir.path().join("video1");
        std::fs::write(&requested, b"").unwrap();

        match resolve_device(&requested, &default) {
            Err(CaptureError::NoDefaultDevice(path)) => assert_eq!(path, default),
            other => panic!("expected NoDefaultDevice, got {other:?}"),
        }
    }
}
