// SPDX-License-Identifier: GPL-3.0-only

//! Still image file used as a camera
//!
//! The file is decoded once on start and the same frame is returned for
//! every grab.

use crate::backends::camera::{CameraFrame, CaptureResult, FrameSource};
use crate::constants::file_formats;
use crate::errors::CaptureError;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Load an image file and convert it to a CameraFrame
///
/// Supports common image formats: PNG, JPEG, GIF, BMP, WebP
pub fn load_image_as_frame(path: &Path) -> CaptureResult<CameraFrame> {
    info!(path = %path.display(), "Loading image file");

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !file_formats::is_image_extension(extension) {
        return Err(CaptureError::Other(format!(
            "Unsupported image type '{}'",
            path.display()
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CaptureError::NotFound(path.display().to_string()),
        _ => CaptureError::from(e),
    })?;
    let img = image::load_from_memory(&bytes).map_err(|e| {
        CaptureError::ProcessingFailed(format!(
            "Failed to load image '{}': {}",
            path.display(),
            e
        ))
    })?;

    let frame = CameraFrame::from_rgba(img.to_rgba8());
    info!(width = frame.width, height = frame.height, "Image loaded successfully");
    Ok(frame)
}

/// Frame source backed by a still image on disk
pub struct FileSource {
    path: PathBuf,
    frame: Option<CameraFrame>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FileSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn start(&mut self) -> CaptureResult<()> {
        if self.frame.is_none() {
            self.frame = Some(load_image_as_frame(&self.path)?);
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.frame.take().is_some() {
            debug!(path = %self.path.display(), "File source stopped");
        }
    }

    fn is_started(&self) -> bool {
        self.frame.is_some()
    }

    fn grab_frame(&mut self) -> CaptureResult<CameraFrame> {
        let frame = self.frame.as_ref().ok_or(CaptureError::NotStarted)?;
        Ok(CameraFrame {
            captured_at: Instant::now(),
            ..frame.clone()
        })
    }
}
