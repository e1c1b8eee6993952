// SPDX-License-Identifier: GPL-3.0-only

//! Async photo encoding
//!
//! Photos are always stored and exported as PNG. Encoding and disk writes
//! run on the blocking pool so the board stays responsive.

use crate::errors::StorageError;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name for an exported polaroid
pub fn download_file_name(captured_at_ms: i64) -> String {
    format!("polaroid-{}.png", captured_at_ms)
}

/// PNG encoder for captured and exported photos
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoEncoder;

impl PhotoEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode an image as PNG on the current thread
    pub fn encode_png(&self, image: &RgbaImage) -> Result<Vec<u8>, StorageError> {
        let mut buffer = Vec::new();

        image
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .map_err(|e| StorageError::Image(format!("PNG encoding failed: {}", e)))?;

        debug!(
            width = image.width(),
            height = image.height(),
            size = buffer.len(),
            "PNG encoded"
        );
        Ok(buffer)
    }

    /// Encode an image asynchronously
    pub async fn encode(&self, image: RgbaImage) -> Result<Vec<u8>, StorageError> {
        let encoder = *self;
        tokio::task::spawn_blocking(move || encoder.encode_png(&image))
            .await
            .map_err(|e| StorageError::Image(format!("Encoding task error: {}", e)))?
    }

    /// Write encoded bytes to `output_dir/file_name`, creating the directory
    pub async fn save(
        &self,
        data: Vec<u8>,
        output_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, StorageError> {
        let filepath = output_dir.join(file_name);
        info!(path = %filepath.display(), "Saving photo");

        let dir = output_dir.to_path_buf();
        let target = filepath.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)?;
            std::fs::write(&target, &data)?;
            Ok::<_, StorageError>(())
        })
        .await
        .map_err(|e| StorageError::Io(format!("Save task error: {}", e)))??;

        info!(path = %filepath.display(), "Photo saved successfully");
        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_download_name_uses_millis() {
        assert_eq!(download_file_name(1700000000123), "polaroid-1700000000123.png");
    }

    #[test]
    fn test_png_decodes_back() {
        let image = RgbaImage::from_pixel(4, 5, Rgba([1, 2, 3, 255]));
        let png = PhotoEncoder::new().encode_png(&image).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let encoder = PhotoEncoder::new();

        let png = encoder
            .encode(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])))
            .await
            .unwrap();
        let path = encoder.save(png, &out, "x.png").await.unwrap();

        assert_eq!(path, out.join("x.png"));
        assert!(path.exists());
    }
}
