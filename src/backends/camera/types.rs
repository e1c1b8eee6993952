// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for frame sources

use crate::errors::CaptureError;
use image::RgbaImage;
use std::sync::Arc;
use std::time::Instant;

/// Result type for frame source operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// A single RGBA frame from a source
///
/// Pixel data is reference counted so a frame can be handed to the preview
/// and the photo pipeline without copying.
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels, `stride` bytes per row
    pub data: Arc<[u8]>,
    /// Row stride (bytes per row, may include padding)
    pub stride: u32,
    /// When the frame was grabbed
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap a tightly packed RGBA image
    pub fn from_rgba(image: RgbaImage) -> Self {
        let width = image.width();
        let height = image.height();
        Self {
            data: Arc::from(image.into_raw().into_boxed_slice()),
            width,
            height,
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Copy the frame into an owned image, dropping any row padding
    pub fn to_rgba_image(&self) -> CaptureResult<RgbaImage> {
        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;
        if stride < row_bytes || self.data.len() < stride * self.height as usize {
            return Err(CaptureError::ProcessingFailed(format!(
                "frame buffer too small for {}x{} (stride {}, {} bytes)",
                self.width,
                self.height,
                self.stride,
                self.data.len()
            )));
        }

        let pixels = if stride == row_bytes {
            self.data[..row_bytes * self.height as usize].to_vec()
        } else {
            let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
            for row in self.data.chunks(stride).take(self.height as usize) {
                packed.extend_from_slice(&row[..row_bytes]);
            }
            packed
        };

        RgbaImage::from_raw(self.width, self.height, pixels).ok_or_else(|| {
            CaptureError::ProcessingFailed("frame dimensions do not match buffer".into())
        })
    }
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_padded_rows_are_packed() {
        // 2x2 frame with 4 bytes of padding per row
        let mut data = vec![0u8; 12 * 2];
        data[0..4].copy_from_slice(&[1, 2, 3, 255]);
        data[12..16].copy_from_slice(&[9, 8, 7, 255]);
        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data.into_boxed_slice()),
            stride: 12,
            captured_at: Instant::now(),
        };

        let image = frame.to_rgba_image().unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
        assert_eq!(image.get_pixel(0, 1), &Rgba([9, 8, 7, 255]));
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            data: Arc::from(vec![0u8; 8].into_boxed_slice()),
            stride: 16,
            captured_at: Instant::now(),
        };
        assert!(matches!(
            frame.to_rgba_image(),
            Err(CaptureError::ProcessingFailed(_))
        ));
    }
}
