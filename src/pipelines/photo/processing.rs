// SPDX-License-Identifier: GPL-3.0-only

//! Post-processing for captured frames
//!
//! Turns a raw RGBA frame into the picture that goes on the print: a centre
//! crop to the polaroid aspect ratio, then the selected colour filter.

use super::filters::apply_filter;
use crate::app::FilterType;
use crate::backends::camera::{CameraFrame, CaptureResult};
use crate::constants::polaroid;
use image::RgbaImage;
use tracing::debug;

/// Post-processor for photo frames
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    filter: FilterType,
}

impl PostProcessor {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Crop and filter a frame
    pub fn process(&self, frame: &CameraFrame) -> CaptureResult<RgbaImage> {
        let rgba = frame.to_rgba_image()?;
        let mut image = crop_to_aspect(&rgba, polaroid::ASPECT_WIDTH, polaroid::ASPECT_HEIGHT);
        apply_filter(&mut image, self.filter);

        debug!(
            source_width = frame.width,
            source_height = frame.height,
            width = image.width(),
            height = image.height(),
            filter = self.filter.display_name(),
            "Frame processed"
        );
        Ok(image)
    }
}

/// Largest centred region of `image` with the given aspect ratio
pub fn crop_to_aspect(image: &RgbaImage, aspect_w: u32, aspect_h: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || aspect_w == 0 || aspect_h == 0 {
        return image.clone();
    }

    let (w64, h64) = (width as u64, height as u64);
    let (crop_w, crop_h) = if w64 * aspect_h as u64 > h64 * aspect_w as u64 {
        // Too wide: keep full height
        ((h64 * aspect_w as u64 / aspect_h as u64) as u32, height)
    } else {
        (width, (w64 * aspect_h as u64 / aspect_w as u64) as u32)
    };
    let crop_w = crop_w.max(1);
    let crop_h = crop_h.max(1);

    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;
    image::imageops::crop_imm(image, x, y, crop_w, crop_h).to_image()
}
