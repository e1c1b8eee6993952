// SPDX-License-Identifier: GPL-3.0-only

//! Photo pipeline
//!
//! ```text
//! FrameSource → Capture → Crop 4:5 + Filter → PNG → Photo library
//!                                              │
//!                              (download) ─────┴──▶ Polaroid border → PNG file
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Capture**: grab one frame from the started source
//! 2. **Processing**: centre crop to the print aspect, apply the colour filter
//! 3. **Encoding**: PNG, on the blocking pool when called async
//! 4. **Polaroid**: white border and time caption, only for downloads

pub mod capture;
pub mod encoding;
pub mod filters;
pub mod polaroid;
pub mod processing;

pub use capture::PhotoCapture;
pub use encoding::{PhotoEncoder, download_file_name};
pub use filters::{ColorOp, apply_filter};
pub use polaroid::{caption_text, render_polaroid};
pub use processing::{PostProcessor, crop_to_aspect};

use crate::app::FilterType;
use chrono::{DateTime, Utc};
use image::RgbaImage;

/// A processed photo waiting to be handed to the board
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub image: RgbaImage,
    pub captured_at: DateTime<Utc>,
    /// Filter the image was processed with
    pub filter: FilterType,
}
