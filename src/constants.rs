// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application directory name under the platform config/data/picture dirs
pub const APP_DIR_NAME: &str = "polaroid-booth";

/// Default key the photo collection is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "polaroid-photos";

/// Subdirectory of the data dir holding captured images
pub const PHOTOS_SUBDIR: &str = "photos";

/// How long the camera spends "printing" a photo before handing it over
pub const PRINT_DURATION: Duration = Duration::from_millis(2000);

/// Board layout defaults, in canvas units
pub mod layout {
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Rendered polaroid: 256 wide, 4:5 image plus border and caption strip
    pub const PHOTO_WIDTH: f32 = 256.0;
    pub const PHOTO_HEIGHT: f32 = 320.0;

    pub const TRASH_WIDTH: f32 = 80.0;
    pub const TRASH_HEIGHT: f32 = 96.0;
    /// Distance of the trash from the right and bottom canvas edges
    pub const TRASH_INSET: f32 = 40.0;
    /// Extra distance around the trash that counts as hovering while dragging
    pub const TRASH_HOVER_MARGIN: f32 = 50.0;

    /// New photos land near the camera in the bottom-left corner
    pub const CAPTURE_ANCHOR_X: f32 = 56.0;
    /// Measured up from the bottom edge
    pub const CAPTURE_ANCHOR_BOTTOM_OFFSET: f32 = 300.0;
    pub const PLACEMENT_JITTER: f32 = 40.0;
}

/// Polaroid print proportions, as fractions of the captured image
pub mod polaroid {
    /// Width:height of the picture area
    pub const ASPECT_WIDTH: u32 = 4;
    pub const ASPECT_HEIGHT: u32 = 5;

    pub const BORDER_SIDE: f32 = 0.08;
    pub const BORDER_TOP: f32 = 0.08;
    pub const BORDER_BOTTOM: f32 = 0.16;

    /// Caption glyph height relative to image height
    pub const CAPTION_SIZE_RATIO: f32 = 0.04;
    /// Caption baseline sits `image_height * BORDER_BOTTOM / divisor` above the bottom
    pub const CAPTION_BASELINE_DIVISOR: f32 = 2.5;
    /// Caption colour (#6b7280)
    pub const CAPTION_COLOR: [u8; 3] = [0x6b, 0x72, 0x80];
}

/// Generated test pattern dimensions
pub mod test_pattern {
    pub const WIDTH: u32 = 640;
    pub const HEIGHT: u32 = 480;
}

/// Supported still image extensions for the file source
pub mod file_formats {
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
