// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture from a frame source

use super::CapturedPhoto;
use super::processing::PostProcessor;
use crate::app::FilterType;
use crate::backends::camera::{CaptureResult, FrameSource};
use chrono::Utc;
use tracing::{error, info};

/// Photo capture handler
///
/// Grabs a single frame from a started source and runs it through
/// post-processing.
pub struct PhotoCapture;

impl PhotoCapture {
    pub fn capture(
        source: &mut dyn FrameSource,
        filter: FilterType,
    ) -> CaptureResult<CapturedPhoto> {
        info!(source = %source.name(), filter = filter.display_name(), "Capturing photo");

        let frame = source.grab_frame().inspect_err(|e| {
            error!(error = %e, "Failed to grab frame");
        })?;
        let image = PostProcessor::new(filter).process(&frame)?;

        Ok(CapturedPhoto {
            image,
            captured_at: Utc::now(),
            filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_camera::TestPattern;
    use crate::errors::CaptureError;

    #[test]
    fn test_capture_requires_started_source() {
        let mut source = TestPattern::new(40, 30);
        let result = PhotoCapture::capture(&mut source, FilterType::Normal);
        assert!(matches!(result, Err(CaptureError::NotStarted)));
    }

    #[test]
    fn test_capture_is_cropped_to_print_aspect() {
        let mut source = TestPattern::new(40, 30);
        source.start().unwrap();
        let photo = PhotoCapture::capture(&mut source, FilterType::Sepia).unwrap();
        assert_eq!(photo.image.dimensions(), (24, 30));
        assert_eq!(photo.filter, FilterType::Sepia);
    }
}
