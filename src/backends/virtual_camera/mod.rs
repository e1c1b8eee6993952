// SPDX-License-Identifier: GPL-3.0-only

//! Software frame sources
//!
//! Used when no real camera is wired in: a still image from disk, or a
//! generated test pattern that changes on every grab so consecutive photos
//! are distinguishable.

mod file_source;

pub use file_source::{FileSource, load_image_as_frame};

use crate::backends::camera::{CameraFrame, CaptureResult, FrameSource};
use crate::constants::test_pattern;
use crate::errors::CaptureError;
use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Pick a source: the given file, or the test pattern
pub fn open_source(path: Option<&Path>) -> Box<dyn FrameSource> {
    match path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(TestPattern::default()),
    }
}

/// Generated colour-bar pattern with a moving highlight band
#[derive(Debug)]
pub struct TestPattern {
    width: u32,
    height: u32,
    started: bool,
    frame_index: u32,
}

impl TestPattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            started: false,
            frame_index: 0,
        }
    }

    fn render(&self) -> RgbaImage {
        const BARS: [[u8; 3]; 7] = [
            [192, 192, 192],
            [192, 192, 0],
            [0, 192, 192],
            [0, 192, 0],
            [192, 0, 192],
            [192, 0, 0],
            [0, 0, 192],
        ];

        let band_height = (self.height / 8).max(1);
        let band_top =
            (u64::from(self.frame_index) * u64::from(band_height) / 2 % u64::from(self.height)) as u32;

        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let bar = (x * BARS.len() as u32 / self.width) as usize;
            let [r, g, b] = BARS[bar.min(BARS.len() - 1)];
            let in_band = y >= band_top && y < band_top + band_height;
            if in_band {
                Rgba([r.saturating_add(63), g.saturating_add(63), b.saturating_add(63), 255])
            } else {
                Rgba([r, g, b, 255])
            }
        })
    }
}

impl Default for TestPattern {
    fn default() -> Self {
        Self::new(test_pattern::WIDTH, test_pattern::HEIGHT)
    }
}

impl FrameSource for TestPattern {
    fn name(&self) -> String {
        "Test pattern".to_string()
    }

    fn start(&mut self) -> CaptureResult<()> {
        self.started = true;
        debug!(width = self.width, height = self.height, "Test pattern started");
        Ok(())
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn grab_frame(&mut self) -> CaptureResult<CameraFrame> {
        if !self.started {
            return Err(CaptureError::NotStarted);
        }
        let frame = CameraFrame::from_rgba(self.render());
        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_changes_between_frames() {
        let mut source = TestPattern::new(64, 48);
        source.start().unwrap();

        let first = source.grab_frame().unwrap();
        let second = source.grab_frame().unwrap();
        assert_eq!((first.width, first.height), (64, 48));
        assert_ne!(first.data, second.data);
    }

    #[test]
    fn test_pattern_survives_frame_counter_wrap() {
        let mut source = TestPattern::new(64, 48);
        source.frame_index = u32::MAX - 1;
        source.start().unwrap();

        for _ in 0..3 {
            let frame = source.grab_frame().unwrap();
            assert_eq!((frame.width, frame.height), (64, 48));
        }
        assert_eq!(source.frame_index, 1);
    }

    #[test]
    fn test_open_source_defaults_to_pattern() {
        let source = open_source(None);
        assert_eq!(source.name(), "Test pattern");
        assert!(!source.is_started());
    }
}
