// SPDX-License-Identifier: GPL-3.0-only

//! Camera state: selected filter and the shutter state machine
//!
//! ```text
//!            shutter / toggle             shutter
//!  Closed ─────────────────────▶ Open ───────────────▶ Printing
//!    ▲                            │ ▲                     │
//!    │          toggle            │ └─────────────────────┘
//!    └────────────────────────────┘   PRINT_DURATION elapsed
//!                                      (photo delivered)
//! ```
//!
//! A failed start leaves the camera open with an error showing. While an
//! error is showing the shutter does nothing; toggling the camera closed
//! clears it.

use crate::backends::camera::{CameraFrame, FrameSource};
use crate::constants::PRINT_DURATION;
use crate::errors::CaptureError;
use crate::pipelines::photo::{CapturedPhoto, PhotoCapture};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Colour filters offered by the camera
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// No filter applied
    #[default]
    Normal,
    /// Black & white
    Bw,
    /// Warm brownish tint
    Sepia,
    /// Punchy contrast and saturation
    Film,
    /// Hue rotated towards blue
    Cool,
}

impl FilterType {
    /// All filters in picker order
    pub const ALL: [FilterType; 5] = [
        FilterType::Normal,
        FilterType::Bw,
        FilterType::Sepia,
        FilterType::Film,
        FilterType::Cool,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterType::Normal => "Normal",
            FilterType::Bw => "BW",
            FilterType::Sepia => "Sepia",
            FilterType::Film => "Film",
            FilterType::Cool => "Cool",
        }
    }

    /// Picker swatch colour
    pub fn swatch_color(&self) -> [u8; 3] {
        match self {
            FilterType::Normal => [0xe5, 0xe5, 0xe5],
            FilterType::Bw => [0x52, 0x52, 0x52],
            FilterType::Sepia => [0xd9, 0x77, 0x06],
            FilterType::Film => [0x25, 0x63, 0xeb],
            FilterType::Cool => [0x4f, 0x46, 0xe5],
        }
    }

    /// Equivalent CSS `filter` value
    pub fn css_value(&self) -> &'static str {
        match self {
            FilterType::Normal => "none",
            FilterType::Bw => "grayscale(100%)",
            FilterType::Sepia => "sepia(80%) contrast(110%)",
            FilterType::Film => "contrast(120%) saturate(130%) brightness(110%)",
            FilterType::Cool => "hue-rotate(180deg) contrast(90%)",
        }
    }

    /// Next filter in picker order, wrapping around
    pub fn next(&self) -> FilterType {
        let index = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// A photo on its way out of the camera
#[derive(Debug, Clone, Default)]
pub enum PrintState {
    #[default]
    Idle,
    Printing {
        /// When printing started
        started: Instant,
        photo: Box<CapturedPhoto>,
    },
}

impl PrintState {
    pub fn is_printing(&self) -> bool {
        matches!(self, PrintState::Printing { .. })
    }
}

/// What a shutter press did
#[derive(Debug, Clone, PartialEq)]
pub enum ShutterOutcome {
    /// The camera was closed and is now open
    Opened,
    /// Starting the source or grabbing a frame failed
    Failed(CaptureError),
    /// An error is showing; the shutter is disabled
    Disabled,
    /// A photo is still printing
    Busy,
    /// The board still has a photo waiting for placement
    Refused,
    /// A photo was taken and is printing
    Printing,
}

/// Camera lifecycle around a single frame source
pub struct CameraSession {
    source: Box<dyn FrameSource>,
    filter: FilterType,
    open: bool,
    error: Option<CaptureError>,
    print: PrintState,
}

impl CameraSession {
    pub fn new(source: Box<dyn FrameSource>, filter: FilterType) -> Self {
        Self {
            source,
            filter,
            open: false,
            error: None,
            print: PrintState::Idle,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_printing(&self) -> bool {
        self.print.is_printing()
    }

    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        debug!(filter = filter.display_name(), "Filter selected");
        self.filter = filter;
    }

    /// Select the next filter and return it
    pub fn cycle_filter(&mut self) -> FilterType {
        self.set_filter(self.filter.next());
        self.filter
    }

    pub fn source_name(&self) -> String {
        self.source.name()
    }

    /// Open or close the camera; returns whether it is now open
    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open_camera();
        }
        self.open
    }

    fn open_camera(&mut self) -> Option<CaptureError> {
        self.open = true;
        match self.source.start() {
            Ok(()) => {
                info!(source = %self.source.name(), "Camera opened");
                self.error = None;
                None
            }
            Err(e) => {
                warn!(source = %self.source.name(), error = %e, "Camera failed to start");
                self.error = Some(e.clone());
                Some(e)
            }
        }
    }

    fn close(&mut self) {
        self.source.stop();
        self.open = false;
        self.error = None;
        info!("Camera closed");
    }

    /// Press the shutter
    ///
    /// `board_has_pending` is checked before anything is captured so a
    /// refused press never grabs a frame.
    pub fn shutter(&mut self, now: Instant, board_has_pending: bool) -> ShutterOutcome {
        if !self.open {
            return match self.open_camera() {
                None => ShutterOutcome::Opened,
                Some(e) => ShutterOutcome::Failed(e),
            };
        }
        if self.error.is_some() {
            return ShutterOutcome::Disabled;
        }
        if self.print.is_printing() {
            debug!("Shutter ignored while printing");
            return ShutterOutcome::Busy;
        }
        if board_has_pending {
            debug!("Shutter refused, a photo still needs placing");
            return ShutterOutcome::Refused;
        }

        match PhotoCapture::capture(self.source.as_mut(), self.filter) {
            Ok(photo) => {
                self.print = PrintState::Printing {
                    started: now,
                    photo: Box::new(photo),
                };
                ShutterOutcome::Printing
            }
            Err(e) => {
                warn!(error = %e, "Capture failed");
                self.error = Some(e.clone());
                ShutterOutcome::Failed(e)
            }
        }
    }

    /// Current frame for the live view, if the camera is open and healthy
    pub fn preview_frame(&mut self) -> Option<CameraFrame> {
        if !self.open || self.error.is_some() {
            return None;
        }
        self.source.grab_frame().ok()
    }

    /// Hand over the printed photo once printing has run its course
    pub fn poll_print(&mut self, now: Instant) -> Option<CapturedPhoto> {
        let PrintState::Printing { started, .. } = &self.print else {
            return None;
        };
        if now.saturating_duration_since(*started) < PRINT_DURATION {
            return None;
        }
        self.finish_print_now()
    }

    /// Hand over the printing photo immediately
    pub fn finish_print_now(&mut self) -> Option<CapturedPhoto> {
        match std::mem::take(&mut self.print) {
            PrintState::Printing { photo, .. } => Some(*photo),
            PrintState::Idle => None,
        }
    }

    /// Printing progress in [0, 1], if printing
    pub fn print_progress(&self, now: Instant) -> Option<f32> {
        match &self.print {
            PrintState::Printing { started, .. } => Some(
                (now.saturating_duration_since(*started).as_secs_f32()
                    / PRINT_DURATION.as_secs_f32())
                .min(1.0),
            ),
            PrintState::Idle => None,
        }
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("source", &self.source.name())
            .field("filter", &self.filter)
            .field("open", &self.open)
            .field("error", &self.error)
            .field("printing", &self.print.is_printing())
            .finish()
    }
}
