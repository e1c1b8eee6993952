// SPDX-License-Identifier: GPL-3.0-only

//! Frame source abstraction
//!
//! The booth never talks to a device directly. Everything that produces
//! frames implements [`FrameSource`]:
//!
//! ```text
//! ┌─────────────────────┐
//! │   Booth / Session   │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  FrameSource trait  │  ← start / stop / grab_frame
//! └──────────┬──────────┘
//!            │
//!      ┌─────┴──────┐
//!      ▼            ▼
//!  ┌────────┐  ┌────────────┐
//!  │  File  │  │Test pattern│
//!  └────────┘  └────────────┘
//! ```

pub mod types;

pub use types::*;

/// A source of RGBA frames
///
/// Sources must be started before frames can be grabbed. Starting an
/// already started source is a no-op.
pub trait FrameSource: Send {
    /// Human readable name, shown in the status bar
    fn name(&self) -> String;

    /// Acquire the underlying device or file
    fn start(&mut self) -> CaptureResult<()>;

    /// Release the device; safe to call when stopped
    fn stop(&mut self);

    fn is_started(&self) -> bool;

    /// Grab the current frame
    ///
    /// Fails with [`CaptureError::NotStarted`](crate::errors::CaptureError::NotStarted)
    /// while the source is stopped.
    fn grab_frame(&mut self) -> CaptureResult<CameraFrame>;
}

impl std::fmt::Debug for dyn FrameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSource")
            .field("name", &self.name())
            .field("started", &self.is_started())
            .finish()
    }
}
