// SPDX-License-Identifier: GPL-3.0-only

//! Frame sources
//!
//! - [`camera`]: the [`FrameSource`](camera::FrameSource) trait and frame type
//! - [`virtual_camera`]: file and test-pattern sources

pub mod camera;
pub mod virtual_camera;
