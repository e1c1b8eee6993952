// SPDX-License-Identifier: GPL-3.0-only

//! Polaroid Booth - an instant camera with a drag-and-drop photo board
//!
//! Photos come out of the camera one at a time and must be dragged onto the
//! board before the next one can be taken. Photos can be pinned in place,
//! thrown into the trash, or downloaded as polaroid prints.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`board`]: photo collection store and drag/drop placement controller
//! - [`app`]: the booth: camera session wired to the board
//! - [`backends`]: frame source abstraction and software sources
//! - [`pipelines`]: capture, filters, polaroid rendering and encoding
//! - [`storage`]: collection persistence and the photo image library
//! - [`config`]: user configuration handling
//! - [`terminal`]: interactive board in the terminal
//!
//! # Example
//!
//! ```ignore
//! // Typically run via:
//! // polaroid-booth            (terminal board)
//! // polaroid-booth snap --at 400 300
//! ```

pub mod app;
pub mod backends;
pub mod board;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{Booth, FilterType};
pub use board::{BoardEvent, Feedback, Outcome, PhotoId, PhotoRecord, PhotoStore, PlacementController};
pub use config::Config;
pub use errors::{AppError, AppResult};
