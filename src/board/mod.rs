// SPDX-License-Identifier: GPL-3.0-only

//! The photo board
//!
//! - [`store`]: the photo collection and its placement rules
//! - [`controller`]: gesture handling (drag, drop on trash, pin)
//! - [`geometry`]: points, rectangles and pointer normalization
//! - [`photo`]: the persisted photo record

pub mod controller;
pub mod geometry;
pub mod photo;
pub mod store;

pub use controller::{BoardEvent, BoardLayout, Feedback, Outcome, PlacementController, TrashTarget};
pub use geometry::{Point, PointerSample, Rect, Size};
pub use photo::{ImageRef, PhotoId, PhotoRecord};
pub use store::PhotoStore;
