// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  PNG in the  │
//! │   (RGBA)     │     │  - Crop 4:5       │     │ photo library│
//! │              │     │  - Filters        │     │              │
//! │              │     │  - Encoding       │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! - [`photo`]: capture, filters, polaroid rendering and PNG encoding

pub mod photo;
