// SPDX-License-Identifier: GPL-3.0-only

//! Photo records placed on the board

use super::geometry::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a photo, generated when the photo is captured
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the encoded image bytes of a photo
///
/// The board never looks inside; the image library resolves it to a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for a single plain file name: no directories, no `..`, not absolute
    pub fn is_file_name(&self) -> bool {
        std::path::Path::new(&self.0).file_name() == Some(std::ffi::OsStr::new(&self.0))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One captured photo and its placement on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: PhotoId,
    /// The captured, filtered image
    pub image: ImageRef,
    /// Capture time, stored as milliseconds since the Unix epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
    /// Top-left corner on the board
    pub x: f32,
    pub y: f32,
    /// Decorative tilt assigned at capture time, in [-10, 10)
    pub rotation_degrees: f32,
    /// Pinned photos keep their position and cannot be dragged
    #[serde(default)]
    pub pinned: bool,
    /// False until the first completed drag commits a position
    #[serde(default = "default_placed")]
    pub placed: bool,
}

fn default_placed() -> bool {
    true
}

impl PhotoRecord {
    /// A freshly captured photo: unpinned and still pending placement
    pub fn pending(
        id: PhotoId,
        image: ImageRef,
        captured_at: DateTime<Utc>,
        position: Point,
        rotation_degrees: f32,
    ) -> Self {
        Self {
            id,
            image,
            captured_at,
            x: position.x,
            y: position.y,
            rotation_degrees,
            pinned: false,
            placed: false,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Milliseconds since the Unix epoch, used in download file names
    pub fn timestamp_millis(&self) -> i64 {
        self.captured_at.timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = PhotoId::generate();
        let b = PhotoId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let captured_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let mut record = PhotoRecord::pending(
            PhotoId::from("abc"),
            ImageRef::new("abc.png"),
            captured_at,
            Point::new(12.5, 40.0),
            -3.0,
        );
        record.placed = true;

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["image"], "abc.png");
        assert_eq!(json["capturedAt"], 1_700_000_000_123i64);
        assert_eq!(json["rotationDegrees"], -3.0);
        assert_eq!(json["pinned"], false);
    }

    #[test]
    fn test_missing_flags_default_on_decode() {
        let json = r#"{"id":"a","image":"a.png","capturedAt":0,"x":1,"y":2,"rotationDegrees":0}"#;
        let record: PhotoRecord = serde_json::from_str(json).unwrap();
        assert!(!record.pinned);
        assert!(record.placed);
    }
}
