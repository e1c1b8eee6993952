// SPDX-License-Identifier: GPL-3.0-only

//! Board coordinate types
//!
//! All positions share one coordinate space: canvas units with the origin at
//! the top-left corner of the board, x growing right and y growing down.

use serde::{Deserialize, Serialize};

/// A position on the board
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise offset from `other` to `self`
    pub fn offset_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn translate(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Width and height in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle given by its four edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Hit test with inclusive bounds on all four edges
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.left - margin,
            self.top - margin,
            self.right + margin,
            self.bottom + margin,
        )
    }
}

/// Raw coordinates reported by an input device at the end of a gesture
///
/// Front ends wrap whatever their event source hands them into one of these
/// variants; the controller only ever sees the normalized [`Point`].
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSample {
    /// Mouse or pen with a single client position
    Mouse { x: f32, y: f32 },
    /// Touch event carrying the touch points that changed in this event
    Touch { changed: Vec<Point> },
    /// Event without usable coordinates
    Unknown,
}

impl PointerSample {
    /// Resolve the sample to a single position, `(0, 0)` when none is available
    pub fn position(&self) -> Point {
        match self {
            PointerSample::Mouse { x, y } => Point::new(*x, *y),
            PointerSample::Touch { changed } => changed.first().copied().unwrap_or(Point::ORIGIN),
            PointerSample::Unknown => Point::ORIGIN,
        }
    }
}

impl From<Point> for PointerSample {
    fn from(point: Point) -> Self {
        PointerSample::Mouse {
            x: point.x,
            y: point.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive_on_every_edge() {
        let rect = Rect::new(700.0, 500.0, 780.0, 580.0);

        assert!(rect.contains(Point::new(700.0, 540.0)));
        assert!(rect.contains(Point::new(780.0, 540.0)));
        assert!(rect.contains(Point::new(750.0, 500.0)));
        assert!(rect.contains(Point::new(750.0, 580.0)));
        assert!(rect.contains(Point::new(780.0, 580.0)));

        assert!(!rect.contains(Point::new(781.0, 540.0)));
        assert!(!rect.contains(Point::new(699.9, 540.0)));
        assert!(!rect.contains(Point::new(750.0, 580.5)));
    }

    #[test]
    fn test_expand_grows_each_side() {
        let rect = Rect::new(700.0, 500.0, 780.0, 580.0).expand(50.0);
        assert_eq!(rect, Rect::new(650.0, 450.0, 830.0, 630.0));
        assert_eq!(rect.width(), 180.0);
    }

    #[test]
    fn test_pointer_sample_normalization() {
        assert_eq!(
            PointerSample::Mouse { x: 3.0, y: 4.0 }.position(),
            Point::new(3.0, 4.0)
        );
        assert_eq!(
            PointerSample::Touch {
                changed: vec![Point::new(10.0, 20.0), Point::new(99.0, 99.0)]
            }
            .position(),
            Point::new(10.0, 20.0)
        );
        assert_eq!(
            PointerSample::Touch { changed: vec![] }.position(),
            Point::ORIGIN
        );
        assert_eq!(PointerSample::Unknown.position(), Point::ORIGIN);
    }
}
