// SPDX-License-Identifier: GPL-3.0-only

//! Polaroid print rendering for downloads
//!
//! ```text
//! ┌──────────────────────┐  ← top border, 8% of image height
//! │ ┌──────────────────┐ │
//! │ │                  │ │  ← side borders, 8% of image width
//! │ │      image       │ │
//! │ │                  │ │
//! │ └──────────────────┘ │
//! │       09:41 AM       │  ← bottom strip, 16% of image height
//! └──────────────────────┘
//! ```
//!
//! The caption is drawn with the 8x8 bitmap fonts from `font8x8`, scaled to
//! roughly 4% of the image height.

use crate::constants::polaroid;
use chrono::{DateTime, TimeZone};
use font8x8::{BASIC_FONTS, GREEK_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

/// font8x8 glyph cells are 8x8 and include their own spacing
const GLYPH_SIZE: u32 = 8;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Caption shown under the picture, e.g. `09:41 AM`
pub fn caption_text<Tz: TimeZone>(captured_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    captured_at.format("%I:%M %p").to_string()
}

/// Border widths in pixels for an image of the given size
pub fn border_sizes(width: u32, height: u32) -> (u32, u32, u32) {
    let side = (width as f32 * polaroid::BORDER_SIDE).round() as u32;
    let top = (height as f32 * polaroid::BORDER_TOP).round() as u32;
    let bottom = (height as f32 * polaroid::BORDER_BOTTOM).round() as u32;
    (side, top, bottom)
}

/// Frame `image` in a white polaroid border with `caption` in the bottom strip
pub fn render_polaroid(image: &RgbaImage, caption: &str) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (side, top, bottom) = border_sizes(width, height);
    let canvas_w = width + 2 * side;
    let canvas_h = height + top + bottom;

    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, WHITE);
    image::imageops::overlay(&mut canvas, image, side as i64, top as i64);

    let size = height as f32 * polaroid::CAPTION_SIZE_RATIO;
    let scale = ((size / GLYPH_SIZE as f32).round() as u32).max(1);
    let baseline = canvas_h as f32
        - height as f32 * polaroid::BORDER_BOTTOM / polaroid::CAPTION_BASELINE_DIVISOR;
    let glyph_top = (baseline.round() as i64) - (GLYPH_SIZE * scale) as i64;

    let text_width = text_width(caption, scale) as i64;
    let left = (canvas_w as i64 - text_width) / 2;
    let [r, g, b] = polaroid::CAPTION_COLOR;
    draw_text(&mut canvas, caption, left, glyph_top, scale, Rgba([r, g, b, 255]));

    canvas
}

fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Bitmap for `ch`; characters outside the bundled fonts render as `?`
fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(canvas: &mut RgbaImage, text: &str, left: i64, top: i64, scale: u32, color: Rgba<u8>) {
    let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);
    let scale = scale as i64;

    for (index, ch) in text.chars().enumerate() {
        let origin_x = left + index as i64 * GLYPH_SIZE as i64 * scale;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_SIZE as i64 {
                // Least significant bit is the leftmost column
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = origin_x + col * scale + dx;
                        let y = top + row as i64 * scale + dy;
                        if (0..canvas_w).contains(&x) && (0..canvas_h).contains(&y) {
                            canvas.put_pixel(x as u32, y as u32, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_caption_is_twelve_hour_clock() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 21, 5, 0).unwrap();
        assert_eq!(caption_text(&at), "09:05 PM");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(caption_text(&at.with_timezone(&offset)), "11:05 PM");
    }

    #[test]
    fn test_border_proportions() {
        let image = RgbaImage::from_pixel(400, 500, Rgba([0, 0, 0, 255]));
        let print = render_polaroid(&image, "09:05 PM");

        assert_eq!(print.dimensions(), (464, 620));
        assert_eq!(print.get_pixel(0, 0), &WHITE);
        assert_eq!(print.get_pixel(31, 40), &WHITE);
        assert_eq!(print.get_pixel(32, 40), &Rgba([0, 0, 0, 255]));
        assert_eq!(print.get_pixel(431, 539), &Rgba([0, 0, 0, 255]));
        assert_eq!(print.get_pixel(432, 539), &WHITE);
    }

    #[test]
    fn test_caption_drawn_above_baseline_in_bottom_strip() {
        let image = RgbaImage::from_pixel(400, 500, Rgba([0, 0, 0, 255]));
        let print = render_polaroid(&image, "10:00 AM");
        let [r, g, b] = polaroid::CAPTION_COLOR;
        let ink = Rgba([r, g, b, 255]);

        let rows: Vec<u32> = (0..print.height())
            .filter(|&y| (0..print.width()).any(|x| print.get_pixel(x, y) == &ink))
            .collect();
        assert!(!rows.is_empty());
        // Baseline at 620 - 500 * 0.16 / 2.5 = 588; cells are 24 px tall
        assert_eq!(*rows.first().unwrap(), 564);
        assert!(*rows.last().unwrap() < 588);
    }

    #[test]
    fn test_caption_glyphs_cover_other_locales() {
        for ch in ['0', '9', ':', 'A', 'P', 'M', 'a', 'p', 'é', '.'] {
            assert_ne!(glyph(ch), [0; 8], "no glyph for {:?}", ch);
        }
        assert_eq!(glyph('\u{4e0a}'), glyph('?'));
        assert_eq!(text_width("", 3), 0);
        assert_eq!(text_width("12", 1), 16);
    }

    #[test]
    fn test_caption_is_centred() {
        let image = RgbaImage::from_pixel(400, 500, Rgba([0, 0, 0, 255]));
        let print = render_polaroid(&image, "10:00 AM");
        let [r, g, b] = polaroid::CAPTION_COLOR;
        let ink = Rgba([r, g, b, 255]);

        let columns: Vec<u32> = (0..print.width())
            .filter(|&x| (560..600).any(|y| print.get_pixel(x, y) == &ink))
            .collect();
        // 8 cells of 24 px starting at (464 - 192) / 2
        assert!(*columns.first().unwrap() >= 136);
        assert!(*columns.last().unwrap() < 136 + 192);
    }
}
