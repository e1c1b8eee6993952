// SPDX-License-Identifier: GPL-3.0-only

//! CPU colour filters for captured photos
//!
//! Each [`FilterType`] is a short chain of colour operations with the same
//! maths as the CSS filter functions (W3C Filter Effects, sRGB space). The
//! chain runs left to right and clamps to [0, 1] after every step.

use crate::app::FilterType;
use image::RgbaImage;

/// One step of a filter chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorOp {
    /// `grayscale(amount)`, amount in [0, 1]
    Grayscale(f32),
    /// `sepia(amount)`, amount in [0, 1]
    Sepia(f32),
    /// `saturate(factor)`
    Saturate(f32),
    /// `hue-rotate(degrees)`
    HueRotate(f32),
    /// `contrast(factor)`
    Contrast(f32),
    /// `brightness(factor)`
    Brightness(f32),
}

impl FilterType {
    /// Colour operations making up this filter, in application order
    pub fn ops(&self) -> &'static [ColorOp] {
        match self {
            FilterType::Normal => &[],
            FilterType::Bw => &[ColorOp::Grayscale(1.0)],
            FilterType::Sepia => &[ColorOp::Sepia(0.8), ColorOp::Contrast(1.1)],
            FilterType::Film => &[
                ColorOp::Contrast(1.2),
                ColorOp::Saturate(1.3),
                ColorOp::Brightness(1.1),
            ],
            FilterType::Cool => &[ColorOp::HueRotate(180.0), ColorOp::Contrast(0.9)],
        }
    }
}

impl ColorOp {
    #[inline]
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            ColorOp::Grayscale(amount) => {
                let inv = 1.0 - amount.clamp(0.0, 1.0);
                mul(
                    [
                        [0.2126 + 0.7874 * inv, 0.7152 - 0.7152 * inv, 0.0722 - 0.0722 * inv],
                        [0.2126 - 0.2126 * inv, 0.7152 + 0.2848 * inv, 0.0722 - 0.0722 * inv],
                        [0.2126 - 0.2126 * inv, 0.7152 - 0.7152 * inv, 0.0722 + 0.9278 * inv],
                    ],
                    rgb,
                )
            }
            ColorOp::Sepia(amount) => {
                let inv = 1.0 - amount.clamp(0.0, 1.0);
                mul(
                    [
                        [0.393 + 0.607 * inv, 0.769 - 0.769 * inv, 0.189 - 0.189 * inv],
                        [0.349 - 0.349 * inv, 0.686 + 0.314 * inv, 0.168 - 0.168 * inv],
                        [0.272 - 0.272 * inv, 0.534 - 0.534 * inv, 0.131 + 0.869 * inv],
                    ],
                    rgb,
                )
            }
            ColorOp::Saturate(s) => mul(
                [
                    [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                ],
                rgb,
            ),
            ColorOp::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                mul(
                    [
                        [
                            0.213 + cos * 0.787 - sin * 0.213,
                            0.715 - cos * 0.715 - sin * 0.715,
                            0.072 - cos * 0.072 + sin * 0.928,
                        ],
                        [
                            0.213 - cos * 0.213 + sin * 0.143,
                            0.715 + cos * 0.285 + sin * 0.140,
                            0.072 - cos * 0.072 - sin * 0.283,
                        ],
                        [
                            0.213 - cos * 0.213 - sin * 0.787,
                            0.715 - cos * 0.715 + sin * 0.715,
                            0.072 + cos * 0.928 + sin * 0.072,
                        ],
                    ],
                    rgb,
                )
            }
            ColorOp::Contrast(c) => rgb.map(|v| (v - 0.5) * c + 0.5),
            ColorOp::Brightness(b) => rgb.map(|v| v * b),
        };
        out.map(|v| v.clamp(0.0, 1.0))
    }
}

#[inline]
fn mul(m: [[f32; 3]; 3], [r, g, b]: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    ]
}

/// Apply a filter to every pixel in place; alpha is left untouched
pub fn apply_filter(image: &mut RgbaImage, filter: FilterType) {
    let ops = filter.ops();
    if ops.is_empty() {
        return;
    }

    for pixel in image.pixels_mut() {
        let mut rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];
        for op in ops {
            rgb = op.apply(rgb);
        }
        pixel[0] = (rgb[0] * 255.0).round() as u8;
        pixel[1] = (rgb[1] * 255.0).round() as u8;
        pixel[2] = (rgb[2] * 255.0).round() as u8;
    }
}
