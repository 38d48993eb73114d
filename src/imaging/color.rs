//! Color model and the border-similarity test.
//!
//! Pixels are compared as 16-bit, alpha-premultiplied RGB. An 8-bit channel
//! `c` with alpha `a` widens to `c * 0x101 * a / 0xff`, so fully transparent
//! pixels compare equal to black regardless of their stored color.
//!
//! The distance is the Euclidean RGB distance scaled down by `sqrt(3) * 256`,
//! which maps the 16-bit range onto roughly 0–255 and lines it up with the
//! 0–200 [`Threshold`] scale. The result is truncated, not rounded, before the
//! comparison.

use super::params::Threshold;
use image::Rgba;
use std::fmt;

/// A color with 16-bit, alpha-premultiplied channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub a: u32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0xffff,
    };

    pub fn from_rgba8(px: Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        let alpha = a as u32;
        let widen = |c: u8| (c as u32 * 0x101) * alpha / 0xff;
        Self {
            r: widen(r),
            g: widen(g),
            b: widen(b),
            a: alpha * 0x101,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r >> 8,
            self.g >> 8,
            self.b >> 8,
            self.a >> 8
        )
    }
}

/// Normalized distance between two colors, alpha ignored, truncated toward zero.
pub fn distance(c1: Color, c2: Color) -> u32 {
    let dr = c1.r as i64 - c2.r as i64;
    let dg = c1.g as i64 - c2.g as i64;
    let db = c1.b as i64 - c2.b as i64;
    let sum = (dr * dr + dg * dg + db * db) as f64;
    (sum / (3.0 * 256.0 * 256.0)).sqrt() as u32
}

/// Whether `c1` is close enough to `c2` to count as border.
pub fn is_similar(c1: Color, c2: Color, threshold: Threshold) -> bool {
    distance(c1, c2) <= threshold.value()
}
