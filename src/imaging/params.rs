//! Parameter types for border trimming and encoding.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the configuration layer (which reads loose user values) and the pixel code
//! in [`color`](super::color) and [`trim`](super::trim), so range checks happen
//! once, on construction.
//!
//! ## Types
//!
//! - [`Threshold`]: Maximum normalized color distance (0–200, default 20). Clamped on construction.
//! - [`BorderColor`]: Which color counts as border: fixed black or the top-left pixel.
//! - [`Quality`]: Lossy encoding quality (1–100). WebP output always uses 75.

use super::color::Color;
use image::RgbaImage;

/// Upper bound on the normalized color distance for a pixel to count as border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold(u32);

impl Threshold {
    pub const MAX: u32 = 200;

    pub fn new(value: i32) -> Self {
        Self(value.clamp(0, Self::MAX as i32) as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(20)
    }
}

/// Reference color selection for one image.
///
/// Resolved once per image, before the first rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderColor {
    /// Opaque black, the common case for letterboxed scans and screenshots.
    #[default]
    Black,
    /// Whatever color the pixel at (0, 0) has.
    Sampled,
}

impl BorderColor {
    pub fn from_allow_color(allow_color: bool) -> Self {
        if allow_color {
            Self::Sampled
        } else {
            Self::Black
        }
    }

    pub fn resolve(self, img: &RgbaImage) -> Color {
        match self {
            Self::Black => Color::BLACK,
            Self::Sampled => img
                .get_pixel_checked(0, 0)
                .map(|px| Color::from_rgba8(*px))
                .unwrap_or(Color::BLACK),
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    /// Fixed quality for every WebP written by the batch.
    pub const WEBP: Quality = Quality(75);
    /// Quality for re-encoded JPEGs.
    pub const JPEG: Quality = Quality(95);

    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}
