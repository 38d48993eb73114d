//! Border detection and the rotate-and-crop trim loop.
//!
//! Only one edge primitive exists: [`border_width`] measures the border along
//! the left edge. [`trim_borders`] reaches the other three edges by rotating
//! the image a quarter turn counter-clockwise before every scan:
//!
//! ```text
//! rotate → scan/crop → rotate → scan/crop → rotate → scan/crop → rotate → scan/crop
//! ```
//!
//! Four quarter turns are the identity, so an image that loses no columns
//! comes back pixel-identical to the input.
//!
//! When the border swallows the whole image, the crops still run: the first
//! full-width crop leaves a zero-width image, the next rotation turns that
//! into zero height, and the next scan removes what is left. The result is a
//! 0×0 image flagged as cropped; callers decide what to write for it.

use super::color::{Color, is_similar};
use super::params::Threshold;
use image::RgbaImage;
use image::imageops;
use std::fmt;
use tracing::debug;

/// Columns removed at each of the four trim steps, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRecord(pub [u32; 4]);

impl CropRecord {
    pub fn any(&self) -> bool {
        self.0.iter().any(|&w| w > 0)
    }
}

impl fmt::Display for CropRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}]")
    }
}

/// Result of [`trim_borders`].
#[derive(Debug, Clone)]
pub struct TrimOutcome {
    pub image: RgbaImage,
    pub crops: CropRecord,
    /// True when at least one step removed columns.
    pub cropped: bool,
}

impl TrimOutcome {
    /// The border covered every pixel.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}

/// Quarter turn counter-clockwise.
pub fn rotate90(img: &RgbaImage) -> RgbaImage {
    imageops::rotate270(img)
}

/// Index of the first column holding a pixel that is not border-colored.
///
/// Returns the full width when every pixel matches `reference`.
pub fn border_width(img: &RgbaImage, reference: Color, threshold: Threshold) -> u32 {
    let (width, height) = img.dimensions();
    for x in 0..width {
        for y in 0..height {
            let px = Color::from_rgba8(*img.get_pixel(x, y));
            if !is_similar(px, reference, threshold) {
                return x;
            }
        }
    }
    width
}

/// Drop the leading `columns` columns.
fn crop_left(img: &RgbaImage, columns: u32) -> RgbaImage {
    let (width, height) = img.dimensions();
    let columns = columns.min(width);
    imageops::crop_imm(img, columns, 0, width - columns, height).to_image()
}

/// Trim borders of `reference` color from all four edges of `img`.
pub fn trim_borders(img: &RgbaImage, reference: Color, threshold: Threshold) -> TrimOutcome {
    let mut current = rotate90(img);
    let mut crops = [0u32; 4];
    let mut cropped = false;

    for (step, crop) in crops.iter_mut().enumerate() {
        let width = border_width(&current, reference, threshold);
        *crop = width;
        if width > 0 {
            current = crop_left(&current, width);
            cropped = true;
        }
        debug!(
            step,
            width,
            remaining = ?current.dimensions(),
            "trim step"
        );
        if step < 3 {
            current = rotate90(&current);
        }
    }

    TrimOutcome {
        image: current,
        crops: CropRecord(crops),
        cropped,
    }
}
