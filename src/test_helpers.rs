//! Shared test utilities for the image-trim test suite.
//!
//! Synthetic images instead of binary fixtures: every test builds exactly the
//! border it needs, so expected crop widths can be read off the call site.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! // 20×12 white photo with 1px top, 3px right, 2px bottom, 4px left black border
//! let img = framed_image(20, 12, [1, 3, 2, 4], BLACK, WHITE);
//! let tmp = TempDir::new().unwrap();
//! let path = write_png(tmp.path(), "scan.png", &img);
//! ```

use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// =========================================================================
// Image builders
// =========================================================================

/// Uniform image of a single color.
pub fn solid_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// `fill` content surrounded by a `border` frame.
///
/// `frame` is `[top, right, bottom, left]` in pixels, CSS order.
pub fn framed_image(
    width: u32,
    height: u32,
    frame: [u32; 4],
    border: Rgba<u8>,
    fill: Rgba<u8>,
) -> RgbaImage {
    let [top, right, bottom, left] = frame;
    RgbaImage::from_fn(width, height, |x, y| {
        let inside = x >= left && x + right < width && y >= top && y + bottom < height;
        if inside { fill } else { border }
    })
}

// =========================================================================
// Filesystem helpers
// =========================================================================

/// Encode `img` as PNG into `dir/name` and return the path.
///
/// The file name's extension is ignored; content is always PNG.
pub fn write_png(dir: &Path, name: &str, img: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

/// Write raw bytes into `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
