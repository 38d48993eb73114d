//! Output encoders, selected by destination extension.
//!
//! | Extension | Encoder |
//! |---|---|
//! | `.jpg`, `.jpeg` | `image` JPEG encoder, quality 95 (alpha flattened to RGB) |
//! | `.png` | `image` PNG encoder, default settings |
//! | `.webp` | libwebp via the `webp` crate, **lossy, quality 75** |
//! | `.bmp` | `image` BMP encoder |
//! | `.tiff` | `image` TIFF encoder |
//!
//! The WebP quality is part of the [`OutputFormat::WebP`] variant and does not
//! depend on any user setting. JPEG always uses [`Quality::JPEG`].

use super::backend::BackendError;
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Closed set of formats the batch can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP { quality: Quality },
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP {
                quality: Quality::WEBP,
            }),
            "bmp" => Some(Self::Bmp),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Encode `img` into an in-memory file of this format.
    pub fn encode(&self, img: &RgbaImage) -> Result<Vec<u8>, BackendError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(BackendError::EmptyImage);
        }
        match self {
            Self::WebP { quality } => encode_webp(img, *quality),
            Self::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
                encode_jpeg(&rgb, Quality::JPEG)
            }
            Self::Png => encode_with(&DynamicImage::ImageRgba8(img.clone()), ImageFormat::Png),
            Self::Bmp => encode_with(&DynamicImage::ImageRgba8(img.clone()), ImageFormat::Bmp),
            Self::Tiff => encode_with(&DynamicImage::ImageRgba8(img.clone()), ImageFormat::Tiff),
        }
    }
}

fn encode_with(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, BackendError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .map_err(|e| BackendError::Encode(format!("{format:?}: {e}")))?;
    Ok(buf.into_inner())
}

fn encode_jpeg(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.value() as u8)
        .encode_image(img)
        .map_err(|e| BackendError::Encode(format!("Jpeg: {e}")))?;
    Ok(buf)
}

/// Lossy WebP. libwebp rejects dimensions above 16383 px.
fn encode_webp(img: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let encoder = webp::Encoder::from_rgba(img.as_raw(), img.width(), img.height());
    let memory = encoder
        .encode_simple(false, quality.value() as f32)
        .map_err(|e| BackendError::Encode(format!("WebP: {e:?}")))?;
    Ok(memory.to_vec())
}
