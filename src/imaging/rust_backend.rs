//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, BMP, TIFF) | `image::ImageReader`, format sniffed from content |
//! | Encode | [`OutputFormat::encode`](super::codec::OutputFormat::encode) |
//! | Verbatim copy | `std::io::copy` (no metadata or permissions copied) |
//!
//! Every decoded image is converted to 8-bit RGBA, whatever its stored depth,
//! so trimming and re-encoding always work on the same pixel layout.

use super::backend::{BackendError, ImageBackend};
use super::codec::OutputFormat;
use image::{ImageReader, RgbaImage};
use std::fs::File;
use std::path::Path;

/// Backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;
        Ok(img.to_rgba8())
    }

    fn save(&self, img: &RgbaImage, path: &Path) -> Result<(), BackendError> {
        let format = OutputFormat::from_path(path).ok_or_else(|| {
            BackendError::UnsupportedFormat(
                path.extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        })?;
        let bytes = format.encode(img)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn copy(&self, source: &Path, dest: &Path) -> Result<(), BackendError> {
        let mut input = File::open(source)?;
        let mut output = File::create(dest)?;
        std::io::copy(&mut input, &mut output)?;
        Ok(())
    }
}
